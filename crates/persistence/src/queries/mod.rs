// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for persistence layer.
//!
//! This module contains all read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `reference`: Departments, sites, wage masters and holidays
//! - `employees`: Employee lookup, listing and the id sequence position
//! - `attendance`: Attendance by id, employee, or date
//! - `deductions`: Installment deductions
//! - `users`: Login accounts
//! - `documents`: Uploaded employee documents
//! - `audit`: Audit events
//! - `status`: Row counts
//!
//! ## Backend-Specific Functions
//!
//! All query functions are generated in backend-specific monomorphic versions:
//! - Functions suffixed with `_sqlite` for `SQLite`
//! - Functions suffixed with `_pg` for `PostgreSQL`
//!
//! The `Persistence` adapter in `lib.rs` dispatches to the appropriate version
//! based on the active backend connection.

pub mod attendance;
pub mod audit;
pub mod deductions;
pub mod documents;
pub mod employees;
pub mod reference;
pub mod status;
pub mod users;
