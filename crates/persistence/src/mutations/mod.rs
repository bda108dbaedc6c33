// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-agnostic mutation modules.
//!
//! This module contains all state-changing operations for the persistence layer.
//! Inserts use `RETURNING` to obtain generated ids on both backends.
//!
//! ## Module Organization
//!
//! - `reference`: Departments, sites, wage masters and holidays
//! - `employees`: Employee registration (sequence-assigned ids) and updates
//! - `attendance`: Marking and correcting attendance
//! - `deductions`: Installment deductions
//! - `users`: Accounts, password hashing and login bookkeeping
//! - `documents`: Uploaded document metadata
//! - `audit`: Audit event persistence
//! - `bootstrap`: Sequence initialization and reference data seeding

pub mod attendance;
pub mod audit;
pub mod bootstrap;
pub mod deductions;
pub mod documents;
pub mod employees;
pub mod reference;
pub mod users;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::PersistenceError;

/// Current UTC time as RFC 3339, the format of every timestamp column.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be formatted.
pub fn now_timestamp() -> Result<String, PersistenceError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Encodes a boolean for an `INTEGER` flag column.
pub(crate) fn flag(value: bool) -> i32 {
    i32::from(value)
}
