// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the Employee Management System.
//!
//! This crate sits between transport and storage. Handlers take an open
//! [`ems_persistence::Persistence`] and the authenticated caller, enforce
//! role checks, validate and normalize input, perform the operation and
//! record an audit event for every successful mutation.
//!
//! The crate knows nothing about HTTP. Status codes and JSON envelopes are
//! the server's concern; here errors are expressed as [`ApiError`].

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions, clippy::module_name_repetitions)]

mod auth;
mod capabilities;
mod csv_import;
mod error;
mod handlers;
mod password_policy;
mod request_response;
mod storage;

#[cfg(test)]
mod tests;

pub use auth::{
    AuthenticatedUser, AuthenticationService, AuthorizationService, Claims,
    DEFAULT_TOKEN_TTL_HOURS, LOCKOUT_DURATION, MAX_FAILED_LOGINS, MAX_TOKEN_TTL_HOURS, TokenError,
    TokenService,
};
pub use capabilities::{Capabilities, Capability, compute_capabilities};
pub use csv_import::{CsvEmployee, CsvRow, parse_employee_csv};
pub use error::{ApiError, AuthError, translate_domain_error, translate_persistence_error};
pub use handlers::{
    bulk_import_employees, bulk_mark_attendance, calculate_individual_salary,
    calculate_monthly_salary, change_password, create_deduction, create_department,
    create_employee, create_holiday, create_site, create_wage_master, current_user,
    deactivate_employee, deactivate_wage_master, delete_deduction, get_deduction,
    get_department, get_employee, get_wage_master, list_attendance_for_date,
    list_audit_events, list_deductions, list_departments, list_documents,
    list_employee_attendance, list_employees, list_holidays, list_sites, list_users,
    list_wage_masters, login, logout, mark_attendance, monthly_attendance_summary,
    register_user, set_user_active, update_attendance, update_deduction, update_employee,
    update_wage_master, upload_document,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::*;
pub use storage::{
    ALLOWED_EXTENSIONS, DocumentStore, MAX_UPLOAD_BYTES, StorageError, StoredFile,
    sanitize_filename,
};
