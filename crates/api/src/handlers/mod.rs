// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Handlers implementing each REST operation over persistence.
//!
//! Every handler authorizes first, then parses and validates its input,
//! then touches storage. Successful mutations record an audit event
//! naming the acting user.

mod accounts;
mod attendance;
mod audit;
mod deductions;
mod documents;
mod employees;
mod reference;
mod salary;

pub use accounts::{
    change_password, current_user, list_users, login, logout, register_user, set_user_active,
};
pub use attendance::{
    bulk_mark_attendance, list_attendance_for_date, list_employee_attendance, mark_attendance,
    monthly_attendance_summary, update_attendance,
};
pub use audit::list_audit_events;
pub use deductions::{
    create_deduction, delete_deduction, get_deduction, list_deductions, update_deduction,
};
pub use documents::{list_documents, upload_document};
pub use employees::{
    bulk_import_employees, create_employee, deactivate_employee, get_employee, list_employees,
    update_employee,
};
pub use reference::{
    create_department, create_holiday, create_site, create_wage_master, deactivate_wage_master,
    get_department, get_wage_master, list_departments, list_holidays, list_sites,
    list_wage_masters, update_wage_master,
};
pub use salary::{calculate_individual_salary, calculate_monthly_salary};

use ems_audit::{Action, AuditEvent, StateSnapshot, Target};
use ems_domain::parse_date;
use ems_persistence::{EmployeeData, Persistence};
use serde::Serialize;
use time::Date;

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;

/// Serializes a record for an audit snapshot.
fn snapshot<T: Serialize>(value: &T) -> Result<StateSnapshot, ApiError> {
    serde_json::to_string(value)
        .map(StateSnapshot::new)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to serialize audit snapshot: {e}"),
        })
}

/// Records a successful mutation.
fn record_audit(
    persistence: &mut Persistence,
    user: &AuthenticatedUser,
    action: &str,
    details: Option<String>,
    target: Target,
    before: Option<StateSnapshot>,
    after: Option<StateSnapshot>,
) -> Result<(), ApiError> {
    let event: AuditEvent = AuditEvent::new(
        user.to_audit_actor(),
        Action::new(action.to_string(), details),
        target,
        before,
        after,
    );
    persistence.persist_audit_event(&event)?;
    Ok(())
}

/// Parses a `YYYY-MM-DD` field, reporting failures against `field`.
fn parse_date_field(field: &str, value: &str) -> Result<Date, ApiError> {
    parse_date(value.trim()).map_err(|e| ApiError::InvalidInput {
        field: field.to_string(),
        message: e.to_string(),
    })
}

fn parse_optional_date(field: &str, value: Option<&str>) -> Result<Option<Date>, ApiError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| parse_date_field(field, v))
        .transpose()
}

/// Trims an optional string, treating blank as absent.
fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn require_employee(persistence: &mut Persistence, employee_id: i64) -> Result<EmployeeData, ApiError> {
    persistence
        .get_employee(employee_id)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Employee"),
            message: format!("Employee {employee_id} does not exist"),
        })
}
