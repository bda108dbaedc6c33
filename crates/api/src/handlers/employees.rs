// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use ems_audit::Target;
use ems_domain::{
    EmploymentStatus, MaritalStatus, validate_aadhaar, validate_email, validate_pan,
    validate_person_name, validate_phone,
};
use ems_persistence::{EmployeeData, EmployeeFilter, EmployeeUpdate, NewEmployee, Persistence};
use tracing::{debug, info};

use super::{clean, parse_optional_date, record_audit, require_employee, snapshot};
use crate::auth::{AuthenticatedUser, AuthorizationService};
use crate::csv_import::{CsvEmployee, CsvRow, parse_employee_csv};
use crate::error::ApiError;
use crate::request_response::{
    BulkImportResponse, CreateEmployeeRequest, EmployeeListQuery, EmployeeListResponse,
    EmployeeResponse, ImportRowResult, RowStatus, UpdateEmployeeRequest,
};

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;

/// Validated contact and identity fields shared by create and update.
struct IdentityFields {
    email: Option<String>,
    phone: Option<String>,
    adhar_number: Option<String>,
    pan_number: Option<String>,
    marital_status: Option<MaritalStatus>,
}

fn validate_identity(
    email: Option<String>,
    phone: Option<String>,
    adhar_number: Option<String>,
    pan_number: Option<String>,
    marital_status: Option<String>,
) -> Result<IdentityFields, ApiError> {
    let email: Option<String> = clean(email);
    if let Some(email) = &email {
        validate_email(email)?;
    }
    let phone: Option<String> = clean(phone);
    if let Some(phone) = &phone {
        validate_phone(phone)?;
    }
    let adhar_number: Option<String> = clean(adhar_number);
    if let Some(adhar) = &adhar_number {
        validate_aadhaar(adhar)?;
    }
    let pan_number: Option<String> = clean(pan_number).map(|p| p.to_ascii_uppercase());
    if let Some(pan) = &pan_number {
        validate_pan(pan)?;
    }
    let marital_status: Option<MaritalStatus> =
        clean(marital_status).map(|m| m.parse()).transpose()?;

    Ok(IdentityFields {
        email,
        phone,
        adhar_number,
        pan_number,
        marital_status,
    })
}

fn validate_optional_name(field: &str, value: Option<String>) -> Result<Option<String>, ApiError> {
    let value: Option<String> = clean(value);
    if let Some(name) = &value {
        validate_person_name(field, name)?;
    }
    Ok(value)
}

/// Rejects references to departments or sites that do not exist.
fn check_references(
    persistence: &mut Persistence,
    department_id: Option<i64>,
    site_id: Option<&str>,
) -> Result<(), ApiError> {
    if let Some(department_id) = department_id
        && persistence.get_department(department_id)?.is_none()
    {
        return Err(ApiError::InvalidInput {
            field: String::from("department_id"),
            message: format!("Department {department_id} does not exist"),
        });
    }
    if let Some(site_id) = site_id
        && persistence.get_site(site_id)?.is_none()
    {
        return Err(ApiError::InvalidInput {
            field: String::from("site_id"),
            message: format!("Site '{site_id}' does not exist"),
        });
    }
    Ok(())
}

/// Validates a create request into storable fields.
fn to_new_employee(request: CreateEmployeeRequest) -> Result<NewEmployee, ApiError> {
    let first_name: String = request.first_name.trim().to_string();
    validate_person_name("first_name", &first_name)?;
    let identity: IdentityFields = validate_identity(
        request.email,
        request.phone,
        request.adhar_number,
        request.pan_number,
        request.marital_status,
    )?;
    let employment_status: EmploymentStatus = clean(request.employment_status)
        .map(|s| s.parse())
        .transpose()?
        .unwrap_or_default();

    Ok(NewEmployee {
        first_name,
        last_name: validate_optional_name("last_name", request.last_name)?,
        father_name: validate_optional_name("father_name", request.father_name)?,
        gender: clean(request.gender),
        marital_status: identity.marital_status,
        date_of_birth: parse_optional_date("date_of_birth", request.date_of_birth.as_deref())?,
        email: identity.email,
        phone: identity.phone,
        adhar_number: identity.adhar_number,
        pan_number: identity.pan_number,
        address: clean(request.address),
        department_id: request.department_id,
        site_id: clean(request.site_id),
        salary_code: clean(request.salary_code),
        designation: clean(request.designation),
        skill_category: clean(request.skill_category),
        hire_date: parse_optional_date("hire_date", request.hire_date.as_deref())?,
        employment_status,
        pf_applicable: request.pf_applicable.unwrap_or(false),
        esic_applicable: request.esic_applicable.unwrap_or(false),
    })
}

fn to_employee_update(request: UpdateEmployeeRequest) -> Result<EmployeeUpdate, ApiError> {
    let first_name: Option<String> = match request.first_name {
        Some(name) => {
            let name: String = name.trim().to_string();
            validate_person_name("first_name", &name)?;
            Some(name)
        }
        None => None,
    };
    let identity: IdentityFields = validate_identity(
        request.email,
        request.phone,
        request.adhar_number,
        request.pan_number,
        request.marital_status,
    )?;

    Ok(EmployeeUpdate {
        first_name,
        last_name: validate_optional_name("last_name", request.last_name)?,
        father_name: validate_optional_name("father_name", request.father_name)?,
        gender: clean(request.gender),
        marital_status: identity.marital_status,
        date_of_birth: parse_optional_date("date_of_birth", request.date_of_birth.as_deref())?,
        email: identity.email,
        phone: identity.phone,
        adhar_number: identity.adhar_number,
        pan_number: identity.pan_number,
        address: clean(request.address),
        department_id: request.department_id,
        site_id: clean(request.site_id),
        salary_code: clean(request.salary_code),
        designation: clean(request.designation),
        skill_category: clean(request.skill_category),
        hire_date: parse_optional_date("hire_date", request.hire_date.as_deref())?,
        employment_status: clean(request.employment_status)
            .map(|s| s.parse())
            .transpose()?,
        pf_applicable: request.pf_applicable,
        esic_applicable: request.esic_applicable,
    })
}

/// Registers an employee under the next sequence id.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, a field is invalid, a
/// referenced department or site does not exist, or an identification
/// number is already in use.
pub fn create_employee(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    request: CreateEmployeeRequest,
) -> Result<EmployeeResponse, ApiError> {
    AuthorizationService::require_admin(actor, "create_employee")?;
    let employee: NewEmployee = to_new_employee(request)?;
    check_references(persistence, employee.department_id, employee.site_id.as_deref())?;

    let created: EmployeeData = persistence.create_employee(&employee, actor.to_audit_actor().label())?;
    record_audit(
        persistence,
        actor,
        "RegisterEmployee",
        None,
        Target::new("employee", created.employee_id),
        None,
        Some(snapshot(&created)?),
    )?;

    Ok(EmployeeResponse {
        message: format!(
            "Employee {} registered as {}",
            created.full_name(),
            created.employee_id
        ),
        employee: created,
    })
}

/// Retrieves one employee.
///
/// # Errors
///
/// Returns an error if an employee user asks for someone else's record or
/// the employee does not exist.
pub fn get_employee(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    employee_id: i64,
) -> Result<EmployeeData, ApiError> {
    AuthorizationService::require_admin_or_self(actor, employee_id, "get_employee")?;
    require_employee(persistence, employee_id)
}

/// Lists employees with optional filters and pagination.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the status filter is
/// not a known employment status.
pub fn list_employees(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    query: EmployeeListQuery,
) -> Result<EmployeeListResponse, ApiError> {
    AuthorizationService::require_admin(actor, "list_employees")?;

    let filter: EmployeeFilter = EmployeeFilter {
        department_id: query.department_id,
        employment_status: clean(query.status).map(|s| s.parse()).transpose()?,
        search: clean(query.search),
    };
    let all: Vec<EmployeeData> = persistence.list_employees(&filter)?;

    let per_page: u32 = query.per_page.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let page: u32 = query.page.unwrap_or(1).max(1);
    let total: usize = all.len();
    let pages: u32 = u32::try_from(total.div_ceil(per_page as usize)).unwrap_or(u32::MAX);
    let skip: usize = (page as usize - 1).saturating_mul(per_page as usize);
    let employees: Vec<EmployeeData> = all.into_iter().skip(skip).take(per_page as usize).collect();
    debug!(total, page, per_page, "Listed employees");

    Ok(EmployeeListResponse {
        employees,
        total,
        page,
        per_page,
        pages,
    })
}

/// Applies a partial update.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the employee does not
/// exist, a field is invalid, or new values collide with another employee.
pub fn update_employee(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    employee_id: i64,
    request: UpdateEmployeeRequest,
) -> Result<EmployeeResponse, ApiError> {
    AuthorizationService::require_admin(actor, "update_employee")?;
    let before: EmployeeData = require_employee(persistence, employee_id)?;
    let update: EmployeeUpdate = to_employee_update(request)?;
    check_references(persistence, update.department_id, update.site_id.as_deref())?;

    let after: EmployeeData = persistence
        .update_employee(employee_id, &update, actor.to_audit_actor().label())?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Employee"),
            message: format!("Employee {employee_id} does not exist"),
        })?;
    record_audit(
        persistence,
        actor,
        "UpdateEmployee",
        None,
        Target::new("employee", employee_id),
        Some(snapshot(&before)?),
        Some(snapshot(&after)?),
    )?;

    Ok(EmployeeResponse {
        message: format!("Employee {employee_id} updated"),
        employee: after,
    })
}

/// Deactivates an employee. The record and its history are kept.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the employee does not
/// exist.
pub fn deactivate_employee(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    employee_id: i64,
) -> Result<EmployeeResponse, ApiError> {
    AuthorizationService::require_admin(actor, "deactivate_employee")?;
    let before: EmployeeData = require_employee(persistence, employee_id)?;

    let after: EmployeeData = persistence
        .deactivate_employee(employee_id, actor.to_audit_actor().label())?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Employee"),
            message: format!("Employee {employee_id} does not exist"),
        })?;
    record_audit(
        persistence,
        actor,
        "DeactivateEmployee",
        None,
        Target::new("employee", employee_id),
        Some(snapshot(&before)?),
        Some(snapshot(&after)?),
    )?;

    Ok(EmployeeResponse {
        message: format!("Employee {employee_id} deactivated"),
        employee: after,
    })
}

/// Creates one CSV row's employee, resolving a department given by name.
fn import_row(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    row: CsvEmployee,
) -> Result<EmployeeData, ApiError> {
    let mut request: CreateEmployeeRequest = row.request;
    if request.department_id.is_none()
        && let Some(name) = row.department_name
    {
        let department = persistence
            .find_department_by_name(&name)?
            .ok_or_else(|| ApiError::InvalidInput {
                field: String::from("department"),
                message: format!("Unknown department '{name}'"),
            })?;
        request.department_id = Some(department.department_id);
    }

    let employee: NewEmployee = to_new_employee(request)?;
    check_references(persistence, employee.department_id, employee.site_id.as_deref())?;
    let created: EmployeeData = persistence.create_employee(&employee, actor.to_audit_actor().label())?;
    record_audit(
        persistence,
        actor,
        "RegisterEmployee",
        Some(String::from("bulk import")),
        Target::new("employee", created.employee_id),
        None,
        Some(snapshot(&created)?),
    )?;
    Ok(created)
}

/// Imports employees from CSV, one row at a time.
///
/// Each row succeeds or fails on its own; a bad row never prevents the
/// others from being created.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the file has no
/// usable header.
pub fn bulk_import_employees(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    content: &[u8],
) -> Result<BulkImportResponse, ApiError> {
    AuthorizationService::require_admin(actor, "bulk_import_employees")?;
    let parsed: Vec<CsvRow> = parse_employee_csv(content)?;

    let rows: Vec<ImportRowResult> = parsed
        .into_iter()
        .map(|row| {
            let outcome: Result<EmployeeData, Vec<String>> = row
                .result
                .and_then(|employee| import_row(persistence, actor, employee).map_err(|e| vec![e.to_string()]));
            match outcome {
                Ok(created) => ImportRowResult {
                    row_number: row.row_number,
                    status: RowStatus::Created,
                    employee_id: Some(created.employee_id),
                    errors: Vec::new(),
                },
                Err(errors) => ImportRowResult {
                    row_number: row.row_number,
                    status: RowStatus::Failed,
                    employee_id: None,
                    errors,
                },
            }
        })
        .collect();

    let created_count: usize = rows.iter().filter(|r| r.status == RowStatus::Created).count();
    let failed_count: usize = rows.len() - created_count;
    info!(created_count, failed_count, "Bulk employee import finished");

    Ok(BulkImportResponse {
        message: format!("Imported {created_count} of {} rows", rows.len()),
        total_rows: rows.len(),
        created_count,
        failed_count,
        rows,
    })
}
