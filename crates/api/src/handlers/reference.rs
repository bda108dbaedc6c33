// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Departments, sites, wage masters and holidays.

use ems_audit::Target;
use ems_domain::{HolidayType, check_amount};
use ems_persistence::{
    DepartmentData, NewHoliday, NewSite, NewWageMaster, Persistence, SiteData, WageMasterData,
    WageMasterUpdate,
};
use rust_decimal::Decimal;
use time::{Date, OffsetDateTime};

use super::{clean, parse_date_field, parse_optional_date, record_audit, snapshot};
use crate::auth::{AuthenticatedUser, AuthorizationService};
use crate::error::ApiError;
use crate::request_response::{
    CreateDepartmentRequest, CreateHolidayRequest, CreateSiteRequest, CreateWageMasterRequest,
    CreatedResponse, DepartmentListResponse, HolidayListResponse, HolidayQuery, MessageResponse,
    SiteListResponse, UpdateWageMasterRequest, WageMasterListResponse, WageMasterQuery,
};

fn required(field: &str, value: &str) -> Result<String, ApiError> {
    let value: &str = value.trim();
    if value.is_empty() {
        return Err(ApiError::InvalidInput {
            field: field.to_string(),
            message: format!("{field} is required"),
        });
    }
    Ok(value.to_string())
}

fn wage_master_not_found(wage_master_id: i64) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: String::from("Wage master"),
        message: format!("Wage master {wage_master_id} does not exist or is inactive"),
    }
}

fn positive_wage(daily_wage: Decimal) -> Result<Decimal, ApiError> {
    if daily_wage <= Decimal::ZERO {
        return Err(ApiError::InvalidInput {
            field: String::from("daily_wage"),
            message: String::from("Daily wage must be greater than zero"),
        });
    }
    Ok(check_amount("daily_wage", daily_wage)?)
}

fn load_active_wage_master(persistence: &mut Persistence, wage_master_id: i64) -> Result<WageMasterData, ApiError> {
    persistence
        .get_wage_master(wage_master_id)?
        .filter(|w| w.is_active)
        .ok_or_else(|| wage_master_not_found(wage_master_id))
}

/// Lists departments.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_departments(persistence: &mut Persistence) -> Result<DepartmentListResponse, ApiError> {
    Ok(DepartmentListResponse {
        departments: persistence.list_departments()?,
    })
}

/// Retrieves one department.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if it does not exist.
pub fn get_department(persistence: &mut Persistence, department_id: i64) -> Result<DepartmentData, ApiError> {
    persistence
        .get_department(department_id)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Department"),
            message: format!("Department {department_id} does not exist"),
        })
}

/// Creates a department.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the name is blank, or
/// the name is already taken.
pub fn create_department(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    request: CreateDepartmentRequest,
) -> Result<DepartmentData, ApiError> {
    AuthorizationService::require_admin(actor, "create_department")?;
    let name: String = required("name", &request.name)?;
    let description: Option<String> = clean(request.description);

    let department: DepartmentData = persistence.create_department(
        &name,
        description.as_deref(),
        actor.to_audit_actor().label(),
    )?;
    record_audit(
        persistence,
        actor,
        "CreateDepartment",
        None,
        Target::new("department", department.department_id),
        None,
        Some(snapshot(&department)?),
    )?;
    Ok(department)
}

/// Lists sites.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_sites(persistence: &mut Persistence) -> Result<SiteListResponse, ApiError> {
    Ok(SiteListResponse {
        sites: persistence.list_sites()?,
    })
}

/// Creates a work site.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, a required field is
/// blank, or the site id is already taken.
pub fn create_site(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    request: CreateSiteRequest,
) -> Result<SiteData, ApiError> {
    AuthorizationService::require_admin(actor, "create_site")?;
    let site: NewSite = NewSite {
        site_id: required("site_id", &request.site_id)?,
        site_name: required("site_name", &request.site_name)?,
        location: clean(request.location),
        state: clean(request.state),
    };

    let created: SiteData = persistence.create_site(&site, actor.to_audit_actor().label())?;
    record_audit(
        persistence,
        actor,
        "CreateSite",
        None,
        Target::new("site", &created.site_id),
        None,
        Some(snapshot(&created)?),
    )?;
    Ok(created)
}

/// Lists wage masters, optionally for one salary code.
///
/// # Errors
///
/// Returns an error if the caller is not an admin.
pub fn list_wage_masters(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    query: WageMasterQuery,
) -> Result<WageMasterListResponse, ApiError> {
    AuthorizationService::require_admin(actor, "list_wage_masters")?;
    let salary_code: Option<String> = clean(query.salary_code);
    Ok(WageMasterListResponse {
        wage_masters: persistence.list_wage_masters(salary_code.as_deref())?,
    })
}

/// Creates a wage rate for a salary code.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the wage is not
/// positive or exceeds `MAX_AMOUNT`, the effective period is inverted, or
/// the site is unknown.
pub fn create_wage_master(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    request: CreateWageMasterRequest,
) -> Result<CreatedResponse, ApiError> {
    AuthorizationService::require_admin(actor, "create_wage_master")?;
    positive_wage(request.daily_wage)?;
    let effective_from: Date = parse_date_field("effective_from", &request.effective_from)?;
    let effective_to: Option<Date> = parse_optional_date("effective_to", request.effective_to.as_deref())?;
    if let Some(to) = effective_to
        && to < effective_from
    {
        return Err(ApiError::InvalidInput {
            field: String::from("effective_to"),
            message: format!("Effective period ends ({to}) before it starts ({effective_from})"),
        });
    }

    let wage: NewWageMaster = NewWageMaster {
        salary_code: required("salary_code", &request.salary_code)?,
        site_id: required("site_id", &request.site_id)?,
        rank: required("rank", &request.rank)?,
        state: required("state", &request.state)?,
        skill_level: required("skill_level", &request.skill_level)?,
        daily_wage: request.daily_wage,
        effective_from,
        effective_to,
    };
    if persistence.get_site(&wage.site_id)?.is_none() {
        return Err(ApiError::InvalidInput {
            field: String::from("site_id"),
            message: format!("Site '{}' does not exist", wage.site_id),
        });
    }

    let id: i64 = persistence.create_wage_master(&wage, actor.to_audit_actor().label())?;
    record_audit(
        persistence,
        actor,
        "CreateWageMaster",
        Some(format!("{} at {}", wage.salary_code, wage.daily_wage)),
        Target::new("wage_master", id),
        None,
        None,
    )?;
    Ok(CreatedResponse {
        message: format!("Wage master created for salary code '{}'", wage.salary_code),
        id,
    })
}

/// Retrieves an active wage master.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, or
/// `ApiError::ResourceNotFound` if the wage master does not exist or was
/// deactivated.
pub fn get_wage_master(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    wage_master_id: i64,
) -> Result<WageMasterData, ApiError> {
    AuthorizationService::require_admin(actor, "get_wage_master")?;
    load_active_wage_master(persistence, wage_master_id)
}

/// Updates an active wage master.
///
/// The salary code, site and start date identify the rate and cannot be
/// changed; create a new wage master instead.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the wage master is
/// missing or inactive, the request is empty, a text field is blank, the
/// wage is out of range, or `effective_to` precedes `effective_from`.
pub fn update_wage_master(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    wage_master_id: i64,
    request: UpdateWageMasterRequest,
) -> Result<WageMasterData, ApiError> {
    AuthorizationService::require_admin(actor, "update_wage_master")?;
    let before: WageMasterData = load_active_wage_master(persistence, wage_master_id)?;

    let update: WageMasterUpdate = WageMasterUpdate {
        rank: request.rank.as_deref().map(|v| required("rank", v)).transpose()?,
        state: request.state.as_deref().map(|v| required("state", v)).transpose()?,
        skill_level: request
            .skill_level
            .as_deref()
            .map(|v| required("skill_level", v))
            .transpose()?,
        daily_wage: request.daily_wage.map(positive_wage).transpose()?,
        effective_to: parse_optional_date("effective_to", request.effective_to.as_deref())?,
        is_active: None,
    };
    if update.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("request"),
            message: String::from("No fields to update"),
        });
    }
    if let Some(to) = update.effective_to {
        let from: Date = parse_date_field("effective_from", &before.effective_from)?;
        if to < from {
            return Err(ApiError::InvalidInput {
                field: String::from("effective_to"),
                message: format!("Effective period ends ({to}) before it starts ({from})"),
            });
        }
    }

    let after: WageMasterData = persistence
        .update_wage_master(wage_master_id, &update)?
        .ok_or_else(|| wage_master_not_found(wage_master_id))?;
    record_audit(
        persistence,
        actor,
        "UpdateWageMaster",
        None,
        Target::new("wage_master", wage_master_id),
        Some(snapshot(&before)?),
        Some(snapshot(&after)?),
    )?;
    Ok(after)
}

/// Deactivates a wage master so payroll no longer uses it.
///
/// An open-ended period is closed at today, or at its start date when it
/// has not started yet. The row is kept for history.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the wage master is
/// missing or already inactive.
pub fn deactivate_wage_master(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    wage_master_id: i64,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::require_admin(actor, "deactivate_wage_master")?;
    let before: WageMasterData = load_active_wage_master(persistence, wage_master_id)?;

    let effective_to: Option<Date> = if before.effective_to.is_none() {
        let from: Date = parse_date_field("effective_from", &before.effective_from)?;
        Some(OffsetDateTime::now_utc().date().max(from))
    } else {
        None
    };
    let after: WageMasterData = persistence
        .update_wage_master(
            wage_master_id,
            &WageMasterUpdate {
                effective_to,
                is_active: Some(false),
                ..WageMasterUpdate::default()
            },
        )?
        .ok_or_else(|| wage_master_not_found(wage_master_id))?;
    record_audit(
        persistence,
        actor,
        "DeactivateWageMaster",
        Some(before.salary_code.clone()),
        Target::new("wage_master", wage_master_id),
        Some(snapshot(&before)?),
        Some(snapshot(&after)?),
    )?;
    Ok(MessageResponse {
        message: format!("Wage master {wage_master_id} deactivated"),
    })
}

/// Lists holidays, optionally for one year.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_holidays(persistence: &mut Persistence, query: HolidayQuery) -> Result<HolidayListResponse, ApiError> {
    Ok(HolidayListResponse {
        holidays: persistence.list_holidays(query.year)?,
    })
}

/// Creates a holiday.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the date or type is
/// invalid, or another holiday falls on the same date.
pub fn create_holiday(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    request: CreateHolidayRequest,
) -> Result<CreatedResponse, ApiError> {
    AuthorizationService::require_admin(actor, "create_holiday")?;
    let name: String = required("name", &request.name)?;
    let holiday_type: HolidayType = clean(request.holiday_type)
        .map(|t| t.parse())
        .transpose()?
        .unwrap_or(HolidayType::National);

    let holiday: NewHoliday = NewHoliday {
        name,
        holiday_date: parse_date_field("holiday_date", &request.holiday_date)?,
        holiday_type,
        description: clean(request.description),
        is_paid: request.is_paid.unwrap_or(true),
        is_recurring: request.is_recurring.unwrap_or(false),
    };

    let id: i64 = persistence.create_holiday(&holiday, actor.to_audit_actor().label())?;
    record_audit(
        persistence,
        actor,
        "CreateHoliday",
        Some(format!("{} on {}", holiday.name, holiday.holiday_date)),
        Target::new("holiday", id),
        None,
        None,
    )?;
    Ok(CreatedResponse {
        message: format!("Holiday '{}' created", holiday.name),
        id,
    })
}
