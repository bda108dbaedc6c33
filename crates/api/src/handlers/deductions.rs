// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::str::FromStr;

use ems_audit::Target;
use ems_domain::{InstallmentPlan, PayrollMonth};
use ems_persistence::{DeductionData, DeductionUpdate, NewDeduction, Persistence};
use rust_decimal::Decimal;

use super::{record_audit, require_employee, snapshot};
use crate::auth::{AuthenticatedUser, AuthorizationService};
use crate::error::ApiError;
use crate::request_response::{
    CreateDeductionRequest, DeductionListResponse, DeductionQuery, DeductionView, MessageResponse,
    UpdateDeductionRequest,
};

fn plan_of(deduction: &DeductionData) -> Result<InstallmentPlan, ApiError> {
    let total: Decimal = Decimal::from_str(&deduction.total_amount).map_err(|_| ApiError::Internal {
        message: format!(
            "Deduction {} has an unreadable amount '{}'",
            deduction.deduction_id, deduction.total_amount
        ),
    })?;
    Ok(InstallmentPlan::new(
        total,
        i64::from(deduction.months),
        deduction.start_month.parse()?,
    )?)
}

fn view_of(deduction: DeductionData) -> Result<DeductionView, ApiError> {
    let plan: InstallmentPlan = plan_of(&deduction)?;
    Ok(DeductionView {
        monthly_installment: plan.monthly_installment(),
        end_month: plan.end_month()?.to_string(),
        deduction,
    })
}

fn stored_months(plan: &InstallmentPlan) -> Result<i32, ApiError> {
    i32::try_from(plan.months()).map_err(|_| ApiError::InvalidInput {
        field: String::from("months"),
        message: format!("{} months is too many", plan.months()),
    })
}

fn deduction_type_of(value: &str) -> Result<String, ApiError> {
    let value: &str = value.trim();
    if value.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("deduction_type"),
            message: String::from("deduction_type is required"),
        });
    }
    Ok(value.to_string())
}

fn load(persistence: &mut Persistence, deduction_id: i64) -> Result<DeductionData, ApiError> {
    persistence
        .get_deduction(deduction_id)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Deduction"),
            message: format!("Deduction {deduction_id} does not exist"),
        })
}

/// Creates an installment deduction.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the employee does not
/// exist, the type is blank, or the amount, month count or start month is
/// invalid.
pub fn create_deduction(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    request: CreateDeductionRequest,
) -> Result<DeductionView, ApiError> {
    AuthorizationService::require_admin(actor, "create_deduction")?;
    let deduction_type: String = deduction_type_of(&request.deduction_type)?;
    let start_month: PayrollMonth = request.start_month.parse()?;
    let plan: InstallmentPlan = InstallmentPlan::new(request.total_amount, request.months, start_month)?;
    require_employee(persistence, request.employee_id)?;

    let months: i32 = stored_months(&plan)?;
    let created: DeductionData = persistence.create_deduction(
        &NewDeduction {
            employee_id: request.employee_id,
            deduction_type,
            total_amount: plan.total_amount(),
            months,
            start_month,
        },
        actor.to_audit_actor().label(),
    )?;
    record_audit(
        persistence,
        actor,
        "CreateDeduction",
        None,
        Target::new("deduction", created.deduction_id),
        None,
        Some(snapshot(&created)?),
    )?;
    view_of(created)
}

/// Retrieves one deduction with its schedule.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the deduction does
/// not exist.
pub fn get_deduction(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    deduction_id: i64,
) -> Result<DeductionView, ApiError> {
    AuthorizationService::require_admin(actor, "get_deduction")?;
    view_of(load(persistence, deduction_id)?)
}

/// Lists deductions, optionally for one employee.
///
/// # Errors
///
/// Returns an error if the caller is not an admin.
pub fn list_deductions(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    query: DeductionQuery,
) -> Result<DeductionListResponse, ApiError> {
    AuthorizationService::require_admin(actor, "list_deductions")?;
    let deductions: Vec<DeductionView> = persistence
        .list_deductions(query.employee_id)?
        .into_iter()
        .map(view_of)
        .collect::<Result<_, _>>()?;
    Ok(DeductionListResponse { deductions })
}

/// Reschedules a deduction.
///
/// The merged amount, month count and start month are validated together,
/// so a change to any one of them cannot leave a schedule that runs off
/// the calendar.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the deduction does not
/// exist, the request is empty, or the resulting schedule is invalid.
pub fn update_deduction(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    deduction_id: i64,
    request: UpdateDeductionRequest,
) -> Result<DeductionView, ApiError> {
    AuthorizationService::require_admin(actor, "update_deduction")?;
    let before: DeductionData = load(persistence, deduction_id)?;
    let current: InstallmentPlan = plan_of(&before)?;

    let deduction_type: Option<String> = request
        .deduction_type
        .as_deref()
        .map(deduction_type_of)
        .transpose()?;
    let start_month: Option<PayrollMonth> = request
        .start_month
        .as_deref()
        .map(str::parse)
        .transpose()?;
    let plan: InstallmentPlan = InstallmentPlan::new(
        request.total_amount.unwrap_or_else(|| current.total_amount()),
        request.months.unwrap_or_else(|| i64::from(current.months())),
        start_month.unwrap_or_else(|| current.start()),
    )?;

    let update: DeductionUpdate = DeductionUpdate {
        deduction_type,
        total_amount: request.total_amount.map(|_| plan.total_amount()),
        months: request.months.map(|_| stored_months(&plan)).transpose()?,
        start_month,
    };
    if update.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("request"),
            message: String::from("No fields to update"),
        });
    }

    let after: DeductionData = persistence
        .update_deduction(deduction_id, &update)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Deduction"),
            message: format!("Deduction {deduction_id} does not exist"),
        })?;
    record_audit(
        persistence,
        actor,
        "UpdateDeduction",
        None,
        Target::new("deduction", deduction_id),
        Some(snapshot(&before)?),
        Some(snapshot(&after)?),
    )?;
    view_of(after)
}

/// Deletes a deduction. Payroll for later months no longer applies it.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the deduction does
/// not exist.
pub fn delete_deduction(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    deduction_id: i64,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::require_admin(actor, "delete_deduction")?;
    let before: DeductionData = load(persistence, deduction_id)?;
    if !persistence.delete_deduction(deduction_id)? {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Deduction"),
            message: format!("Deduction {deduction_id} does not exist"),
        });
    }
    record_audit(
        persistence,
        actor,
        "DeleteDeduction",
        None,
        Target::new("deduction", deduction_id),
        Some(snapshot(&before)?),
        None,
    )?;
    Ok(MessageResponse {
        message: format!("Deduction {deduction_id} deleted"),
    })
}
