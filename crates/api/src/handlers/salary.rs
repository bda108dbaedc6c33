// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Payroll runs. Salary calculation reads only; nothing is persisted.

use std::str::FromStr;

use ems_domain::{
    AppliedDeduction, AttendanceCounts, EmploymentStatus, InstallmentPlan, PayrollAdjustments,
    PayrollBreakdown, PayrollInputs, PayrollMonth, checked_sum, compute_payroll,
};
use ems_persistence::{
    AttendanceData, DeductionData, EmployeeData, EmployeeFilter, Persistence, WageMasterData,
};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::attendance::attendance_totals;
use super::{clean, require_employee};
use crate::auth::{AuthenticatedUser, AuthorizationService};
use crate::error::ApiError;
use crate::request_response::{
    EmployeeSalary, IndividualSalaryRequest, MonthlySalaryRequest, MonthlySalaryResponse,
    SalaryFailure,
};

fn stored_decimal(field: &str, value: &str) -> Result<Decimal, ApiError> {
    Decimal::from_str(value).map_err(|_| ApiError::Internal {
        message: format!("Stored {field} '{value}' is not a valid amount"),
    })
}

/// Installments from the employee's deductions that fall due in `period`.
fn installments_due(
    deductions: &[DeductionData],
    period: PayrollMonth,
) -> Result<Vec<AppliedDeduction>, ApiError> {
    let mut applied: Vec<AppliedDeduction> = Vec::new();
    for deduction in deductions {
        let plan: InstallmentPlan = InstallmentPlan::new(
            stored_decimal("deduction amount", &deduction.total_amount)?,
            i64::from(deduction.months),
            deduction.start_month.parse()?,
        )?;
        if let Some(amount) = plan.installment_for(period) {
            applied.push(AppliedDeduction {
                deduction_id: deduction.deduction_id,
                deduction_type: deduction.deduction_type.clone(),
                amount,
            });
        }
    }
    Ok(applied)
}

/// Computes one employee's salary for `period`.
fn salary_for(
    persistence: &mut Persistence,
    employee: &EmployeeData,
    period: PayrollMonth,
    adjustments: PayrollAdjustments,
) -> Result<EmployeeSalary, ApiError> {
    let salary_code: &str = employee
        .salary_code
        .as_deref()
        .ok_or_else(|| ApiError::DomainRuleViolation {
            rule: String::from("salary_code_required"),
            message: format!("Employee {} has no salary code", employee.employee_id),
        })?;
    let wage: WageMasterData = persistence
        .find_effective_wage_master(salary_code, period)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Wage master"),
            message: format!("No active wage master for salary code '{salary_code}' in {period}"),
        })?;

    let records: Vec<AttendanceData> =
        persistence.list_attendance_for_month(employee.employee_id, period)?;
    let (attendance, overtime_shifts): (AttendanceCounts, Decimal) = attendance_totals(period, &records)?;
    let deductions: Vec<DeductionData> = persistence.list_deductions(Some(employee.employee_id))?;

    let breakdown: PayrollBreakdown = compute_payroll(&PayrollInputs {
        period,
        daily_wage: stored_decimal("daily wage", &wage.daily_wage)?,
        attendance,
        overtime_shifts,
        pf_applicable: employee.pf_applicable,
        esic_applicable: employee.esic_applicable,
        deductions: installments_due(&deductions, period)?,
        adjustments,
    })?;
    debug!(
        employee_id = employee.employee_id,
        %period,
        net = %breakdown.net_salary,
        "Computed salary"
    );

    Ok(EmployeeSalary {
        employee_id: employee.employee_id,
        employee_name: employee.full_name(),
        department_id: employee.department_id,
        site_id: employee.site_id.clone(),
        salary_code: salary_code.to_string(),
        breakdown,
    })
}

/// Computes one employee's salary.
///
/// # Errors
///
/// Returns an error if an employee user asks for someone else's salary,
/// the employee or an effective wage master is missing, or an adjustment
/// is negative or too large.
pub fn calculate_individual_salary(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    request: IndividualSalaryRequest,
) -> Result<EmployeeSalary, ApiError> {
    AuthorizationService::require_admin_or_self(actor, request.employee_id, "calculate_salary")?;
    let period: PayrollMonth = PayrollMonth::new(request.year, request.month)?;
    let employee: EmployeeData = require_employee(persistence, request.employee_id)?;
    salary_for(persistence, &employee, period, request.adjustments)
}

/// Computes salaries for every active employee, optionally for one site.
///
/// Failures are collected per employee; the batch always completes.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the month is invalid,
/// or the net salaries cannot be totalled.
pub fn calculate_monthly_salary(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    mut request: MonthlySalaryRequest,
) -> Result<MonthlySalaryResponse, ApiError> {
    AuthorizationService::require_admin(actor, "calculate_monthly_salary")?;
    let period: PayrollMonth = PayrollMonth::new(request.year, request.month)?;
    let site_id: Option<String> = clean(request.site_id.take());

    let employees: Vec<EmployeeData> = persistence
        .list_employees(&EmployeeFilter {
            employment_status: Some(EmploymentStatus::Active),
            ..EmployeeFilter::default()
        })?
        .into_iter()
        .filter(|e| site_id.is_none() || e.site_id == site_id)
        .collect();

    let mut salaries: Vec<EmployeeSalary> = Vec::with_capacity(employees.len());
    let mut failures: Vec<SalaryFailure> = Vec::new();
    for employee in &employees {
        let adjustments: PayrollAdjustments = request
            .adjustments
            .remove(&employee.employee_id)
            .unwrap_or_default();
        match salary_for(persistence, employee, period, adjustments) {
            Ok(salary) => salaries.push(salary),
            Err(e) => {
                warn!(employee_id = employee.employee_id, error = %e, "Salary calculation failed");
                failures.push(SalaryFailure {
                    employee_id: employee.employee_id,
                    employee_name: employee.full_name(),
                    error: e.to_string(),
                });
            }
        }
    }

    let total_net_salary: Decimal =
        checked_sum("total_net_salary", salaries.iter().map(|s| s.breakdown.net_salary))?;
    info!(
        %period,
        processed = salaries.len(),
        failed = failures.len(),
        "Monthly payroll computed"
    );

    Ok(MonthlySalaryResponse {
        period: period.to_string(),
        processed_count: salaries.len(),
        failed_count: failures.len(),
        total_net_salary,
        salaries,
        failures,
    })
}
