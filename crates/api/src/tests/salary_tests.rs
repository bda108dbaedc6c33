// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for individual and monthly payroll runs.

use std::collections::BTreeMap;

use ems_domain::PayrollAdjustments;
use ems_persistence::Persistence;

use crate::error::ApiError;
use crate::handlers::{
    bulk_mark_attendance, calculate_individual_salary, calculate_monthly_salary, create_deduction,
    deactivate_wage_master, list_wage_masters, update_employee,
};
use crate::request_response::{
    BulkMarkAttendanceRequest, CreateDeductionRequest, IndividualSalaryRequest,
    MarkAttendanceRequest, MonthlySalaryRequest, UpdateEmployeeRequest, WageMasterQuery,
};
use crate::tests::helpers::{
    create_paid_employee, create_test_admin, create_test_employee, create_test_employee_user,
    create_test_persistence, create_test_wage, dec,
};

/// Marks April 2025: days 1-20 Present, 21-25 Absent, 26-30 OFF.
fn mark_april(persistence: &mut Persistence, employee_id: i64) {
    let attendance_records: Vec<MarkAttendanceRequest> = (1..=30)
        .map(|day| MarkAttendanceRequest {
            employee_id,
            attendance_date: format!("2025-04-{day:02}"),
            attendance_status: String::from(match day {
                1..=20 => "Present",
                21..=25 => "Absent",
                _ => "OFF",
            }),
            check_in_time: None,
            check_out_time: None,
            overtime_shifts: None,
            overtime_hours: None,
            remarks: None,
        })
        .collect();
    let response = bulk_mark_attendance(
        persistence,
        &create_test_admin(),
        BulkMarkAttendanceRequest { attendance_records },
    )
    .unwrap();
    assert_eq!(response.successful_count, 30);
}

fn april_request(employee_id: i64) -> IndividualSalaryRequest {
    IndividualSalaryRequest {
        employee_id,
        year: 2025,
        month: 4,
        adjustments: PayrollAdjustments::default(),
    }
}

#[test]
fn test_twenty_present_days_at_500_gross_10000() {
    let mut persistence = create_test_persistence();
    create_test_wage(&mut persistence, "500");
    let employee = create_paid_employee(&mut persistence, "Asha");
    mark_april(&mut persistence, employee.employee_id);

    let salary =
        calculate_individual_salary(&mut persistence, &create_test_admin(), april_request(employee.employee_id))
            .unwrap();

    let breakdown = salary.breakdown;
    assert_eq!(breakdown.days_in_month, 30);
    assert_eq!(breakdown.present_days, 20);
    assert_eq!(breakdown.absent_days, 5);
    assert_eq!(breakdown.off_days, 5);
    assert_eq!(breakdown.basic, dec("10000"));
    assert_eq!(breakdown.total_earnings, dec("10000"));
    assert_eq!(breakdown.net_salary, dec("10000"));
}

#[test]
fn test_configured_deductions_reduce_net() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin();
    create_test_wage(&mut persistence, "500");
    let employee = create_paid_employee(&mut persistence, "Asha");
    mark_april(&mut persistence, employee.employee_id);
    update_employee(
        &mut persistence,
        &admin,
        employee.employee_id,
        UpdateEmployeeRequest {
            pf_applicable: Some(true),
            ..UpdateEmployeeRequest::default()
        },
    )
    .unwrap();
    create_deduction(
        &mut persistence,
        &admin,
        CreateDeductionRequest {
            employee_id: employee.employee_id,
            deduction_type: String::from("Loan"),
            total_amount: dec("3000"),
            months: 3,
            start_month: String::from("2025-03"),
        },
    )
    .unwrap();

    let breakdown = calculate_individual_salary(&mut persistence, &admin, april_request(employee.employee_id))
        .unwrap()
        .breakdown;

    assert_eq!(breakdown.pf, dec("1200"));
    assert_eq!(breakdown.installment_total, dec("1000"));
    assert_eq!(breakdown.deductions.len(), 1);
    assert_eq!(breakdown.net_salary, dec("7800"));
}

#[test]
fn test_salary_calculation_is_idempotent() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin();
    create_test_wage(&mut persistence, "500");
    let employee = create_paid_employee(&mut persistence, "Asha");
    mark_april(&mut persistence, employee.employee_id);

    let first = calculate_individual_salary(&mut persistence, &admin, april_request(employee.employee_id)).unwrap();
    let second = calculate_individual_salary(&mut persistence, &admin, april_request(employee.employee_id)).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_missing_wage_master_is_not_found() {
    let mut persistence = create_test_persistence();
    create_test_wage(&mut persistence, "500");
    let employee = create_paid_employee(&mut persistence, "Asha");

    let mut request = april_request(employee.employee_id);
    request.year = 2024;
    let result = calculate_individual_salary(&mut persistence, &create_test_admin(), request);

    match result.unwrap_err() {
        ApiError::ResourceNotFound { resource_type, .. } => assert_eq!(resource_type, "Wage master"),
        other => panic!("Expected ResourceNotFound error, got: {other:?}"),
    }
}

#[test]
fn test_deactivated_wage_master_is_not_found() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin();
    create_test_wage(&mut persistence, "500");
    let employee = create_paid_employee(&mut persistence, "Asha");
    mark_april(&mut persistence, employee.employee_id);
    calculate_individual_salary(&mut persistence, &admin, april_request(employee.employee_id)).unwrap();

    let wage_master_id = list_wage_masters(&mut persistence, &admin, WageMasterQuery::default())
        .unwrap()
        .wage_masters[0]
        .wage_master_id;
    deactivate_wage_master(&mut persistence, &admin, wage_master_id).unwrap();
    let result = calculate_individual_salary(&mut persistence, &admin, april_request(employee.employee_id));

    match result.unwrap_err() {
        ApiError::ResourceNotFound { resource_type, .. } => assert_eq!(resource_type, "Wage master"),
        other => panic!("Expected ResourceNotFound error, got: {other:?}"),
    }
}

#[test]
fn test_employee_may_only_calculate_own_salary() {
    let mut persistence = create_test_persistence();
    create_test_wage(&mut persistence, "500");
    let own = create_paid_employee(&mut persistence, "Asha");
    let other = create_paid_employee(&mut persistence, "Bala");
    let user = create_test_employee_user(own.employee_id);

    assert!(calculate_individual_salary(&mut persistence, &user, april_request(own.employee_id)).is_ok());
    assert!(matches!(
        calculate_individual_salary(&mut persistence, &user, april_request(other.employee_id)),
        Err(ApiError::Unauthorized { .. })
    ));
}

#[test]
fn test_monthly_run_collects_failures_without_aborting() {
    let mut persistence = create_test_persistence();
    create_test_wage(&mut persistence, "500");
    let paid = create_paid_employee(&mut persistence, "Asha");
    let unpaid = create_test_employee(&mut persistence, "Bala");
    mark_april(&mut persistence, paid.employee_id);

    let mut adjustments: BTreeMap<i64, PayrollAdjustments> = BTreeMap::new();
    adjustments.insert(
        paid.employee_id,
        PayrollAdjustments {
            hra: dec("500"),
            ..PayrollAdjustments::default()
        },
    );
    let response = calculate_monthly_salary(
        &mut persistence,
        &create_test_admin(),
        MonthlySalaryRequest {
            year: 2025,
            month: 4,
            site_id: None,
            adjustments,
        },
    )
    .unwrap();

    assert_eq!(response.processed_count, 1);
    assert_eq!(response.failed_count, 1);
    assert_eq!(response.failures[0].employee_id, unpaid.employee_id);
    assert_eq!(response.total_net_salary, dec("10500"));
}

#[test]
fn test_monthly_run_filters_by_site() {
    let mut persistence = create_test_persistence();
    create_test_wage(&mut persistence, "500");
    create_paid_employee(&mut persistence, "Asha");
    create_test_employee(&mut persistence, "Bala");

    let response = calculate_monthly_salary(
        &mut persistence,
        &create_test_admin(),
        MonthlySalaryRequest {
            year: 2025,
            month: 4,
            site_id: Some(String::from("S1")),
            adjustments: BTreeMap::new(),
        },
    )
    .unwrap();

    assert_eq!(response.processed_count, 1);
    assert_eq!(response.failed_count, 0);
}

#[test]
fn test_monthly_run_requires_admin() {
    let mut persistence = create_test_persistence();
    let employee = create_test_employee(&mut persistence, "Asha");

    let result = calculate_monthly_salary(
        &mut persistence,
        &create_test_employee_user(employee.employee_id),
        MonthlySalaryRequest {
            year: 2025,
            month: 4,
            site_id: None,
            adjustments: BTreeMap::new(),
        },
    );

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_oversized_adjustments_are_invalid_input() {
    let mut persistence = create_test_persistence();
    create_test_wage(&mut persistence, "500");
    let own = create_paid_employee(&mut persistence, "Asha");
    mark_april(&mut persistence, own.employee_id);
    let user = create_test_employee_user(own.employee_id);

    let mut request = april_request(own.employee_id);
    request.adjustments = PayrollAdjustments {
        special_basic: dec("70000000000000000000000000000"),
        da: dec("70000000000000000000000000000"),
        ..PayrollAdjustments::default()
    };

    match calculate_individual_salary(&mut persistence, &user, request) {
        Err(ApiError::InvalidInput { field, .. }) => assert_eq!(field, "special_basic"),
        other => panic!("Expected InvalidInput error, got: {other:?}"),
    }
}
