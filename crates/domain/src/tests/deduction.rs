// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DomainError, InstallmentPlan, MAX_AMOUNT, PayrollMonth};
use rust_decimal::Decimal;
use std::str::FromStr;

fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

#[test]
fn test_plan_rejects_invalid_inputs() {
    let start: PayrollMonth = PayrollMonth::new(2025, 1).unwrap();
    assert!(matches!(
        InstallmentPlan::new(dec("0"), 3, start),
        Err(DomainError::InvalidAmount { .. })
    ));
    assert!(matches!(
        InstallmentPlan::new(dec("100"), 0, start),
        Err(DomainError::InvalidDeductionMonths(0))
    ));
    assert!(InstallmentPlan::new(dec("100"), -2, start).is_err());
}

#[test]
fn test_plan_is_active_for_its_window_only() {
    let start: PayrollMonth = PayrollMonth::new(2024, 11).unwrap();
    let plan: InstallmentPlan = InstallmentPlan::new(dec("3000"), 3, start).unwrap();

    assert!(!plan.is_active_in(PayrollMonth::new(2024, 10).unwrap()));
    assert!(plan.is_active_in(PayrollMonth::new(2024, 11).unwrap()));
    assert!(plan.is_active_in(PayrollMonth::new(2025, 1).unwrap()));
    assert!(!plan.is_active_in(PayrollMonth::new(2025, 2).unwrap()));
}

#[test]
fn test_installments_sum_to_total() {
    let start: PayrollMonth = PayrollMonth::new(2025, 1).unwrap();
    let plan: InstallmentPlan = InstallmentPlan::new(dec("1000"), 3, start).unwrap();

    assert_eq!(plan.monthly_installment(), dec("333.33"));
    let mut total: Decimal = Decimal::ZERO;
    let mut month: PayrollMonth = start;
    for _ in 0..3 {
        total += plan.installment_for(month).unwrap();
        month = month.next().unwrap();
    }
    assert_eq!(total, dec("1000.00"));
    assert_eq!(plan.installment_for(PayrollMonth::new(2025, 3).unwrap()), Some(dec("333.34")));
    assert_eq!(plan.installment_for(month), None);
}

#[test]
fn test_end_month_crosses_year_boundary() {
    let start: PayrollMonth = PayrollMonth::new(2024, 11).unwrap();
    let plan: InstallmentPlan = InstallmentPlan::new(dec("3000"), 3, start).unwrap();
    assert_eq!(plan.end_month().unwrap(), PayrollMonth::new(2025, 1).unwrap());

    let single: InstallmentPlan = InstallmentPlan::new(dec("500"), 1, start).unwrap();
    assert_eq!(single.end_month().unwrap(), start);
}

#[test]
fn test_plan_must_end_inside_the_calendar() {
    let start: PayrollMonth = PayrollMonth::new(2200, 6).unwrap();

    let last_possible: InstallmentPlan = InstallmentPlan::new(dec("700"), 7, start).unwrap();
    assert_eq!(last_possible.end_month().unwrap(), PayrollMonth::new(2200, 12).unwrap());

    assert!(matches!(
        InstallmentPlan::new(dec("800"), 8, start),
        Err(DomainError::InvalidDeductionMonths(8))
    ));
    assert!(matches!(
        InstallmentPlan::new(dec("800"), i64::from(u32::MAX), start),
        Err(DomainError::InvalidDeductionMonths(_))
    ));
}

#[test]
fn test_plan_total_is_capped() {
    let start: PayrollMonth = PayrollMonth::new(2025, 1).unwrap();

    let plan: InstallmentPlan = InstallmentPlan::new(MAX_AMOUNT, 3, start).unwrap();
    let paid: Decimal = (0..3)
        .map(|offset| {
            let period: PayrollMonth = (0..offset).fold(start, |m, _| m.next().unwrap());
            plan.installment_for(period).unwrap()
        })
        .sum();
    assert_eq!(paid, MAX_AMOUNT);

    assert!(matches!(
        InstallmentPlan::new(MAX_AMOUNT + Decimal::ONE, 3, start),
        Err(DomainError::InvalidAmount { field: "total_amount", .. })
    ));
}
