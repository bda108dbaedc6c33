// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Monthly payroll computation.
//!
//! Everything here is a pure function of its inputs: the same attendance,
//! wage and deduction data always produce the same breakdown.
//!
//! ## Rules
//!
//! - `basic = present_days × daily_wage`
//! - overtime is paid per shift at the daily wage (8 hours at `daily_wage / 8`)
//! - PF is 12% of basic, capped at a basic of 15000, when applicable
//! - ESIC is 0.75% of basic, capped at a basic of 21000, when applicable
//! - every active installment deduction is subtracted in full
//! - net = total earnings − total deductions, and may be negative
//!
//! Money inputs are capped at [`MAX_AMOUNT`] and every sum and product is
//! checked, so a computation fails with `InvalidAmount` rather than
//! overflowing.

use crate::attendance::AttendanceCounts;
use crate::error::DomainError;
use crate::types::PayrollMonth;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Basic pay above which PF stops growing.
pub const PF_WAGE_CEILING: Decimal = Decimal::from_parts(15_000, 0, 0, false, 0);
/// Basic pay above which ESIC stops growing.
pub const ESIC_WAGE_CEILING: Decimal = Decimal::from_parts(21_000, 0, 0, false, 0);
/// PF employee contribution rate (12%).
pub const PF_RATE: Decimal = Decimal::from_parts(12, 0, 0, false, 2);
/// ESIC employee contribution rate (0.75%).
pub const ESIC_RATE: Decimal = Decimal::from_parts(75, 0, 0, false, 4);

/// Ceiling for any single money input: 10^12 rupees.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);
/// Most overtime one attendance record may carry: three shifts, a full day.
pub const MAX_DAILY_OVERTIME_SHIFTS: Decimal = Decimal::from_parts(3, 0, 0, false, 0);

fn too_large(field: &'static str) -> DomainError {
    DomainError::InvalidAmount {
        field,
        reason: String::from("is too large"),
    }
}

/// Accepts `value` if it lies in `0..=MAX_AMOUNT`.
///
/// # Errors
///
/// Returns `DomainError::InvalidAmount` for a negative or oversized value.
pub fn check_amount(field: &'static str, value: Decimal) -> Result<Decimal, DomainError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(DomainError::InvalidAmount {
            field,
            reason: String::from("must not be negative"),
        });
    }
    if value > MAX_AMOUNT {
        return Err(DomainError::InvalidAmount {
            field,
            reason: format!("must not exceed {MAX_AMOUNT}"),
        });
    }
    Ok(value)
}

/// Accepts overtime for one attendance record.
///
/// # Errors
///
/// Returns `DomainError::InvalidAmount` if `shifts` is negative or above
/// [`MAX_DAILY_OVERTIME_SHIFTS`].
pub fn check_daily_overtime(shifts: Decimal) -> Result<Decimal, DomainError> {
    if shifts.is_sign_negative() && !shifts.is_zero() {
        return Err(DomainError::InvalidAmount {
            field: "overtime_shifts",
            reason: String::from("must not be negative"),
        });
    }
    if shifts > MAX_DAILY_OVERTIME_SHIFTS {
        return Err(DomainError::InvalidAmount {
            field: "overtime_shifts",
            reason: format!("must not exceed {MAX_DAILY_OVERTIME_SHIFTS} shifts in a day"),
        });
    }
    Ok(shifts)
}

/// Adds `values`, failing instead of overflowing.
///
/// # Errors
///
/// Returns `DomainError::InvalidAmount` naming `field` on overflow.
pub fn checked_sum(
    field: &'static str,
    values: impl IntoIterator<Item = Decimal>,
) -> Result<Decimal, DomainError> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, Decimal::checked_add)
        .ok_or_else(|| too_large(field))
}

fn checked_product(field: &'static str, a: Decimal, b: Decimal) -> Result<Decimal, DomainError> {
    a.checked_mul(b).ok_or_else(|| too_large(field))
}

/// Rounds a monetary value to two places, midpoint away from zero, and
/// fixes the scale at two so amounts always render as `0.00`.
#[must_use]
pub fn money(value: Decimal) -> Decimal {
    let mut rounded: Decimal = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Manual earnings and recoveries entered for a payroll run.
///
/// The aliases accept the column names used by payroll spreadsheets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollAdjustments {
    #[serde(alias = "Special Basic")]
    pub special_basic: Decimal,
    #[serde(alias = "DA")]
    pub da: Decimal,
    #[serde(alias = "HRA")]
    pub hra: Decimal,
    #[serde(alias = "Overtime")]
    pub overtime: Decimal,
    #[serde(alias = "Others")]
    pub others: Decimal,
    #[serde(alias = "Society")]
    pub society: Decimal,
    #[serde(alias = "Income Tax")]
    pub income_tax: Decimal,
    #[serde(alias = "Insurance")]
    pub insurance: Decimal,
    #[serde(alias = "Others Recoveries")]
    pub others_recoveries: Decimal,
}

impl PayrollAdjustments {
    /// Rejects negative or oversized adjustments.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAmount` naming the first bad field.
    pub fn validate(&self) -> Result<(), DomainError> {
        let fields: [(&'static str, Decimal); 9] = [
            ("special_basic", self.special_basic),
            ("da", self.da),
            ("hra", self.hra),
            ("overtime", self.overtime),
            ("others", self.others),
            ("society", self.society),
            ("income_tax", self.income_tax),
            ("insurance", self.insurance),
            ("others_recoveries", self.others_recoveries),
        ];
        for (field, value) in fields {
            check_amount(field, value)?;
        }
        Ok(())
    }
}

/// One installment deduction applied to a payroll run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedDeduction {
    pub deduction_id: i64,
    pub deduction_type: String,
    pub amount: Decimal,
}

/// Everything needed to compute one employee's pay for one month.
#[derive(Debug, Clone)]
pub struct PayrollInputs {
    pub period: PayrollMonth,
    pub daily_wage: Decimal,
    pub attendance: AttendanceCounts,
    pub overtime_shifts: Decimal,
    pub pf_applicable: bool,
    pub esic_applicable: bool,
    pub deductions: Vec<AppliedDeduction>,
    pub adjustments: PayrollAdjustments,
}

/// Itemised result of a payroll computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollBreakdown {
    pub period: String,
    pub days_in_month: u32,
    pub present_days: u32,
    pub absent_days: u32,
    pub off_days: u32,
    pub unmarked_days: u32,
    pub daily_wage: Decimal,
    pub overtime_shifts: Decimal,
    pub basic: Decimal,
    pub special_basic: Decimal,
    pub da: Decimal,
    pub hra: Decimal,
    pub overtime: Decimal,
    pub others: Decimal,
    pub total_earnings: Decimal,
    pub pf: Decimal,
    pub esic: Decimal,
    pub deductions: Vec<AppliedDeduction>,
    pub installment_total: Decimal,
    pub society: Decimal,
    pub income_tax: Decimal,
    pub insurance: Decimal,
    pub others_recoveries: Decimal,
    pub total_deductions: Decimal,
    pub net_salary: Decimal,
}

/// Computes a payroll breakdown.
///
/// # Arguments
///
/// * `inputs` - Attendance totals, wage rate, deductions and adjustments
///
/// # Errors
///
/// Returns `DomainError::InvalidAmount` if the daily wage is not positive,
/// overtime is negative or exceeds three shifts per day of the month, or
/// any wage, installment or adjustment is negative or above [`MAX_AMOUNT`].
pub fn compute_payroll(inputs: &PayrollInputs) -> Result<PayrollBreakdown, DomainError> {
    if inputs.daily_wage <= Decimal::ZERO {
        return Err(DomainError::InvalidAmount {
            field: "daily_wage",
            reason: String::from("must be greater than zero"),
        });
    }
    let daily_wage: Decimal = check_amount("daily_wage", inputs.daily_wage)?;
    let month_overtime_cap: Decimal =
        MAX_DAILY_OVERTIME_SHIFTS * Decimal::from(inputs.attendance.days_in_month);
    if inputs.overtime_shifts.is_sign_negative() && !inputs.overtime_shifts.is_zero() {
        return Err(DomainError::InvalidAmount {
            field: "overtime_shifts",
            reason: String::from("must not be negative"),
        });
    }
    if inputs.overtime_shifts > month_overtime_cap {
        return Err(DomainError::InvalidAmount {
            field: "overtime_shifts",
            reason: format!("must not exceed {month_overtime_cap} shifts in a month"),
        });
    }
    inputs.adjustments.validate()?;
    for deduction in &inputs.deductions {
        check_amount("installment", deduction.amount)?;
    }

    let adj: &PayrollAdjustments = &inputs.adjustments;

    let basic: Decimal = money(checked_product(
        "basic",
        Decimal::from(inputs.attendance.present_days),
        daily_wage,
    )?);
    let overtime_pay: Decimal = checked_product("overtime", inputs.overtime_shifts, daily_wage)?;
    let overtime: Decimal = money(checked_sum("overtime", [overtime_pay, adj.overtime])?);
    let special_basic: Decimal = money(adj.special_basic);
    let da: Decimal = money(adj.da);
    let hra: Decimal = money(adj.hra);
    let others: Decimal = money(adj.others);
    let total_earnings: Decimal = checked_sum(
        "total_earnings",
        [basic, special_basic, da, hra, overtime, others],
    )?;

    let pf: Decimal = if inputs.pf_applicable {
        money(PF_RATE * basic.min(PF_WAGE_CEILING))
    } else {
        money(Decimal::ZERO)
    };
    let esic: Decimal = if inputs.esic_applicable {
        money(ESIC_RATE * basic.min(ESIC_WAGE_CEILING))
    } else {
        money(Decimal::ZERO)
    };

    let deductions: Vec<AppliedDeduction> = inputs
        .deductions
        .iter()
        .map(|d| AppliedDeduction {
            deduction_id: d.deduction_id,
            deduction_type: d.deduction_type.clone(),
            amount: money(d.amount),
        })
        .collect();
    let installment_total: Decimal =
        money(checked_sum("installment_total", deductions.iter().map(|d| d.amount))?);

    let society: Decimal = money(adj.society);
    let income_tax: Decimal = money(adj.income_tax);
    let insurance: Decimal = money(adj.insurance);
    let others_recoveries: Decimal = money(adj.others_recoveries);
    let total_deductions: Decimal = checked_sum(
        "total_deductions",
        [pf, esic, installment_total, society, income_tax, insurance, others_recoveries],
    )?;

    let net_salary: Decimal = money(
        total_earnings
            .checked_sub(total_deductions)
            .ok_or_else(|| too_large("net_salary"))?,
    );

    Ok(PayrollBreakdown {
        period: inputs.period.to_string(),
        days_in_month: inputs.attendance.days_in_month,
        present_days: inputs.attendance.present_days,
        absent_days: inputs.attendance.absent_days,
        off_days: inputs.attendance.off_days,
        unmarked_days: inputs.attendance.unmarked_days,
        daily_wage: money(daily_wage),
        overtime_shifts: inputs.overtime_shifts,
        basic,
        special_basic,
        da,
        hra,
        overtime,
        others,
        total_earnings: money(total_earnings),
        pf,
        esic,
        deductions,
        installment_total,
        society,
        income_tax,
        insurance,
        others_recoveries,
        total_deductions: money(total_deductions),
        net_salary,
    })
}
