// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod attendance;
mod deduction;
mod error;
mod payroll;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use attendance::{
    AttendanceCounts, AttendanceStatus, overtime_hours_to_shifts, tally_attendance,
};
pub use deduction::InstallmentPlan;
pub use error::DomainError;
pub use payroll::{
    AppliedDeduction, ESIC_RATE, ESIC_WAGE_CEILING, MAX_AMOUNT, MAX_DAILY_OVERTIME_SHIFTS,
    PF_RATE, PF_WAGE_CEILING, PayrollAdjustments, PayrollBreakdown, PayrollInputs, check_amount,
    check_daily_overtime, checked_sum, compute_payroll, money,
};
pub use types::{
    EMPLOYEE_ID_BASE, EmploymentStatus, HolidayType, MaritalStatus, PayrollMonth, Role,
    format_date, parse_date,
};
pub use validation::{
    validate_aadhaar, validate_email, validate_pan, validate_person_name, validate_phone,
};
