// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Installment deductions.
//!
//! A loan or advance is recovered in equal monthly parts starting at a
//! given month. The final installment absorbs any rounding remainder so
//! that the installments always sum to the original amount.

use crate::error::DomainError;
use crate::payroll::{check_amount, money};
use crate::types::PayrollMonth;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Recovery schedule for a single deduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentPlan {
    total_amount: Decimal,
    months: u32,
    start: PayrollMonth,
}

impl InstallmentPlan {
    /// Creates a validated plan.
    ///
    /// # Arguments
    ///
    /// * `total_amount` - Amount to recover, positive and at most `MAX_AMOUNT`
    /// * `months` - Number of installments, at least 1
    /// * `start` - Month of the first installment
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is out of range, or if `months` is
    /// not positive or runs the schedule past the last supported month.
    pub fn new(total_amount: Decimal, months: i64, start: PayrollMonth) -> Result<Self, DomainError> {
        if total_amount <= Decimal::ZERO {
            return Err(DomainError::InvalidAmount {
                field: "total_amount",
                reason: String::from("must be greater than zero"),
            });
        }
        check_amount("total_amount", total_amount)?;
        let invalid_months = || DomainError::InvalidDeductionMonths(months);
        let plan: Self = Self {
            total_amount,
            months: u32::try_from(months)
                .ok()
                .filter(|m| *m > 0)
                .ok_or_else(invalid_months)?,
            start,
        };
        plan.end_month().map_err(|_| invalid_months())?;
        Ok(plan)
    }

    #[must_use]
    pub const fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    #[must_use]
    pub const fn months(&self) -> u32 {
        self.months
    }

    #[must_use]
    pub const fn start(&self) -> PayrollMonth {
        self.start
    }

    /// Month of the final installment.
    ///
    /// # Errors
    ///
    /// Returns an error if the month leaves the supported year range.
    pub fn end_month(&self) -> Result<PayrollMonth, DomainError> {
        (1..self.months).try_fold(self.start, |month, _| month.next())
    }

    /// The regular monthly installment, rounded to paise.
    #[must_use]
    pub fn monthly_installment(&self) -> Decimal {
        money(self.total_amount / Decimal::from(self.months))
    }

    /// Whether an installment falls due in `period`.
    #[must_use]
    pub fn is_active_in(&self, period: PayrollMonth) -> bool {
        let offset: i64 = self.start.months_until(period);
        offset >= 0 && offset < i64::from(self.months)
    }

    /// The amount due in `period`, if any.
    ///
    /// The last installment is whatever remains after the regular ones.
    #[must_use]
    pub fn installment_for(&self, period: PayrollMonth) -> Option<Decimal> {
        if !self.is_active_in(period) {
            return None;
        }
        let regular: Decimal = self.monthly_installment();
        let offset: i64 = self.start.months_until(period);
        if offset == i64::from(self.months) - 1 {
            let paid_before: Decimal = regular * Decimal::from(self.months - 1);
            Some(money(self.total_amount - paid_before))
        } else {
            Some(regular)
        }
    }
}
