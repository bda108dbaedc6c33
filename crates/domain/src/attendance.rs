// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::PayrollMonth;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use time::Date;

/// The only attendance statuses that are ever persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
    #[serde(rename = "OFF")]
    Off,
}

impl AttendanceStatus {
    /// Converts this status to its stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::Absent => "Absent",
            Self::Off => "OFF",
        }
    }

    /// Normalizes user-supplied input to a storable status.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Legacy values are folded one way: `late` is recorded as Present and
    /// `half-day` as Absent. The original spelling is not retained.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAttendanceStatus` for anything else.
    pub fn normalize(input: &str) -> Result<Self, DomainError> {
        let lowered: String = input.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "present" | "p" | "late" => Ok(Self::Present),
            "absent" | "a" | "half-day" | "half day" | "halfday" | "half_day" => Ok(Self::Absent),
            "off" | "o" => Ok(Self::Off),
            _ => Err(DomainError::InvalidAttendanceStatus(input.to_string())),
        }
    }
}

impl FromStr for AttendanceStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalize(s)
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const HOURS_PER_SHIFT: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Converts overtime hours to shifts of 8 hours, rounded to the nearest
/// half shift.
#[must_use]
pub fn overtime_hours_to_shifts(hours: Decimal) -> Decimal {
    (hours / HOURS_PER_SHIFT * Decimal::TWO)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        / Decimal::TWO
}

/// Attendance totals for one employee over one payroll month.
///
/// `absent_days` already includes `unmarked_days`: a day with no
/// attendance record is treated as an absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceCounts {
    pub present_days: u32,
    pub absent_days: u32,
    pub off_days: u32,
    pub unmarked_days: u32,
    pub days_in_month: u32,
}

/// Tallies attendance records for a month.
///
/// Records outside the month are ignored. If the same date appears more
/// than once the last record wins.
///
/// # Arguments
///
/// * `period` - The month to tally
/// * `records` - `(date, status)` pairs for a single employee
///
/// # Errors
///
/// Returns an error if the month length cannot be computed.
pub fn tally_attendance<I>(period: PayrollMonth, records: I) -> Result<AttendanceCounts, DomainError>
where
    I: IntoIterator<Item = (Date, AttendanceStatus)>,
{
    let days_in_month: u32 = u32::from(period.days_in_month()?);

    let by_day: BTreeMap<Date, AttendanceStatus> = records
        .into_iter()
        .filter(|(date, _)| period.contains(*date))
        .collect();

    let mut present_days: u32 = 0;
    let mut marked_absent: u32 = 0;
    let mut off_days: u32 = 0;
    for status in by_day.values() {
        match status {
            AttendanceStatus::Present => present_days += 1,
            AttendanceStatus::Absent => marked_absent += 1,
            AttendanceStatus::Off => off_days += 1,
        }
    }

    let marked: u32 = present_days + marked_absent + off_days;
    let unmarked_days: u32 = days_in_month.saturating_sub(marked);

    Ok(AttendanceCounts {
        present_days,
        absent_days: marked_absent + unmarked_days,
        off_days,
        unmarked_days,
        days_in_month,
    })
}
