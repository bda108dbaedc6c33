// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::macros::format_description;
use time::{Date, Month};

/// The first identifier handed out by the employee ID sequence.
pub const EMPLOYEE_ID_BASE: i64 = 91_510_001;

/// Parses an ISO `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string is not a valid date.
pub fn parse_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]")).map_err(|e| {
        DomainError::DateParseError {
            date_string: value.to_string(),
            error: e.to_string(),
        }
    })
}

/// Formats a date as ISO `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Access role of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative access.
    Admin,
    /// Self-service access to the linked employee record.
    Employee,
}

impl Role {
    /// Converts this role to its stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Employee => "employee",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "employee" => Ok(Self::Employee),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Employment state of an employee. Employees are never deleted;
/// termination moves them to `Inactive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EmploymentStatus {
    #[default]
    Active,
    Inactive,
    #[serde(rename = "On Leave")]
    OnLeave,
}

impl EmploymentStatus {
    /// Converts this status to its stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::OnLeave => "On Leave",
        }
    }
}

impl FromStr for EmploymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "on leave" | "on_leave" | "onleave" => Ok(Self::OnLeave),
            _ => Err(DomainError::InvalidEmploymentStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for EmploymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaritalStatus {
    Single,
    Married,
    Divorced,
    Widowed,
}

impl MaritalStatus {
    /// Converts this status to its stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::Married => "Married",
            Self::Divorced => "Divorced",
            Self::Widowed => "Widowed",
        }
    }
}

impl FromStr for MaritalStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "married" => Ok(Self::Married),
            "divorced" => Ok(Self::Divorced),
            "widowed" => Ok(Self::Widowed),
            _ => Err(DomainError::InvalidMaritalStatus(s.to_string())),
        }
    }
}

/// Category of a holiday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HolidayType {
    National,
    Regional,
    Company,
    Optional,
}

impl HolidayType {
    /// Converts this type to its stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::National => "National",
            Self::Regional => "Regional",
            Self::Company => "Company",
            Self::Optional => "Optional",
        }
    }
}

impl FromStr for HolidayType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "national" => Ok(Self::National),
            "regional" => Ok(Self::Regional),
            "company" => Ok(Self::Company),
            "optional" => Ok(Self::Optional),
            _ => Err(DomainError::InvalidHolidayType(s.to_string())),
        }
    }
}

/// A calendar month used as the unit of payroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PayrollMonth {
    year: i32,
    month: u8,
}

impl PayrollMonth {
    /// Creates a payroll month.
    ///
    /// # Arguments
    ///
    /// * `year` - Calendar year (1900-2200)
    /// * `month` - Month number, 1-12
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPayrollMonth` if either value is out of range.
    pub fn new(year: i32, month: u8) -> Result<Self, DomainError> {
        if !(1900..=2200).contains(&year) {
            return Err(DomainError::InvalidPayrollMonth(format!(
                "year must be between 1900 and 2200, got {year}"
            )));
        }
        if !(1..=12).contains(&month) {
            return Err(DomainError::InvalidPayrollMonth(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        Ok(Self { year, month })
    }

    /// Returns the month containing `date`.
    #[must_use]
    pub fn containing(date: Date) -> Self {
        Self {
            year: date.year(),
            month: u8::from(date.month()),
        }
    }

    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    #[must_use]
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// First calendar day of the month.
    ///
    /// # Errors
    ///
    /// Returns an error if the date cannot be represented.
    pub fn first_day(&self) -> Result<Date, DomainError> {
        let month: Month =
            Month::try_from(self.month).map_err(|e| DomainError::InvalidPayrollMonth(e.to_string()))?;
        Date::from_calendar_date(self.year, month, 1)
            .map_err(|e| DomainError::InvalidPayrollMonth(e.to_string()))
    }

    /// Returns the following calendar month.
    ///
    /// # Errors
    ///
    /// Returns an error if the result leaves the supported year range.
    pub fn next(&self) -> Result<Self, DomainError> {
        if self.month == 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }

    /// Last calendar day of the month.
    ///
    /// # Errors
    ///
    /// Returns an error if the date cannot be represented.
    pub fn last_day(&self) -> Result<Date, DomainError> {
        let first: Date = self.first_day()?;
        let days: u8 = self.days_in_month()?;
        first
            .replace_day(days)
            .map_err(|_| DomainError::DateArithmeticOverflow {
                operation: format!("computing the last day of {self}"),
            })
    }

    /// Number of calendar days in the month.
    ///
    /// # Errors
    ///
    /// Returns an error if the month boundaries cannot be represented.
    pub fn days_in_month(&self) -> Result<u8, DomainError> {
        let first: Date = self.first_day()?;
        let next_first: Date = self.next()?.first_day()?;
        let days: i64 = (next_first - first).whole_days();
        u8::try_from(days).map_err(|_| DomainError::DateArithmeticOverflow {
            operation: format!("counting days in {self}"),
        })
    }

    /// Whether `date` falls inside this month.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        date.year() == self.year && u8::from(date.month()) == self.month
    }

    /// Signed number of months from `self` to `other`.
    #[must_use]
    pub fn months_until(&self, other: Self) -> i64 {
        let from: i64 = i64::from(self.year) * 12 + i64::from(self.month);
        let to: i64 = i64::from(other.year) * 12 + i64::from(other.month);
        to - from
    }
}

impl FromStr for PayrollMonth {
    type Err = DomainError;

    /// Parses `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed: &str = s.trim();
        let (year, month) = trimmed
            .split_once('-')
            .ok_or_else(|| DomainError::InvalidPayrollMonth(format!("expected YYYY-MM, got '{s}'")))?;
        let year: i32 = year
            .parse()
            .map_err(|_| DomainError::InvalidPayrollMonth(format!("invalid year in '{s}'")))?;
        let month: u8 = month
            .parse()
            .map_err(|_| DomainError::InvalidPayrollMonth(format!("invalid month in '{s}'")))?;
        Self::new(year, month)
    }
}

impl std::fmt::Display for PayrollMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
