// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// A value rejected by the domain rules before it reaches storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Attendance status is not one of the accepted spellings.
    InvalidAttendanceStatus(String),
    /// A person's name is empty or invalid.
    InvalidName(String),
    /// Email address is malformed.
    InvalidEmail(String),
    /// Phone number is not 10 digits.
    InvalidPhone(String),
    /// Aadhaar number is not 12 digits.
    InvalidAadhaar(String),
    /// PAN does not match the `ABCDE1234F` layout.
    InvalidPan(String),
    /// Role is not recognised.
    InvalidRole(String),
    /// Employment status is not recognised.
    InvalidEmploymentStatus(String),
    /// Marital status is not recognised.
    InvalidMaritalStatus(String),
    /// Holiday type is not recognised.
    InvalidHolidayType(String),
    /// Payroll month is out of range or malformed.
    InvalidPayrollMonth(String),
    /// Not a `YYYY-MM-DD` calendar date.
    DateParseError { date_string: String, error: String },
    /// A monetary or quantity field has an unacceptable value.
    InvalidAmount {
        /// The offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
    /// An installment deduction must span at least one month and end
    /// inside the supported calendar.
    InvalidDeductionMonths(i64),
    /// A wage master's effective period ends before it starts.
    InvalidEffectivePeriod {
        /// Start of the period.
        from: time::Date,
        /// End of the period.
        to: time::Date,
    },
    /// Stepping a date ran past the supported calendar range.
    DateArithmeticOverflow { operation: String },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAttendanceStatus(value) => write!(
                f,
                "Invalid attendance status '{value}': expected Present, Absent or OFF"
            ),
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::InvalidEmail(msg) => write!(f, "Invalid email: {msg}"),
            Self::InvalidPhone(msg) => write!(f, "Invalid phone number: {msg}"),
            Self::InvalidAadhaar(msg) => write!(f, "Invalid Aadhaar number: {msg}"),
            Self::InvalidPan(msg) => write!(f, "Invalid PAN: {msg}"),
            Self::InvalidRole(value) => write!(f, "Invalid role: {value}"),
            Self::InvalidEmploymentStatus(value) => {
                write!(f, "Invalid employment status: {value}")
            }
            Self::InvalidMaritalStatus(value) => write!(f, "Invalid marital status: {value}"),
            Self::InvalidHolidayType(value) => write!(f, "Invalid holiday type: {value}"),
            Self::InvalidPayrollMonth(msg) => write!(f, "Invalid payroll month: {msg}"),
            Self::DateParseError { date_string, error } => {
                write!(f, "'{date_string}' is not a YYYY-MM-DD date ({error})")
            }
            Self::InvalidAmount { field, reason } => write!(f, "Invalid {field}: {reason}"),
            Self::InvalidDeductionMonths(months) => write!(
                f,
                "Deduction must run for at least one month and end by December 2200, got {months} months"
            ),
            Self::InvalidEffectivePeriod { from, to } => write!(
                f,
                "Effective period ends ({to}) before it starts ({from})"
            ),
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date out of range while {operation}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
