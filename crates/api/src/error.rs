// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Failures returned by the request handlers.
//!
//! `ApiError` is the contract the HTTP layer relies on: each variant maps
//! to exactly one status code there. Lower layers convert into it through
//! the `From` impls below.

use crate::password_policy::PasswordPolicyError;
use ems_domain::DomainError;
use ems_persistence::PersistenceError;
use thiserror::Error;
use tracing::error;

/// Raised while resolving who the caller is and what they may do.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Credentials or token were rejected.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },
    /// The caller is known but lacks the role for `action`.
    #[error("'{action}' is restricted to the {required_role} role")]
    Unauthorized {
        action: String,
        required_role: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },
    #[error("'{action}' is restricted to the {required_role} role")]
    Unauthorized {
        action: String,
        required_role: String,
    },
    /// The request is well formed but breaks a business rule, such as a
    /// wage master window overlapping an existing one.
    #[error("{message} ({rule})")]
    DomainRuleViolation { rule: String, message: String },
    /// `field` names the request field at fault.
    #[error("{field}: {message}")]
    InvalidInput { field: String, message: String },
    #[error("{resource_type} not found: {message}")]
    ResourceNotFound {
        resource_type: String,
        message: String,
    },
    /// Duplicate unique value or a dangling reference.
    #[error("{message}")]
    Conflict { message: String },
    /// Never shown to clients; the server logs it and answers with a
    /// generic body.
    #[error("{message}")]
    Internal { message: String },
    #[error("{message}")]
    PasswordPolicyViolation { message: String },
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        translate_domain_error(err)
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        translate_persistence_error(err)
    }
}

fn invalid(field: &str, err: &DomainError) -> ApiError {
    ApiError::InvalidInput {
        field: field.to_string(),
        message: err.to_string(),
    }
}

/// Maps a domain failure onto the request field that caused it. Domain
/// errors always describe bad input.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match &err {
        DomainError::InvalidAttendanceStatus(_) => invalid("status", &err),
        DomainError::InvalidName(_) => invalid("name", &err),
        DomainError::InvalidEmail(_) => invalid("email", &err),
        DomainError::InvalidPhone(_) => invalid("phone", &err),
        DomainError::InvalidAadhaar(_) => invalid("adhar_number", &err),
        DomainError::InvalidPan(_) => invalid("pan_number", &err),
        DomainError::InvalidRole(_) => invalid("role", &err),
        DomainError::InvalidEmploymentStatus(_) => invalid("employment_status", &err),
        DomainError::InvalidMaritalStatus(_) => invalid("marital_status", &err),
        DomainError::InvalidHolidayType(_) => invalid("holiday_type", &err),
        DomainError::InvalidPayrollMonth(_) => invalid("month", &err),
        DomainError::DateParseError { .. } | DomainError::DateArithmeticOverflow { .. } => {
            invalid("date", &err)
        }
        DomainError::InvalidAmount { field, .. } => invalid(field, &err),
        DomainError::InvalidDeductionMonths(_) => invalid("months", &err),
        DomainError::InvalidEffectivePeriod { .. } => invalid("effective_to", &err),
    }
}

/// Maps a storage failure to the API contract.
///
/// Constraint violations surface as conflicts or bad input. Any other
/// failure is logged here and hidden behind a generic message.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::UniqueViolation(message) => ApiError::Conflict {
            message: format!("A record with the same unique value already exists ({message})"),
        },
        PersistenceError::ForeignKeyViolation(message) => ApiError::Conflict {
            message: format!("A referenced record does not exist ({message})"),
        },
        PersistenceError::CheckViolation(message) => ApiError::InvalidInput {
            field: String::from("record"),
            message,
        },
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message,
        },
        other => {
            error!(error = %other, "Persistence failure");
            ApiError::Internal {
                message: String::from("A database error occurred"),
            }
        }
    }
}
