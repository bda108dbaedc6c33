// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// Failures surfaced by the storage layer.
///
/// Constraint violations are split out so the API layer can turn them into
/// conflict or validation responses instead of server errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Could not connect to the database: {0}")]
    DatabaseConnectionFailed(String),
    #[error("Schema migration failed: {0}")]
    MigrationFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Could not encode or decode a stored value: {0}")]
    SerializationError(String),
    /// Reference data or configuration the store depends on is missing.
    #[error("Database is not initialized: {0}")]
    InitializationError(String),
    #[error("The database is not enforcing foreign keys")]
    ForeignKeyEnforcementNotEnabled,
    #[error("Duplicate record: {0}")]
    UniqueViolation(String),
    #[error("Referenced record missing: {0}")]
    ForeignKeyViolation(String),
    /// Check and not-null failures both land here.
    #[error("Constraint violated: {0}")]
    CheckViolation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Other(String),
}

impl PersistenceError {
    /// True when the database refused the write because of the data given.
    #[must_use]
    pub const fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::UniqueViolation(_) | Self::ForeignKeyViolation(_) | Self::CheckViolation(_)
        )
    }
}

impl From<DieselError> for PersistenceError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Self::NotFound(String::from("no matching row")),
            DieselError::DatabaseError(kind, info) => {
                let message: String = info.message().to_owned();
                match kind {
                    DatabaseErrorKind::UniqueViolation => Self::UniqueViolation(message),
                    DatabaseErrorKind::ForeignKeyViolation => Self::ForeignKeyViolation(message),
                    DatabaseErrorKind::CheckViolation | DatabaseErrorKind::NotNullViolation => {
                        Self::CheckViolation(message)
                    }
                    _ => Self::DatabaseError(message),
                }
            }
            other => Self::DatabaseError(other.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
