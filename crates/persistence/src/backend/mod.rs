// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The few things that differ per database: opening a connection,
//! running and reverting migrations, and checking that foreign keys are
//! enforced.
//!
//! Queries and mutations stay backend-neutral and are stamped out for both
//! connection types by `backend_fn!`. Inserts rely on `RETURNING`, which
//! `SQLite` and `PostgreSQL` both support.

pub mod postgres;
pub mod sqlite;

use diesel::{Connection, PgConnection, SqliteConnection};

use crate::error::PersistenceError;

/// Schema management implemented once per connection type.
pub trait PersistenceBackend: Connection {
    /// Run at startup; a store that ignores foreign keys would let
    /// attendance and deductions point at missing employees.
    ///
    /// # Errors
    ///
    /// Returns an error if enforcement is off or cannot be determined.
    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError>;

    /// Runs every down migration.
    ///
    /// # Errors
    ///
    /// Returns an error if a down migration fails.
    fn revert_schema(&mut self) -> Result<(), PersistenceError>;

    /// Runs pending up migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if a migration fails.
    fn apply_schema(&mut self) -> Result<(), PersistenceError>;
}

impl PersistenceBackend for SqliteConnection {
    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(self)
    }

    fn revert_schema(&mut self) -> Result<(), PersistenceError> {
        sqlite::revert_all_migrations(self)
    }

    fn apply_schema(&mut self) -> Result<(), PersistenceError> {
        sqlite::run_migrations(self).map_err(|e| PersistenceError::MigrationFailed(e.to_string()))
    }
}

impl PersistenceBackend for PgConnection {
    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        postgres::verify_foreign_key_enforcement(self)
    }

    fn revert_schema(&mut self) -> Result<(), PersistenceError> {
        postgres::revert_all_migrations(self)
    }

    fn apply_schema(&mut self) -> Result<(), PersistenceError> {
        postgres::run_migrations(self)
            .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))
    }
}
