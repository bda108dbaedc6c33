// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Opening and configuring `SQLite` stores.
//!
//! PRAGMA handling lives here because Diesel has no DSL for it.

use diesel::prelude::*;
use diesel::sql_types::Integer;
use diesel::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, warn};

use crate::error::PersistenceError;

/// Schema for `SQLite`, embedded from `migrations/`.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Pragmas applied to every file-backed store.
const FILE_PRAGMAS: [&str; 2] = ["PRAGMA journal_mode = WAL", "PRAGMA busy_timeout = 5000"];

#[derive(QueryableByName)]
struct ForeignKeysPragma {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

fn pragma(conn: &mut SqliteConnection, statement: &str) -> Result<(), PersistenceError> {
    debug!(statement, "Applying pragma");
    diesel::sql_query(statement)
        .execute(conn)
        .map(|_| ())
        .map_err(|e| PersistenceError::QueryFailed(format!("{statement}: {e}")))
}

/// Fails unless `PRAGMA foreign_keys` reports enforcement is on.
///
/// `SQLite` leaves it off per connection, and attendance, deductions and
/// user accounts all lean on employee references.
///
/// # Errors
///
/// Returns `ForeignKeyEnforcementNotEnabled` when the pragma reads zero.
pub fn verify_foreign_key_enforcement(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    let row: ForeignKeysPragma = diesel::sql_query("PRAGMA foreign_keys").get_result(conn)?;
    if row.foreign_keys == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }
    debug!("SQLite is enforcing foreign keys");
    Ok(())
}

/// Applies whatever migrations have not run yet.
///
/// # Errors
///
/// Returns the harness error when a migration fails.
pub fn run_migrations(
    conn: &mut SqliteConnection,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    info!(count = applied.len(), "Applied SQLite migrations");
    Ok(())
}

/// Walks every migration back down, leaving an empty schema.
///
/// # Errors
///
/// Returns `MigrationFailed` when a down script fails.
pub fn revert_all_migrations(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    warn!("Dropping the SQLite schema");
    conn.revert_all_migrations(MIGRATIONS)
        .map(|_| ())
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))
}

/// Opens `database_url`, turns on foreign keys and brings the schema up
/// to date. `":memory:"` and `file:` URIs are accepted as-is.
///
/// # Errors
///
/// Returns an error when the file cannot be opened or a migration fails.
pub fn initialize_database(database_url: &str) -> Result<SqliteConnection, PersistenceError> {
    info!(database_url, "Opening SQLite store");
    let mut conn: SqliteConnection = SqliteConnection::establish(database_url)?;
    pragma(&mut conn, "PRAGMA foreign_keys = ON")?;
    run_migrations(&mut conn).map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;
    Ok(conn)
}

/// Switches a file-backed store to WAL with a five second busy timeout so
/// concurrent readers do not block the writer.
///
/// # Errors
///
/// Returns `QueryFailed` if either pragma is rejected.
pub fn enable_wal_mode(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    FILE_PRAGMAS
        .iter()
        .try_for_each(|statement| pragma(conn, statement))
}
