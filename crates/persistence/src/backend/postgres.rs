// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Opening and migrating `PostgreSQL` stores.
//!
//! `migrations_postgres/` mirrors `migrations/` table for table. Ids are
//! `BIGSERIAL` here; everything else, including the text encoding of
//! dates and money, matches so one Diesel schema fits both backends.

use diesel::sql_types::BigInt;
use diesel::{Connection, PgConnection, QueryableByName, RunQueryDsl};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{info, warn};

use crate::error::PersistenceError;

/// Row shape of the constraint count query.
#[derive(QueryableByName)]
struct ForeignKeyCount {
    #[diesel(sql_type = BigInt)]
    fk_count: i64,
}

/// Schema for `PostgreSQL`, embedded from `migrations_postgres/`.
pub const PG_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations_postgres");

/// Connects to `database_url` and applies pending migrations.
///
/// # Errors
///
/// Returns an error if the server refuses the connection or a migration
/// fails.
pub fn initialize_database(database_url: &str) -> Result<PgConnection, PersistenceError> {
    info!("Connecting to PostgreSQL");

    let mut conn: PgConnection = PgConnection::establish(database_url)
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

    run_migrations(&mut conn).map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;

    Ok(conn)
}

/// Applies whatever migrations have not run yet.
///
/// # Errors
///
/// Returns the harness error when a migration fails.
pub fn run_migrations(
    conn: &mut PgConnection,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let applied = conn.run_pending_migrations(PG_MIGRATIONS)?;
    info!(count = applied.len(), "Applied PostgreSQL migrations");
    Ok(())
}

/// Walks every migration back down.
///
/// # Errors
///
/// Returns `MigrationFailed` when a down script fails.
pub fn revert_all_migrations(conn: &mut PgConnection) -> Result<(), PersistenceError> {
    warn!("Reverting all PostgreSQL migrations");
    conn.revert_all_migrations(PG_MIGRATIONS)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;
    Ok(())
}

/// `PostgreSQL` always enforces the foreign keys it has, so this only
/// checks that the migrations declared some.
///
/// # Errors
///
/// Returns an error if the schema has none or the catalog query fails.
pub fn verify_foreign_key_enforcement(conn: &mut PgConnection) -> Result<(), PersistenceError> {
    let result: Result<ForeignKeyCount, _> = diesel::sql_query(
        "SELECT COUNT(*) AS fk_count FROM information_schema.table_constraints \
         WHERE constraint_type = 'FOREIGN KEY' AND table_schema = current_schema()",
    )
    .get_result(conn);

    match result {
        Ok(check) if check.fk_count > 0 => {
            info!(
                fk_count = check.fk_count,
                "PostgreSQL foreign keys are in place"
            );
            Ok(())
        }
        Ok(_) => Err(PersistenceError::ForeignKeyEnforcementNotEnabled),
        Err(e) => Err(PersistenceError::QueryFailed(format!(
            "Failed to verify foreign key enforcement: {e}"
        ))),
    }
}
