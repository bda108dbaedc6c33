// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event queries.

use diesel::prelude::*;
use diesel::{PgConnection, SqliteConnection};

use crate::data_models::AuditEventData;
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_events)]
struct AuditEventRow {
    event_id: i64,
    actor_user_id: Option<i64>,
    actor_email: String,
    actor_role: String,
    action: String,
    details: Option<String>,
    target_kind: String,
    target_id: String,
    before_json: Option<String>,
    after_json: Option<String>,
    created_at: String,
}

impl From<AuditEventRow> for AuditEventData {
    fn from(row: AuditEventRow) -> Self {
        Self {
            event_id: row.event_id,
            actor_user_id: row.actor_user_id,
            actor_email: row.actor_email,
            actor_role: row.actor_role,
            action: row.action,
            details: row.details,
            target: format!("{}:{}", row.target_kind, row.target_id),
            before: row.before_json,
            after: row.after_json,
            created_at: row.created_at,
        }
    }
}

backend_fn! {
/// Lists the most recent audit events, newest first.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `limit` - Maximum number of events to return
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_recent_audit_events(
    conn: &mut _,
    limit: i64,
) -> Result<Vec<AuditEventData>, PersistenceError> {
    let rows: Vec<AuditEventRow> = audit_events::table
        .order(audit_events::event_id.desc())
        .limit(limit)
        .select(AuditEventRow::as_select())
        .load(conn)?;
    Ok(rows.into_iter().map(AuditEventData::from).collect())
}
}

backend_fn! {
/// Retrieves an audit event by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_audit_event(
    conn: &mut _,
    event_id: i64,
) -> Result<Option<AuditEventData>, PersistenceError> {
    let row: Option<AuditEventRow> = audit_events::table
        .filter(audit_events::event_id.eq(event_id))
        .select(AuditEventRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(AuditEventData::from))
}
}
