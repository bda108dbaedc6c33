// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event persistence.
//!
//! Events are append-only. Snapshots are stored as the JSON text carried by
//! the event, unchanged.

use diesel::prelude::*;
use diesel::{PgConnection, SqliteConnection};
use ems_audit::AuditEvent;
use tracing::debug;

use super::now_timestamp;
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

backend_fn! {
/// Persists an audit event.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `event` - The event to record
///
/// # Returns
///
/// The event ID assigned by the database.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn persist_audit_event(conn: &mut _, event: &AuditEvent) -> Result<i64, PersistenceError> {
    let created_at: String = now_timestamp()?;
    let event_id: i64 = diesel::insert_into(audit_events::table)
        .values((
            audit_events::actor_user_id.eq(event.actor.user_id),
            audit_events::actor_email.eq(&event.actor.email),
            audit_events::actor_role.eq(&event.actor.role),
            audit_events::action.eq(&event.action.name),
            audit_events::details.eq(event.action.details.as_deref()),
            audit_events::target_kind.eq(&event.target.kind),
            audit_events::target_id.eq(&event.target.id),
            audit_events::before_json.eq(event.before.as_ref().map(|s| s.data.as_str())),
            audit_events::after_json.eq(event.after.as_ref().map(|s| s.data.as_str())),
            audit_events::created_at.eq(&created_at),
        ))
        .returning(audit_events::event_id)
        .get_result(conn)?;

    debug!(event_id, action = %event.action.name, target = %event.target, "Audit event persisted");
    Ok(event_id)
}
}
