// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use ems_persistence::Persistence;

use crate::auth::{AuthenticatedUser, AuthorizationService};
use crate::error::ApiError;
use crate::request_response::{AuditListResponse, AuditQuery};

const DEFAULT_AUDIT_LIMIT: i64 = 50;
const MAX_AUDIT_LIMIT: i64 = 500;

/// Lists the most recent audit events, newest first.
///
/// # Errors
///
/// Returns an error if the caller is not an admin.
pub fn list_audit_events(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    query: AuditQuery,
) -> Result<AuditListResponse, ApiError> {
    AuthorizationService::require_admin(actor, "list_audit_events")?;
    let limit: i64 = query.limit.unwrap_or(DEFAULT_AUDIT_LIMIT).clamp(1, MAX_AUDIT_LIMIT);
    Ok(AuditListResponse {
        events: persistence.list_recent_audit_events(limit)?,
    })
}
