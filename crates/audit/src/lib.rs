// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use ems_domain::Role;
use serde::{Deserialize, Serialize};

/// The identity that performed an action.
///
/// Requests are attributed to the authenticated user. Initialization and
/// seeding run as the system actor, which has no user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The acting user's id, or `None` for the system.
    pub user_id: Option<i64>,
    /// The acting user's email, or `"system"`.
    pub email: String,
    /// The acting user's role at the time of the action.
    pub role: String,
}

impl Actor {
    /// Creates an actor for an authenticated user.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The user's id
    /// * `email` - The user's login email
    /// * `role` - The user's role
    #[must_use]
    pub fn user(user_id: i64, email: String, role: Role) -> Self {
        Self {
            user_id: Some(user_id),
            email,
            role: role.as_str().to_string(),
        }
    }

    /// The actor used by initialization and seeding.
    #[must_use]
    pub fn system() -> Self {
        Self {
            user_id: None,
            email: String::from("system"),
            role: String::from("system"),
        }
    }

    /// Label used in `created_by`/`updated_by` columns.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.email
    }
}

/// What was done, as a `PascalCase` verb phrase such as `MarkAttendance`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    /// Free-form note, e.g. how an input value was normalized.
    pub details: Option<String>,
}

impl Action {
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// The record an action was applied to, e.g. `employee:91510001`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub kind: String,
    pub id: String,
}

impl Target {
    #[must_use]
    pub fn new(kind: &str, id: impl ToString) -> Self {
        Self {
            kind: kind.to_string(),
            id: id.to_string(),
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// The record as JSON, captured just before or just after a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub data: String,
}

impl StateSnapshot {
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }
}

/// An immutable audit event describing one successful mutation.
///
/// Creation events carry only `after`, deactivations and updates carry
/// both snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Who performed the change.
    pub actor: Actor,
    /// What was done.
    pub action: Action,
    /// Which record it was done to.
    pub target: Target,
    /// The record before the change, if it existed.
    pub before: Option<StateSnapshot>,
    /// The record after the change, if it still exists.
    pub after: Option<StateSnapshot>,
}

impl AuditEvent {
    #[must_use]
    pub const fn new(
        actor: Actor,
        action: Action,
        target: Target,
        before: Option<StateSnapshot>,
        after: Option<StateSnapshot>,
    ) -> Self {
        Self {
            actor,
            action,
            target,
            before,
            after,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_actor_records_role() {
        let actor: Actor = Actor::user(7, String::from("admin@company.com"), Role::Admin);

        assert_eq!(actor.user_id, Some(7));
        assert_eq!(actor.role, "admin");
        assert_eq!(actor.label(), "admin@company.com");
    }

    #[test]
    fn test_system_actor_has_no_user() {
        let actor: Actor = Actor::system();

        assert_eq!(actor.user_id, None);
        assert_eq!(actor.label(), "system");
    }

    #[test]
    fn test_action_keeps_normalization_note() {
        let action: Action = Action::new(
            String::from("MarkAttendance"),
            Some(String::from("normalized 'Late' to Present")),
        );

        assert_eq!(action.name, "MarkAttendance");
        assert_eq!(
            action.details,
            Some(String::from("normalized 'Late' to Present"))
        );
    }

    #[test]
    fn test_target_display() {
        let target: Target = Target::new("employee", 91_510_001);
        assert_eq!(target.to_string(), "employee:91510001");
    }

    #[test]
    fn test_audit_event_keeps_snapshots() {
        let before: StateSnapshot = StateSnapshot::new(String::from(r#"{"status":"Active"}"#));
        let after: StateSnapshot = StateSnapshot::new(String::from(r#"{"status":"Inactive"}"#));

        let event: AuditEvent = AuditEvent::new(
            Actor::user(1, String::from("admin@company.com"), Role::Admin),
            Action::new(String::from("DeactivateEmployee"), None),
            Target::new("employee", 91_510_001),
            Some(before.clone()),
            Some(after.clone()),
        );

        assert_eq!(event.target.to_string(), "employee:91510001");
        assert_eq!(event.before, Some(before));
        assert_eq!(event.after, Some(after));
        assert_eq!(event.target.kind, "employee");
    }
}
