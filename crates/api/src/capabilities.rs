// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capability flags for UI gating.
//!
//! Capabilities tell a client which screens to offer. They are advisory
//! only; every handler still performs its own authorization check.

use serde::{Deserialize, Serialize};

use crate::auth::AuthenticatedUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Allowed,
    Denied,
}

impl Capability {
    const fn from_bool(allowed: bool) -> Self {
        if allowed { Self::Allowed } else { Self::Denied }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub can_manage_employees: Capability,
    pub can_manage_users: Capability,
    pub can_mark_attendance: Capability,
    pub can_run_payroll: Capability,
    pub can_manage_reference_data: Capability,
    pub can_manage_deductions: Capability,
    pub can_view_audit_log: Capability,
    /// Self-service pages; needs a linked employee record.
    pub can_view_own_records: Capability,
}

/// Computes the capabilities of an authenticated user.
#[must_use]
pub const fn compute_capabilities(user: &AuthenticatedUser) -> Capabilities {
    let admin: Capability = Capability::from_bool(user.is_admin());
    Capabilities {
        can_manage_employees: admin,
        can_manage_users: admin,
        can_mark_attendance: admin,
        can_run_payroll: admin,
        can_manage_reference_data: admin,
        can_manage_deductions: admin,
        can_view_audit_log: admin,
        can_view_own_records: Capability::from_bool(user.employee_id.is_some()),
    }
}
