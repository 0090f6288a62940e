//! Roles and fine-grained permissions

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Operator role, decided at login from the `admin_user` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Role {
    Admin,
    Area { area_id: i64 },
}

impl Role {
    /// Role stored as `role` (+ `area_id`) on an `admin_user` row.
    pub fn from_row(role: &str, area_id: Option<i64>) -> Option<Role> {
        match (role.trim().to_ascii_lowercase().as_str(), area_id) {
            ("admin", _) => Some(Role::Admin),
            ("area", Some(area_id)) => Some(Role::Area { area_id }),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Area { .. } => "area",
        }
    }

    pub fn area_id(&self) -> Option<i64> {
        match self {
            Role::Admin => None,
            Role::Area { area_id } => Some(*area_id),
        }
    }

    pub fn permissions(&self) -> HashSet<Permission> {
        Permission::for_role(self)
    }

    pub fn can(&self, required: Permission) -> bool {
        has_permission(&self.permissions(), required)
    }

    /// Whether this role may see and triage reports of `area_id`.
    pub fn can_access_area(&self, area_id: i64) -> bool {
        match self {
            Role::Admin => true,
            Role::Area { area_id: own } => *own == area_id,
        }
    }
}

/// Permission enum for fine-grained access control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    // Reports
    ReportsRead,
    ReportsUpdate,

    // Dashboards
    DashboardRead,

    // Areas
    AreasWrite,
    FieldsWrite,
    OptionsWrite,

    // Notifications
    NotificationsManage,

    // Admin
    Admin,
}

impl Permission {
    /// Get all permissions for a role
    pub fn for_role(role: &Role) -> HashSet<Permission> {
        match role {
            Role::Admin => Self::all(),
            Role::Area { .. } => Self::area_operator(),
        }
    }

    fn all() -> HashSet<Permission> {
        use Permission::*;
        [
            ReportsRead, ReportsUpdate,
            DashboardRead,
            AreasWrite, FieldsWrite, OptionsWrite,
            NotificationsManage,
            Admin,
        ].into_iter().collect()
    }

    fn area_operator() -> HashSet<Permission> {
        use Permission::*;
        [ReportsRead, ReportsUpdate, DashboardRead, NotificationsManage].into_iter().collect()
    }
}

/// Check if a set of permissions allows an action
pub fn has_permission(permissions: &HashSet<Permission>, required: Permission) -> bool {
    permissions.contains(&Permission::Admin) || permissions.contains(&required)
}
