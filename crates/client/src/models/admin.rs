//! Superadmin panel bodies.

use campus_core::roles::Role;
use serde::{Deserialize, Serialize};

/// Body of `PUT /superadmin/users/{id}/role`.
#[derive(Debug, Clone, Serialize)]
pub struct RoleChangeRequest {
    pub role: Role,
}

/// Answer of `GET /superadmin/system/stats`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemStats {
    pub total_users: u64,
    pub total_superadmins: u64,
    pub total_admins: u64,
    pub total_teachers: u64,
    pub total_students: u64,
    pub total_schools: u64,
    pub total_classes: u64,
}
