//! User snapshot shared by the policy table, the session store and the
//! API client.

use serde::{Deserialize, Serialize};

use crate::roles::Role;
use crate::types::{Id, Timestamp};

/// An application user as returned by the backend.
///
/// `role` is the only authorization attribute. Unrecognised role strings
/// deserialize to [`Role::Unknown`] instead of failing the whole payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Id,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl User {
    /// Whether `other` refers to the same account.
    pub fn is_same_account(&self, other: &User) -> bool {
        self.id == other.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_role_string_deserializes_to_unknown() {
        let json = r#"{"id":7,"name":"Ada","email":"ada@school.test","role":"principal"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, Role::Unknown);
    }

    #[test]
    fn missing_role_defaults_to_unknown() {
        let json = r#"{"id":7,"name":"Ada","email":"ada@school.test"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, Role::Unknown);
        assert!(user.phone.is_none());
    }

    #[test]
    fn snapshot_round_trips_camel_case() {
        let json = r#"{"id":1,"name":"Root","email":"root@school.test","role":"superadmin","createdAt":"2024-01-02T03:04:05Z"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, Role::SuperAdmin);
        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back["role"], "superadmin");
        assert_eq!(back["createdAt"], "2024-01-02T03:04:05Z");
    }
}
