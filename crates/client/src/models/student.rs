//! Student records and DTOs.

use campus_core::types::{Id, Timestamp};
use serde::{Deserialize, Serialize};
use validator::Validate;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: Id,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// Grade level as the school names it (e.g. `"10"`, `"K"`).
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub school_id: Option<Id>,
    #[serde(default)]
    pub branch_id: Option<Id>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudent {
    #[validate(length(min = 1, max = 200, message = "Student name is required"))]
    pub name: String,
    #[validate(email(message = "Email address is invalid"))]
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 7, max = 20, message = "Phone number is invalid"))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 20, message = "Grade is required"))]
    pub grade: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<Id>,
}

// ---------------------------------------------------------------------------
// Update DTO
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudent {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200, message = "Student name cannot be empty"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Email address is invalid"))]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 7, max = 20, message = "Phone number is invalid"))]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 20, message = "Grade cannot be empty"))]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<Id>,
}
