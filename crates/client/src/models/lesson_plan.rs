//! Lesson plan records, DTOs and status values.

use campus_core::types::{Id, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Plan is being written and is visible to its author only.
pub const STATUS_DRAFT: &str = "draft";

/// Plan has been handed in for review.
pub const STATUS_SUBMITTED: &str = "submitted";

/// Plan has been reviewed and approved.
pub const STATUS_APPROVED: &str = "approved";

/// All status values a form may send.
pub const VALID_STATUSES: &[&str] = &[STATUS_DRAFT, STATUS_SUBMITTED, STATUS_APPROVED];

/// Validate that a status string is one of the accepted values.
pub fn validate_status(status: &str) -> Result<(), String> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "Invalid status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        ))
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPlan {
    pub id: Id,
    pub title: String,
    pub teacher_id: Id,
    pub class_id: Id,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub objectives: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    /// Kept as sent by the backend; see [`VALID_STATUSES`].
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLessonPlan {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(range(min = 1, message = "A teacher must be selected"))]
    pub teacher_id: Id,
    #[validate(range(min = 1, message = "A class must be selected"))]
    pub class_id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objectives: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub status: String,
}

// ---------------------------------------------------------------------------
// Update DTO
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLessonPlan {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objectives: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// Query string for `GET /lesson-plans`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPlanFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}
