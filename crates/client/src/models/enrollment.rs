//! Enrollment records and DTOs.

use campus_core::types::{Id, Timestamp};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A student's membership in a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: Id,
    pub student_id: Id,
    pub class_id: Id,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub enrolled_at: Option<Timestamp>,
}

/// Body of `POST /enrollments`.
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnrollment {
    #[validate(range(min = 1, message = "A student must be selected"))]
    pub student_id: Id,
    #[validate(range(min = 1, message = "A class must be selected"))]
    pub class_id: Id,
}

/// Body of `PUT /enrollments/{id}`: move an enrollment to another class.
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEnrollment {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "A student must be selected"))]
    pub student_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "A class must be selected"))]
    pub class_id: Option<Id>,
}
