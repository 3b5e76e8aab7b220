//! Aggregates served by the `/analytics/*` endpoints.

use campus_core::types::Timestamp;
use serde::Deserialize;

/// `GET /analytics/stats`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stats {
    pub total_students: u64,
    pub total_teachers: u64,
    pub total_classes: u64,
    pub total_enrollments: u64,
    pub total_schools: u64,
}

/// `GET /analytics/enrollments-by-class` row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassEnrollmentCount {
    pub class_name: String,
    pub count: u64,
}

/// `GET /analytics/students-by-grade` row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeCount {
    pub grade: String,
    pub count: u64,
}

/// `GET /analytics/recent-enrollments` row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentEnrollment {
    pub student_name: String,
    pub class_name: String,
    #[serde(default)]
    pub enrolled_at: Option<Timestamp>,
}

/// `GET /analytics/class-capacity` row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassCapacity {
    pub class_name: String,
    pub capacity: u64,
    pub enrolled: u64,
}

/// `GET /analytics/activity-timeline` point.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPoint {
    /// Bucket label as sent by the backend (usually `YYYY-MM-DD`).
    pub date: String,
    pub count: u64,
}
