//! Enrollment routes beyond plain CRUD.

use campus_core::types::Id;

use super::{EnrollmentApi, Enrollments, Resource};
use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::enrollment::Enrollment;

impl EnrollmentApi {
    /// `GET /enrollments/student/{id}`.
    pub async fn for_student(api: &ApiClient, student_id: Id) -> Result<Vec<Enrollment>, ApiError> {
        api.get(&format!("{}/student/{student_id}", Enrollments::PATH))
            .await
    }

    /// `GET /enrollments/class/{id}`.
    pub async fn for_class(api: &ApiClient, class_id: Id) -> Result<Vec<Enrollment>, ApiError> {
        api.get(&format!("{}/class/{class_id}", Enrollments::PATH))
            .await
    }

    /// `DELETE /enrollments/student/{sid}/class/{cid}`.
    pub async fn unenroll(api: &ApiClient, student_id: Id, class_id: Id) -> Result<(), ApiError> {
        api.delete(&format!(
            "{}/student/{student_id}/class/{class_id}",
            Enrollments::PATH
        ))
        .await?;
        tracing::info!(student_id, class_id, "Unenrolled student");
        Ok(())
    }
}
