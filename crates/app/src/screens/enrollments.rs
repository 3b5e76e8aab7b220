//! Enrollment routes on top of the generic CRUD screen.

use campus_client::models::enrollment::{CreateEnrollment, Enrollment};
use campus_client::resources::EnrollmentApi;
use campus_core::roles::Capability;
use campus_core::types::Id;

use super::crud::EnrollmentsScreen;
use super::{confirmed, require, Confirm};
use crate::error::AppResult;

impl EnrollmentsScreen {
    /// Enroll `student_id` in `class_id`.
    pub async fn enroll(&mut self, student_id: Id, class_id: Id) -> AppResult<Enrollment> {
        self.create(&CreateEnrollment {
            student_id,
            class_id,
        })
        .await
    }

    pub async fn for_student(&self, student_id: Id) -> AppResult<Vec<Enrollment>> {
        require(&self.state().session, Capability::ViewEnrollments)?;
        Ok(EnrollmentApi::for_student(&self.state().api, student_id).await?)
    }

    pub async fn for_class(&self, class_id: Id) -> AppResult<Vec<Enrollment>> {
        require(&self.state().session, Capability::ViewEnrollments)?;
        Ok(EnrollmentApi::for_class(&self.state().api, class_id).await?)
    }

    /// Remove `student_id` from `class_id` after confirmation.
    pub async fn unenroll(
        &mut self,
        student_id: Id,
        class_id: Id,
        confirm: &dyn Confirm,
    ) -> AppResult<()> {
        require(&self.state().session, Capability::ManageEnrollments)?;
        confirmed(confirm, "Remove this student from the class?")?;
        EnrollmentApi::unenroll(&self.state().api, student_id, class_id).await?;
        self.reload().await
    }
}
