//! Lesson plans: filtered listing and status checks.

use campus_client::models::lesson_plan::{
    validate_status, CreateLessonPlan, LessonPlan, LessonPlanFilter, UpdateLessonPlan,
};
use campus_client::resources::{LessonPlanApi, LessonPlans};
use campus_core::error::CoreError;
use campus_core::navigation::Route;
use campus_core::roles::Capability;
use campus_core::validation::{require_non_blank, validate_form};

use super::crud::{CrudScreen, ScreenPolicy};
use super::{admit, View};
use crate::error::AppResult;

pub struct LessonPlansPolicy;

impl ScreenPolicy for LessonPlansPolicy {
    type Resource = LessonPlans;

    const ROUTE: Route = Route::LessonPlans;
    const CREATE: Capability = Capability::ManageLessonPlans;
    const EDIT: Capability = Capability::ManageLessonPlans;
    const DELETE: Capability = Capability::ManageLessonPlans;

    fn check_create(form: &CreateLessonPlan) -> Result<(), CoreError> {
        validate_form(form)?;
        require_non_blank("title", &form.title)?;
        validate_status(&form.status).map_err(CoreError::Validation)
    }

    fn check_update(form: &UpdateLessonPlan) -> Result<(), CoreError> {
        validate_form(form)?;
        if let Some(title) = &form.title {
            require_non_blank("title", title)?;
        }
        match &form.status {
            Some(status) => validate_status(status).map_err(CoreError::Validation),
            None => Ok(()),
        }
    }
}

pub type LessonPlansScreen = CrudScreen<LessonPlansPolicy>;

impl LessonPlansScreen {
    /// Guarded listing narrowed by teacher, class and/or status.
    pub async fn open_filtered(
        &self,
        filter: &LessonPlanFilter,
    ) -> AppResult<View<Vec<LessonPlan>>> {
        if let Err(view) = admit(&self.state().session.current(), Route::LessonPlans) {
            return Ok(view);
        }
        if let Some(status) = &filter.status {
            validate_status(status).map_err(CoreError::Validation)?;
        }
        let plans = LessonPlanApi::filter(&self.state().api, filter).await?;
        Ok(View::Ready(plans))
    }
}
