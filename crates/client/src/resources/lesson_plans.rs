//! Filtered lesson plan listing.

use super::{LessonPlanApi, LessonPlans, Resource};
use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::lesson_plan::{LessonPlan, LessonPlanFilter};

impl LessonPlanApi {
    /// `GET /lesson-plans?teacherId=&classId=&status=`; unset fields are
    /// omitted from the query string.
    pub async fn filter(
        api: &ApiClient,
        filter: &LessonPlanFilter,
    ) -> Result<Vec<LessonPlan>, ApiError> {
        api.get_query(LessonPlans::PATH, filter).await
    }
}
