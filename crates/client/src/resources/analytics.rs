//! `/analytics/*` aggregate feeds.

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::analytics::{
    ActivityPoint, ClassCapacity, ClassEnrollmentCount, GradeCount, RecentEnrollment, Stats,
};

const PATH: &str = "/analytics";

pub struct AnalyticsApi;

impl AnalyticsApi {
    pub async fn stats(api: &ApiClient) -> Result<Stats, ApiError> {
        api.get(&format!("{PATH}/stats")).await
    }

    pub async fn enrollments_by_class(
        api: &ApiClient,
    ) -> Result<Vec<ClassEnrollmentCount>, ApiError> {
        api.get(&format!("{PATH}/enrollments-by-class")).await
    }

    pub async fn students_by_grade(api: &ApiClient) -> Result<Vec<GradeCount>, ApiError> {
        api.get(&format!("{PATH}/students-by-grade")).await
    }

    pub async fn recent_enrollments(api: &ApiClient) -> Result<Vec<RecentEnrollment>, ApiError> {
        api.get(&format!("{PATH}/recent-enrollments")).await
    }

    pub async fn class_capacity(api: &ApiClient) -> Result<Vec<ClassCapacity>, ApiError> {
        api.get(&format!("{PATH}/class-capacity")).await
    }

    pub async fn activity_timeline(api: &ApiClient) -> Result<Vec<ActivityPoint>, ApiError> {
        api.get(&format!("{PATH}/activity-timeline")).await
    }
}
