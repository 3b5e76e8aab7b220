//! Typed wrappers over the backend's REST collections.
//!
//! Plain collections share one generic implementation, [`Endpoint`],
//! parameterised by a [`Resource`] marker. Collections with extra routes
//! get their own module.
//!
//! ```ignore
//! let students = StudentApi::list(&api).await?;
//! StudentApi::delete(&api, students[0].id).await?;
//! ```

pub mod analytics;
pub mod auth;
pub mod enrollments;
pub mod lesson_plans;
pub mod messages;
pub mod superadmin;

use std::marker::PhantomData;

use campus_core::types::Id;
use serde::de::DeserializeOwned;
use serde::Serialize;
use validator::Validate;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::branch::{Branch, CreateBranch, UpdateBranch};
use crate::models::class::{Class, CreateClass, UpdateClass};
use crate::models::enrollment::{CreateEnrollment, Enrollment, UpdateEnrollment};
use crate::models::lesson_plan::{CreateLessonPlan, LessonPlan, UpdateLessonPlan};
use crate::models::school::{CreateSchool, School, UpdateSchool};
use crate::models::student::{CreateStudent, Student, UpdateStudent};
use crate::models::teacher::{CreateTeacher, Teacher, UpdateTeacher};
use crate::models::user::{CreateUser, UpdateUser, User};

/// A stored record with a backend-assigned id.
pub trait HasId {
    fn id(&self) -> Id;
}

/// A REST collection at `PATH` with record and form types.
pub trait Resource {
    /// Collection path, e.g. `/students`.
    const PATH: &'static str;
    /// Singular name used in logs and not-found messages.
    const ENTITY: &'static str;

    type Record: DeserializeOwned + HasId + Clone + Send;
    type Create: Serialize + Validate + Sync;
    type Update: Serialize + Validate + Sync;
}

/// CRUD calls for a [`Resource`].
pub struct Endpoint<R>(PhantomData<R>);

impl<R: Resource> Endpoint<R> {
    /// `GET PATH`.
    pub async fn list(api: &ApiClient) -> Result<Vec<R::Record>, ApiError> {
        api.get(R::PATH).await
    }

    /// `GET PATH/{id}`.
    pub async fn get(api: &ApiClient, id: Id) -> Result<R::Record, ApiError> {
        api.get(&format!("{}/{id}", R::PATH)).await
    }

    /// `POST PATH`.
    pub async fn create(api: &ApiClient, input: &R::Create) -> Result<R::Record, ApiError> {
        let record = api.post(R::PATH, input).await?;
        tracing::info!(entity = R::ENTITY, "Created record");
        Ok(record)
    }

    /// `PUT PATH/{id}`.
    pub async fn update(
        api: &ApiClient,
        id: Id,
        input: &R::Update,
    ) -> Result<R::Record, ApiError> {
        let record = api.put(&format!("{}/{id}", R::PATH), input).await?;
        tracing::info!(entity = R::ENTITY, id, "Updated record");
        Ok(record)
    }

    /// `DELETE PATH/{id}`.
    pub async fn delete(api: &ApiClient, id: Id) -> Result<(), ApiError> {
        api.delete(&format!("{}/{id}", R::PATH)).await?;
        tracing::info!(entity = R::ENTITY, id, "Deleted record");
        Ok(())
    }
}

macro_rules! resource {
    ($marker:ident, $alias:ident, $path:literal, $entity:literal, $record:ty, $create:ty, $update:ty) => {
        #[doc = concat!("`", $path, "` collection.")]
        pub struct $marker;

        impl Resource for $marker {
            const PATH: &'static str = $path;
            const ENTITY: &'static str = $entity;
            type Record = $record;
            type Create = $create;
            type Update = $update;
        }

        pub type $alias = Endpoint<$marker>;

        impl HasId for $record {
            fn id(&self) -> Id {
                self.id
            }
        }
    };
}

resource!(Schools, SchoolApi, "/schools", "school", School, CreateSchool, UpdateSchool);
resource!(Branches, BranchApi, "/branches", "branch", Branch, CreateBranch, UpdateBranch);
resource!(Students, StudentApi, "/students", "student", Student, CreateStudent, UpdateStudent);
resource!(Teachers, TeacherApi, "/teachers", "teacher", Teacher, CreateTeacher, UpdateTeacher);
resource!(Classes, ClassApi, "/classes", "class", Class, CreateClass, UpdateClass);
resource!(
    Enrollments,
    EnrollmentApi,
    "/enrollments",
    "enrollment",
    Enrollment,
    CreateEnrollment,
    UpdateEnrollment
);
resource!(
    LessonPlans,
    LessonPlanApi,
    "/lesson-plans",
    "lesson_plan",
    LessonPlan,
    CreateLessonPlan,
    UpdateLessonPlan
);
resource!(Users, UserApi, "/users", "user", User, CreateUser, UpdateUser);
