//! Generic list/create/edit/delete screen over a REST collection.

use std::marker::PhantomData;

use campus_client::resources::{
    Branches, Classes, Endpoint, Enrollments, HasId, Resource, Schools, Students, Teachers,
};
use campus_core::error::CoreError;
use campus_core::navigation::Route;
use campus_core::role_management::{Decision, Denial};
use campus_core::roles::{can, Capability};
use campus_core::types::Id;
use campus_core::user::User;
use campus_core::validation::validate_form;

use super::{admit, confirmed, require, Confirm, View};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub type Record<P> = <<P as ScreenPolicy>::Resource as Resource>::Record;
pub type CreateForm<P> = <<P as ScreenPolicy>::Resource as Resource>::Create;
pub type UpdateForm<P> = <<P as ScreenPolicy>::Resource as Resource>::Update;

/// Route and capabilities of one CRUD screen.
pub trait ScreenPolicy: Sized {
    type Resource: Resource;

    const ROUTE: Route;
    const CREATE: Capability;
    const EDIT: Capability;
    const DELETE: Capability;

    /// Client-side checks on a create form.
    fn check_create(form: &CreateForm<Self>) -> Result<(), CoreError> {
        validate_form(form)
    }

    /// Client-side checks on an edit form.
    fn check_update(form: &UpdateForm<Self>) -> Result<(), CoreError> {
        validate_form(form)
    }

    /// Whether `actor` may delete `record`. Deletes always go through a
    /// confirmation prompt unless the decision is [`Decision::Unchanged`].
    fn authorize_delete(actor: &User, _record: &Record<Self>) -> Result<Decision, Denial> {
        if can(Some(actor), Self::DELETE) {
            Ok(Decision::Confirm)
        } else {
            Err(Denial::MissingCapability(Self::DELETE))
        }
    }
}

/// Controller for a CRUD screen: holds the loaded rows and runs actions
/// through the capability check, then form validation, then the backend.
pub struct CrudScreen<P: ScreenPolicy> {
    state: AppState,
    records: Vec<Record<P>>,
    _policy: PhantomData<P>,
}

impl<P: ScreenPolicy> CrudScreen<P> {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            records: Vec::new(),
            _policy: PhantomData,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Rows from the last load.
    pub fn records(&self) -> &[Record<P>] {
        &self.records
    }

    /// Guard the route, then load the list.
    pub async fn open(&mut self) -> AppResult<View<&[Record<P>]>> {
        if let Err(view) = admit(&self.state.session.current(), P::ROUTE) {
            return Ok(view);
        }
        self.reload().await?;
        Ok(View::Ready(&self.records))
    }

    pub async fn reload(&mut self) -> AppResult<()> {
        self.records = Endpoint::<P::Resource>::list(&self.state.api).await?;
        tracing::debug!(
            entity = <P::Resource as Resource>::ENTITY,
            count = self.records.len(),
            "Loaded records"
        );
        Ok(())
    }

    pub async fn create(&mut self, form: &CreateForm<P>) -> AppResult<Record<P>> {
        require(&self.state.session, P::CREATE)?;
        P::check_create(form)?;
        let record = Endpoint::<P::Resource>::create(&self.state.api, form).await?;
        self.reload().await?;
        Ok(record)
    }

    pub async fn update(&mut self, id: Id, form: &UpdateForm<P>) -> AppResult<Record<P>> {
        require(&self.state.session, P::EDIT)?;
        P::check_update(form)?;
        let record = Endpoint::<P::Resource>::update(&self.state.api, id, form).await?;
        self.reload().await?;
        Ok(record)
    }

    /// Delete a loaded row after the policy check and a confirmation.
    pub async fn delete(&mut self, id: Id, confirm: &dyn Confirm) -> AppResult<()> {
        let actor = self.state.session.user().ok_or(AppError::NotSignedIn)?;
        let entity = <P::Resource as Resource>::ENTITY;
        let record = self
            .records
            .iter()
            .find(|r| r.id() == id)
            .ok_or(CoreError::NotFound { entity, id })?;

        match P::authorize_delete(&actor, record)? {
            Decision::Unchanged => return Ok(()),
            Decision::Proceed | Decision::Confirm => {
                confirmed(confirm, &format!("Delete this {entity}? This cannot be undone."))?;
            }
        }

        Endpoint::<P::Resource>::delete(&self.state.api, id).await?;
        self.reload().await
    }
}

macro_rules! screen_policy {
    (
        $policy:ident, $screen:ident, $resource:ty, $route:expr,
        create: $create:expr, edit: $edit:expr, delete: $delete:expr
    ) => {
        pub struct $policy;

        impl ScreenPolicy for $policy {
            type Resource = $resource;
            const ROUTE: Route = $route;
            const CREATE: Capability = $create;
            const EDIT: Capability = $edit;
            const DELETE: Capability = $delete;
        }

        pub type $screen = CrudScreen<$policy>;
    };
}

screen_policy!(
    SchoolsPolicy, SchoolsScreen, Schools, Route::Schools,
    create: Capability::ManageSchools, edit: Capability::ManageSchools, delete: Capability::ManageSchools
);
screen_policy!(
    BranchesPolicy, BranchesScreen, Branches, Route::Branches,
    create: Capability::ManageBranches, edit: Capability::ManageBranches, delete: Capability::ManageBranches
);
screen_policy!(
    StudentsPolicy, StudentsScreen, Students, Route::Students,
    create: Capability::CreateStudents, edit: Capability::EditStudents, delete: Capability::DeleteStudents
);
screen_policy!(
    TeachersPolicy, TeachersScreen, Teachers, Route::Teachers,
    create: Capability::ManageTeachers, edit: Capability::ManageTeachers, delete: Capability::ManageTeachers
);
screen_policy!(
    ClassesPolicy, ClassesScreen, Classes, Route::Classes,
    create: Capability::ManageClasses, edit: Capability::ManageClasses, delete: Capability::ManageClasses
);
screen_policy!(
    EnrollmentsPolicy, EnrollmentsScreen, Enrollments, Route::Enrollments,
    create: Capability::ManageEnrollments, edit: Capability::ManageEnrollments, delete: Capability::ManageEnrollments
);
