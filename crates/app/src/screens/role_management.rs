//! Role-management roster.
//!
//! Teachers see students, admins see teachers and students, superadmins see
//! everyone. Only superadmins may change roles or delete accounts. Every
//! action runs the client-side guard first; a denied action never reaches
//! the backend.

use campus_client::resources::superadmin::SuperAdminApi;
use campus_client::resources::UserApi;
use campus_core::error::CoreError;
use campus_core::navigation::Route;
use campus_core::role_management::{
    assignable_roles, authorize_delete, authorize_role_change, visible_roster, Decision,
};
use campus_core::roles::{is_super_admin, Role};
use campus_core::types::Id;
use campus_core::user::User;

use super::{admit, confirmed, Confirm, View};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Result of an accepted role-management action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// Nothing to change; no request was sent.
    Unchanged,
}

pub struct RoleManagementScreen {
    state: AppState,
    roster: Vec<User>,
}

impl RoleManagementScreen {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            roster: Vec::new(),
        }
    }

    pub fn roster(&self) -> &[User] {
        &self.roster
    }

    /// Roles the current user may offer in the role picker.
    pub fn assignable_roles(&self) -> &'static [Role] {
        assignable_roles(self.state.session.user().as_ref())
    }

    pub async fn open(&mut self) -> AppResult<View<&[User]>> {
        if let Err(view) = admit(&self.state.session.current(), Route::RoleManagement) {
            return Ok(view);
        }
        self.reload().await?;
        Ok(View::Ready(&self.roster))
    }

    /// Superadmins load the global roster; everyone else the plain user
    /// list. Either way rows outside the actor's scope are dropped.
    pub async fn reload(&mut self) -> AppResult<()> {
        let actor = self.state.session.user();
        let users = if is_super_admin(actor.as_ref()) {
            SuperAdminApi::all_users(&self.state.api).await?
        } else {
            UserApi::list(&self.state.api).await?
        };
        self.roster = visible_roster(actor.as_ref(), users);
        Ok(())
    }

    /// Change the role of the roster row `target_id` to `new_role`.
    ///
    /// Demoting a superadmin asks for confirmation; declining returns
    /// [`AppError::Cancelled`] without a request.
    pub async fn change_role(
        &mut self,
        target_id: Id,
        new_role: Role,
        confirm: &dyn Confirm,
    ) -> AppResult<Outcome> {
        let actor = self.state.session.user();
        let target = self.target(target_id)?;

        match authorize_role_change(actor.as_ref(), &target, new_role)? {
            Decision::Unchanged => return Ok(Outcome::Unchanged),
            Decision::Confirm => confirmed(
                confirm,
                &format!(
                    "{} is a superadmin. Change their role to {new_role}?",
                    target.name
                ),
            )?,
            Decision::Proceed => {}
        }

        SuperAdminApi::change_role(&self.state.api, target.id, new_role).await?;
        self.reload().await?;
        Ok(Outcome::Applied)
    }

    /// Delete the roster row `target_id` after confirmation.
    pub async fn delete_user(&mut self, target_id: Id, confirm: &dyn Confirm) -> AppResult<Outcome> {
        let actor = self.state.session.user();
        let target = self.target(target_id)?;

        match authorize_delete(actor.as_ref(), &target)? {
            Decision::Unchanged => return Ok(Outcome::Unchanged),
            Decision::Proceed | Decision::Confirm => confirmed(
                confirm,
                &format!("Delete {} ({})? This cannot be undone.", target.name, target.email),
            )?,
        }

        SuperAdminApi::delete_user(&self.state.api, target.id).await?;
        self.reload().await?;
        Ok(Outcome::Applied)
    }

    fn target(&self, id: Id) -> Result<User, AppError> {
        if let Some(user) = self.roster.iter().find(|u| u.id == id) {
            return Ok(user.clone());
        }
        // The actor's own row is never listed for non-superadmins but still
        // has to reach the self-action guard.
        match self.state.session.user() {
            Some(me) if me.id == id => Ok(me),
            _ => Err(CoreError::NotFound { entity: "user", id }.into()),
        }
    }
}
