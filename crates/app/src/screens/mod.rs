//! Screen controllers.
//!
//! Every screen enters through the route guard and returns a [`View`];
//! every action re-checks the capability it needs before any request is
//! sent.

pub mod admin;
pub mod crud;
pub mod dashboard;
pub mod enrollments;
pub mod lesson_plans;
pub mod messages;
pub mod modal;
pub mod reports;
pub mod role_management;
pub mod users;

use campus_client::{SessionState, SessionStore};
use campus_core::navigation::{guard_route, Access, Route};
use campus_core::role_management::Denial;
use campus_core::roles::{can, Capability, Role};
use campus_core::user::User;

use crate::error::{AppError, AppResult};

/// What a guarded screen renders.
#[derive(Debug, Clone, PartialEq)]
pub enum View<T> {
    /// The session is still being restored.
    Loading,
    /// No session: send the user to the login entry point.
    RedirectToLogin,
    /// Signed in with a role outside the route's set.
    AccessDenied {
        required: &'static [Role],
        actual: Role,
    },
    Ready(T),
}

impl<T> View<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, View::Ready(_))
    }

    pub fn ready(self) -> Option<T> {
        match self {
            View::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> View<U> {
        match self {
            View::Loading => View::Loading,
            View::RedirectToLogin => View::RedirectToLogin,
            View::AccessDenied { required, actual } => View::AccessDenied { required, actual },
            View::Ready(value) => View::Ready(f(value)),
        }
    }
}

/// A yes/no prompt shown before destructive or sensitive actions.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Run the route guard. `Ok(user)` when the route is granted, otherwise the
/// view to render instead.
pub(crate) fn admit<T>(state: &SessionState, route: Route) -> Result<User, View<T>> {
    match guard_route(state.view(), route) {
        Access::Granted(user) => Ok(user.clone()),
        Access::Loading => Err(View::Loading),
        Access::RedirectToLogin => Err(View::RedirectToLogin),
        Access::Denied { required, actual } => {
            tracing::info!(route = route.path(), role = %actual, "Route access denied");
            Err(View::AccessDenied { required, actual })
        }
    }
}

/// The signed-in user, if it holds `capability`.
pub(crate) fn require(session: &SessionStore, capability: Capability) -> AppResult<User> {
    let user = session.user().ok_or(AppError::NotSignedIn)?;
    if !can(Some(&user), capability) {
        tracing::info!(user_id = user.id, ?capability, "Action denied client-side");
        return Err(Denial::MissingCapability(capability).into());
    }
    Ok(user)
}

/// Ask `confirm` and turn a "no" into [`AppError::Cancelled`].
pub(crate) fn confirmed(confirm: &dyn Confirm, prompt: &str) -> AppResult<()> {
    if confirm.confirm(prompt) {
        Ok(())
    } else {
        tracing::debug!(prompt, "Confirmation declined");
        Err(AppError::Cancelled)
    }
}
