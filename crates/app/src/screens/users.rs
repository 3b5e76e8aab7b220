//! User management for admins. Deletion goes through the same guard as the
//! role-management roster.

use campus_client::models::user::User;
use campus_client::resources::Users;
use campus_core::navigation::Route;
use campus_core::role_management::{self, Decision, Denial};
use campus_core::roles::Capability;

use super::crud::{CrudScreen, ScreenPolicy};

pub struct UsersPolicy;

impl ScreenPolicy for UsersPolicy {
    type Resource = Users;

    const ROUTE: Route = Route::Users;
    const CREATE: Capability = Capability::ManageUsers;
    const EDIT: Capability = Capability::ManageUsers;
    const DELETE: Capability = Capability::DeleteUsers;

    fn authorize_delete(actor: &User, target: &User) -> Result<Decision, Denial> {
        role_management::authorize_delete(Some(actor), target)
    }
}

pub type UsersScreen = CrudScreen<UsersPolicy>;
