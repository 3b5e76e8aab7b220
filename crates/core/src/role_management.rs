//! Guards for the role-management roster.
//!
//! These run before any request is sent so that obviously disallowed
//! actions never reach the backend. They are a UX guard only; the backend
//! enforces the same rules.

use crate::roles::{can, is_super_admin, Capability, Role};
use crate::user::User;

/// What the caller must do before issuing an allowed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Send the request.
    Proceed,
    /// Ask the actor for an explicit confirmation first; send only on yes.
    Confirm,
    /// Nothing would change; do not send anything.
    Unchanged,
}

/// Why an action was refused client-side.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Denial {
    #[error("You must be signed in to do that")]
    NotAuthenticated,

    #[error("You cannot change your own role")]
    OwnRole,

    #[error("You cannot delete your own account")]
    OwnAccount,

    #[error("Only a superadmin can modify a superadmin account")]
    SuperAdminTarget,

    #[error("Cannot assign the role '{0}'")]
    InvalidRole(Role),

    #[error("Your role does not allow this action")]
    MissingCapability(Capability),
}

/// Decide whether `actor` may change `target`'s role to `new_role`.
pub fn authorize_role_change(
    actor: Option<&User>,
    target: &User,
    new_role: Role,
) -> Result<Decision, Denial> {
    let actor = actor.ok_or(Denial::NotAuthenticated)?;
    if !new_role.is_known() {
        return Err(Denial::InvalidRole(new_role));
    }
    if actor.is_same_account(target) {
        if new_role == actor.role {
            return Ok(Decision::Unchanged);
        }
        return Err(Denial::OwnRole);
    }
    if target.role == Role::SuperAdmin && !is_super_admin(Some(actor)) {
        return Err(Denial::SuperAdminTarget);
    }
    if !can(Some(actor), Capability::ChangeRoles) {
        return Err(Denial::MissingCapability(Capability::ChangeRoles));
    }
    if new_role == target.role {
        return Ok(Decision::Unchanged);
    }
    if target.role == Role::SuperAdmin {
        return Ok(Decision::Confirm);
    }
    Ok(Decision::Proceed)
}

/// Decide whether `actor` may delete `target`.
pub fn authorize_delete(actor: Option<&User>, target: &User) -> Result<Decision, Denial> {
    let actor = actor.ok_or(Denial::NotAuthenticated)?;
    if actor.is_same_account(target) {
        return Err(Denial::OwnAccount);
    }
    if target.role == Role::SuperAdmin && !is_super_admin(Some(actor)) {
        return Err(Denial::SuperAdminTarget);
    }
    if !can(Some(actor), Capability::DeleteUsers) {
        return Err(Denial::MissingCapability(Capability::DeleteUsers));
    }
    if target.role == Role::SuperAdmin {
        return Ok(Decision::Confirm);
    }
    Ok(Decision::Proceed)
}

/// Promotion to `admin` from the admin-management panel.
pub fn authorize_promotion(actor: Option<&User>, target: &User) -> Result<Decision, Denial> {
    admin_panel_check(actor, target)?;
    if matches!(target.role, Role::Admin) {
        return Ok(Decision::Unchanged);
    }
    Ok(Decision::Proceed)
}

/// Demotion of an `admin` from the admin-management panel.
pub fn authorize_demotion(actor: Option<&User>, target: &User) -> Result<Decision, Denial> {
    admin_panel_check(actor, target)?;
    if target.role != Role::Admin {
        return Ok(Decision::Unchanged);
    }
    Ok(Decision::Proceed)
}

fn admin_panel_check(actor: Option<&User>, target: &User) -> Result<(), Denial> {
    let actor = actor.ok_or(Denial::NotAuthenticated)?;
    if actor.is_same_account(target) {
        return Err(Denial::OwnRole);
    }
    if target.role == Role::SuperAdmin {
        return Err(Denial::SuperAdminTarget);
    }
    if !can(Some(actor), Capability::ManageAdmins) {
        return Err(Denial::MissingCapability(Capability::ManageAdmins));
    }
    Ok(())
}

/// The roles whose rows `actor` may see on the role-management roster.
pub fn visible_roles(actor: Option<&User>) -> &'static [Role] {
    match actor.map(|u| u.role) {
        Some(Role::SuperAdmin) => &[Role::SuperAdmin, Role::Admin, Role::Teacher, Role::Student],
        Some(Role::Admin) => &[Role::Teacher, Role::Student],
        Some(Role::Teacher) => &[Role::Student],
        _ => &[],
    }
}

/// Filter `users` down to the rows `actor` may see, keeping input order.
///
/// Superadmins also see rows with an unrecognised role so such accounts can
/// be repaired.
pub fn visible_roster(actor: Option<&User>, users: Vec<User>) -> Vec<User> {
    let roles = visible_roles(actor);
    let sees_all = is_super_admin(actor);
    users
        .into_iter()
        .filter(|u| sees_all || roles.contains(&u.role))
        .collect()
}

/// Roles `actor` may offer in a role picker for a user other than itself.
pub fn assignable_roles(actor: Option<&User>) -> &'static [Role] {
    if is_super_admin(actor) {
        &[Role::SuperAdmin, Role::Admin, Role::Teacher, Role::Student]
    } else {
        &[]
    }
}
