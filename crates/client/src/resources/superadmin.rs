//! `/superadmin/*` routes: global roster, admin management, role changes.
//!
//! Callers run the guards in [`campus_core::role_management`] first; these
//! wrappers only perform the request.

use campus_core::roles::Role;
use campus_core::types::Id;
use campus_core::user::User;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::admin::{RoleChangeRequest, SystemStats};

const PATH: &str = "/superadmin";

pub struct SuperAdminApi;

impl SuperAdminApi {
    /// Every account, regardless of role.
    pub async fn all_users(api: &ApiClient) -> Result<Vec<User>, ApiError> {
        api.get(&format!("{PATH}/users/all")).await
    }

    pub async fn admins(api: &ApiClient) -> Result<Vec<User>, ApiError> {
        api.get(&format!("{PATH}/admins")).await
    }

    pub async fn system_stats(api: &ApiClient) -> Result<SystemStats, ApiError> {
        api.get(&format!("{PATH}/system/stats")).await
    }

    pub async fn change_role(api: &ApiClient, user_id: Id, role: Role) -> Result<(), ApiError> {
        let _: serde_json::Value = api
            .put(
                &format!("{PATH}/users/{user_id}/role"),
                &RoleChangeRequest { role },
            )
            .await?;
        tracing::info!(user_id, role = %role, "Changed user role");
        Ok(())
    }

    pub async fn promote(api: &ApiClient, user_id: Id) -> Result<(), ApiError> {
        let _: serde_json::Value = api
            .post(&format!("{PATH}/users/{user_id}/promote"), &serde_json::json!({}))
            .await?;
        tracing::info!(user_id, "Promoted user to admin");
        Ok(())
    }

    pub async fn demote(api: &ApiClient, user_id: Id) -> Result<(), ApiError> {
        let _: serde_json::Value = api
            .post(&format!("{PATH}/users/{user_id}/demote"), &serde_json::json!({}))
            .await?;
        tracing::info!(user_id, "Demoted admin");
        Ok(())
    }

    pub async fn delete_user(api: &ApiClient, user_id: Id) -> Result<(), ApiError> {
        api.delete(&format!("{PATH}/users/{user_id}")).await?;
        tracing::info!(user_id, "Deleted user");
        Ok(())
    }
}
