//! `/messages` routes and the [`MessageService`] implementation used by the
//! messaging poller.

use async_trait::async_trait;
use campus_core::messaging::{Message, NewMessage};
use campus_core::types::Id;
use campus_core::user::User;
use serde::{Deserialize, Serialize};

use super::{Resource, Users};
use crate::api::ApiClient;
use crate::error::ApiError;
use crate::poller::MessageService;

const PATH: &str = "/messages";

/// Query string of `GET /messages/conversation`.
#[derive(Debug, Serialize)]
struct ConversationQuery {
    #[serde(rename = "userId1")]
    user_id_1: Id,
    #[serde(rename = "userId2")]
    user_id_2: Id,
}

/// Answer of `GET /messages/unread/{userId}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct UnreadCount {
    #[serde(default)]
    pub count: u64,
}

/// Calls for the direct-messaging feature.
pub struct MessageApi;

impl MessageApi {
    /// The full message sequence between two users, oldest first.
    pub async fn conversation(api: &ApiClient, a: Id, b: Id) -> Result<Vec<Message>, ApiError> {
        let query = ConversationQuery {
            user_id_1: a,
            user_id_2: b,
        };
        api.get_query(&format!("{PATH}/conversation"), &query).await
    }

    /// Total unread messages addressed to `user_id`.
    pub async fn unread_total(api: &ApiClient, user_id: Id) -> Result<UnreadCount, ApiError> {
        api.get(&format!("{PATH}/unread/{user_id}")).await
    }

    /// `PUT /messages/{id}/read`. Idempotent on the backend.
    pub async fn mark_read(api: &ApiClient, message_id: Id) -> Result<(), ApiError> {
        let _: serde_json::Value = api
            .put(&format!("{PATH}/{message_id}/read"), &serde_json::json!({}))
            .await?;
        Ok(())
    }

    /// `POST /messages`.
    pub async fn send(api: &ApiClient, message: &NewMessage) -> Result<Message, ApiError> {
        api.post(PATH, message).await
    }
}

#[async_trait]
impl MessageService for ApiClient {
    async fn contacts(&self) -> Result<Vec<User>, ApiError> {
        self.get(Users::PATH).await
    }

    async fn conversation(&self, a: Id, b: Id) -> Result<Vec<Message>, ApiError> {
        MessageApi::conversation(self, a, b).await
    }

    async fn mark_read(&self, message_id: Id) -> Result<(), ApiError> {
        MessageApi::mark_read(self, message_id).await
    }

    async fn send_message(&self, message: &NewMessage) -> Result<Message, ApiError> {
        MessageApi::send(self, message).await
    }
}
