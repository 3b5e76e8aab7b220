//! Direct-messaging types and rules.
//!
//! The transport is poll-based: the client re-fetches the active
//! conversation every [`POLL_INTERVAL`]. Conversations are kept exactly as
//! the backend returns them (oldest first); there is no client-side
//! reordering or deduplication.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Id, Timestamp};

/// Fixed period between two fetches of the active conversation.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Upper bound on a single message body, in characters.
pub const MAX_MESSAGE_CHARS: usize = 5000;

/// A stored message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Id,
    pub sender_id: Id,
    pub receiver_id: Id,
    pub content: String,
    pub created_at: Timestamp,
    #[serde(default)]
    pub read: bool,
}

impl Message {
    /// Unread and addressed to `user_id`.
    pub fn is_unread_for(&self, user_id: Id) -> bool {
        self.receiver_id == user_id && !self.read
    }
}

/// Body of `POST /messages`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    pub sender_id: Id,
    pub receiver_id: Id,
    pub content: String,
}

/// Number of messages in `conversation` that `user_id` has not read yet.
pub fn unread_count(conversation: &[Message], user_id: Id) -> usize {
    conversation
        .iter()
        .filter(|m| m.is_unread_for(user_id))
        .count()
}

/// Ids of the messages the current user still has to mark as read, in
/// conversation order.
pub fn pending_read_ids(conversation: &[Message], user_id: Id) -> Vec<Id> {
    conversation
        .iter()
        .filter(|m| m.is_unread_for(user_id))
        .map(|m| m.id)
        .collect()
}

/// Validate a draft before sending. Returns the content to send.
///
/// Blank drafts are rejected; surrounding whitespace is trimmed.
pub fn validate_content(draft: &str) -> Result<String, CoreError> {
    let content = draft.trim();
    if content.is_empty() {
        return Err(CoreError::Validation("Message cannot be empty".into()));
    }
    if content.chars().count() > MAX_MESSAGE_CHARS {
        return Err(CoreError::Validation(format!(
            "Message cannot exceed {MAX_MESSAGE_CHARS} characters"
        )));
    }
    Ok(content.to_string())
}
