//! Messages screen: the conversation poller behind the messages guard.

use campus_client::{ApiClient, ConversationSnapshot, MessagingPoller};
use campus_core::messaging::Message;
use campus_core::navigation::Route;
use campus_core::types::Id;

use super::{admit, View};
use crate::error::AppResult;
use crate::state::AppState;

pub struct MessagesScreen {
    poller: MessagingPoller<ApiClient>,
}

impl MessagesScreen {
    /// Guard the route, then load contacts and their unread counts.
    /// No poll task runs until a contact is selected.
    pub async fn open(state: &AppState) -> AppResult<View<MessagesScreen>> {
        let user = match admit(&state.session.current(), Route::Messages) {
            Ok(user) => user,
            Err(view) => return Ok(view),
        };

        let poller = MessagingPoller::new(state.api.clone(), user.id)
            .with_interval(state.config.poll_interval);
        poller.load_contacts().await?;
        Ok(View::Ready(Self { poller }))
    }

    pub fn poller(&self) -> &MessagingPoller<ApiClient> {
        &self.poller
    }

    pub fn snapshot(&self) -> ConversationSnapshot {
        self.poller.snapshot()
    }

    pub fn select(&self, contact: Option<Id>) -> AppResult<()> {
        Ok(self.poller.select(contact)?)
    }

    /// Put `text` in the draft and send it to the selected contact.
    pub async fn send(&self, text: &str) -> AppResult<Message> {
        self.poller.set_draft(text);
        Ok(self.poller.submit().await?)
    }

    /// Stop polling. The screen cannot be used afterwards.
    pub async fn close(self) {
        self.poller.shutdown().await;
    }
}
