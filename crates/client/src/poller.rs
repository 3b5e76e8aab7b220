//! Poll-based conversation refresh for the messages screen.
//!
//! Selecting a contact starts one periodic task that re-fetches the
//! conversation every [`POLL_INTERVAL`], marks incoming messages as read and
//! recomputes the per-contact unread counts. A new selection, `select(None)`,
//! [`MessagingPoller::shutdown`] or dropping the poller cancels the task.
//!
//! Every selection bumps a generation counter; results fetched for an older
//! generation are discarded so a slow response for a previous contact never
//! overwrites the current conversation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use campus_core::error::CoreError;
use campus_core::messaging::{
    pending_read_ids, unread_count, validate_content, Message, NewMessage, POLL_INTERVAL,
};
use campus_core::types::Id;
use campus_core::user::User;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::error::{ApiError, MessagingError};

/// Shortest accepted poll period.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Backend calls the poller depends on.
#[async_trait]
pub trait MessageService: Send + Sync + 'static {
    /// Users that can be messaged. May include the current user.
    async fn contacts(&self) -> Result<Vec<User>, ApiError>;

    /// Messages exchanged between `a` and `b`, oldest first.
    async fn conversation(&self, a: Id, b: Id) -> Result<Vec<Message>, ApiError>;

    async fn mark_read(&self, message_id: Id) -> Result<(), ApiError>;

    async fn send_message(&self, message: &NewMessage) -> Result<Message, ApiError>;
}

/// Point-in-time copy of what the messages screen renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationSnapshot {
    pub contacts: Vec<User>,
    pub selected: Option<Id>,
    /// Active conversation exactly as the backend returned it.
    pub conversation: Vec<Message>,
    /// Unread messages per contact id.
    pub unread: HashMap<Id, usize>,
    pub draft: String,
    pub sending: bool,
    /// Last fetch failure for the active conversation, cleared on success.
    pub last_error: Option<String>,
}

impl ConversationSnapshot {
    pub fn unread_for(&self, contact: Id) -> usize {
        self.unread.get(&contact).copied().unwrap_or(0)
    }

    pub fn total_unread(&self) -> usize {
        self.unread.values().sum()
    }
}

#[derive(Default)]
struct PollerState {
    view: ConversationSnapshot,
    generation: u64,
    torn_down: bool,
}

struct Inner<S> {
    service: S,
    me: Id,
    state: Mutex<PollerState>,
}

struct ActivePoll {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Decrements the live-task counter when a poll task ends or is dropped
/// before it ever ran.
struct LiveGuard(Arc<AtomicUsize>);

impl LiveGuard {
    fn register(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Resets the in-flight flag even if the send future is dropped.
struct SendingGuard<'a>(&'a Mutex<PollerState>);

impl Drop for SendingGuard<'_> {
    fn drop(&mut self) {
        lock(self.0).view.sending = false;
    }
}

fn lock(state: &Mutex<PollerState>) -> MutexGuard<'_, PollerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Conversation poller for the user `me`.
pub struct MessagingPoller<S: MessageService> {
    inner: Arc<Inner<S>>,
    interval: Duration,
    active: Mutex<Option<ActivePoll>>,
    live: Arc<AtomicUsize>,
    shutdown: CancellationToken,
}

impl<S: MessageService> MessagingPoller<S> {
    pub fn new(service: S, me: Id) -> Self {
        Self {
            inner: Arc::new(Inner {
                service,
                me,
                state: Mutex::new(PollerState::default()),
            }),
            interval: POLL_INTERVAL,
            active: Mutex::new(None),
            live: Arc::new(AtomicUsize::new(0)),
            shutdown: CancellationToken::new(),
        }
    }

    /// Override the poll period. Values below [`MIN_INTERVAL`] are raised
    /// to it.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_INTERVAL);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn me(&self) -> Id {
        self.inner.me
    }

    pub fn snapshot(&self) -> ConversationSnapshot {
        lock(&self.inner.state).view.clone()
    }

    /// Number of poll tasks still running.
    pub fn active_pollers(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Fetch the contact list (without the current user) and recompute the
    /// unread counts for it.
    pub async fn load_contacts(&self) -> Result<Vec<User>, MessagingError> {
        let me = self.inner.me;
        let contacts: Vec<User> = self
            .inner
            .service
            .contacts()
            .await?
            .into_iter()
            .filter(|u| u.id != me)
            .collect();

        {
            let mut state = lock(&self.inner.state);
            if state.torn_down {
                return Err(MessagingError::Closed);
            }
            state.view.contacts = contacts.clone();
        }
        tracing::debug!(count = contacts.len(), "Loaded message contacts");

        self.inner.refresh_unread().await;
        Ok(contacts)
    }

    /// Recompute unread counts for every loaded contact.
    pub async fn refresh_unread_counts(&self) {
        self.inner.refresh_unread().await;
    }

    /// Change the active conversation.
    ///
    /// Stops the running poll task, if any, then starts a new one for
    /// `contact` whose first fetch happens immediately. `None` leaves the
    /// poller idle. Must be called from within a Tokio runtime.
    pub fn select(&self, contact: Option<Id>) -> Result<(), MessagingError> {
        // Held across the generation bump so concurrent selections spawn in
        // generation order.
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        let generation = {
            let mut state = lock(&self.inner.state);
            if state.torn_down {
                return Err(MessagingError::Closed);
            }
            state.generation += 1;
            state.view.selected = contact;
            state.view.conversation.clear();
            state.view.last_error = None;
            state.generation
        };

        if let Some(previous) = active.take() {
            previous.cancel.cancel();
        }
        if let Some(contact) = contact {
            *active = Some(self.spawn_poll(contact, generation));
        }
        Ok(())
    }

    pub fn set_draft(&self, draft: impl Into<String>) {
        lock(&self.inner.state).view.draft = draft.into();
    }

    /// Send the current draft to the selected contact.
    ///
    /// Rejected without a network call when the draft is blank, no contact
    /// is selected, or a previous send has not finished. On success the
    /// draft is cleared and the conversation and unread counts are
    /// refreshed right away.
    pub async fn submit(&self) -> Result<Message, MessagingError> {
        let (new_message, generation) = {
            let mut state = lock(&self.inner.state);
            if state.torn_down {
                return Err(MessagingError::Closed);
            }
            if state.view.sending {
                return Err(MessagingError::SendInFlight);
            }
            let receiver_id = state.view.selected.ok_or_else(|| {
                CoreError::Validation("Select a contact before sending".into())
            })?;
            let content = validate_content(&state.view.draft)?;
            state.view.sending = true;
            (
                NewMessage {
                    sender_id: self.inner.me,
                    receiver_id,
                    content,
                },
                state.generation,
            )
        };

        let sent = {
            let _sending = SendingGuard(&self.inner.state);
            self.inner.service.send_message(&new_message).await
        };
        let message = sent.inspect_err(|e| {
            tracing::warn!(receiver_id = new_message.receiver_id, error = %e, "Message send failed");
        })?;

        {
            let mut state = lock(&self.inner.state);
            if state.generation == generation {
                state.view.draft.clear();
            }
        }
        tracing::info!(
            message_id = message.id,
            receiver_id = new_message.receiver_id,
            "Message sent"
        );

        self.inner
            .poll_once(new_message.receiver_id, generation)
            .await;
        Ok(message)
    }

    /// Stop polling and wait for the task to finish. Later calls to
    /// [`select`](Self::select) or [`submit`](Self::submit) fail with
    /// [`MessagingError::Closed`].
    pub async fn shutdown(&self) {
        lock(&self.inner.state).torn_down = true;
        self.shutdown.cancel();
        let active = self
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(active) = active {
            if let Err(e) = active.handle.await {
                if !e.is_cancelled() {
                    tracing::warn!(error = %e, "Poll task ended abnormally");
                }
            }
        }
    }

    // ---- private helpers ----

    fn spawn_poll(&self, contact: Id, generation: u64) -> ActivePoll {
        let cancel = self.shutdown.child_token();
        let token = cancel.clone();
        let inner = Arc::clone(&self.inner);
        let period = self.interval;
        let live = LiveGuard::register(&self.live);

        let handle = tokio::spawn(async move {
            let _live = live;
            tracing::info!(contact, generation, "Conversation polling started");

            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = inner.poll_once(contact, generation) => {}
                }
            }

            tracing::info!(contact, generation, "Conversation polling stopped");
        });

        ActivePoll { cancel, handle }
    }
}

impl<S: MessageService> Drop for MessagingPoller<S> {
    fn drop(&mut self) {
        lock(&self.inner.state).torn_down = true;
        self.shutdown.cancel();
        let active = self
            .active
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(active) = active {
            active.handle.abort();
        }
    }
}

impl<S: MessageService> Inner<S> {
    fn is_current(&self, generation: u64) -> bool {
        let state = lock(&self.state);
        state.generation == generation && !state.torn_down
    }

    /// One poll cycle for `contact` under `generation`.
    async fn poll_once(&self, contact: Id, generation: u64) {
        let conversation = match self.service.conversation(self.me, contact).await {
            Ok(conversation) => conversation,
            Err(e) => {
                tracing::warn!(contact, error = %e, "Conversation fetch failed");
                let mut state = lock(&self.state);
                if state.generation == generation && !state.torn_down {
                    state.view.last_error = Some(e.to_string());
                }
                return;
            }
        };

        if !self.is_current(generation) {
            tracing::debug!(contact, generation, "Discarding stale conversation");
            return;
        }

        for message_id in pending_read_ids(&conversation, self.me) {
            if let Err(e) = self.service.mark_read(message_id).await {
                tracing::warn!(message_id, error = %e, "Failed to mark message as read");
            }
        }

        {
            let mut state = lock(&self.state);
            if state.generation != generation || state.torn_down {
                return;
            }
            state.view.conversation = conversation;
            state.view.last_error = None;
        }

        self.refresh_unread().await;
    }

    /// Fan-out: one conversation fetch per contact.
    async fn refresh_unread(&self) {
        let contacts: Vec<Id> = {
            let state = lock(&self.state);
            state
                .view
                .contacts
                .iter()
                .map(|u| u.id)
                .filter(|id| *id != self.me)
                .collect()
        };
        if contacts.is_empty() {
            return;
        }

        let results = futures::future::join_all(contacts.into_iter().map(|contact| async move {
            (contact, self.service.conversation(self.me, contact).await)
        }))
        .await;

        let mut state = lock(&self.state);
        if state.torn_down {
            return;
        }
        for (contact, result) in results {
            match result {
                Ok(conversation) => {
                    state
                        .view
                        .unread
                        .insert(contact, unread_count(&conversation, self.me));
                }
                Err(e) => {
                    tracing::warn!(contact, error = %e, "Unread count refresh failed");
                }
            }
        }
    }
}
