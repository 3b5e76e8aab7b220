//! Session store.
//!
//! Holds the authenticated user and bearer token, persists both to durable
//! storage, and publishes every change on a [`watch`] channel so that the
//! API client and the navigation filter always see the current session.
//!
//! Startup is an explicit two-step sequence: [`SessionStore::hydrate`]
//! restores the persisted snapshot synchronously, then
//! [`SessionStore::verify`] reconciles it with the backend. A verification
//! answer that arrives after the session has changed is discarded.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use campus_core::navigation::SessionView;
use campus_core::user::User;
use tokio::sync::watch;

use crate::error::{ApiError, StorageError};

/// Durable key for the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Durable key for the serialized user snapshot.
pub const USER_KEY: &str = "user";

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// An authenticated pairing of user snapshot and opaque token.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    /// Not resolved yet; guards render a placeholder.
    #[default]
    Loading,
    Anonymous,
    Authenticated(Session),
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(s) => Some(&s.user),
            _ => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            SessionState::Authenticated(s) => Some(&s.token),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    /// The guard's view of this state.
    pub fn view(&self) -> SessionView<'_> {
        match self {
            SessionState::Loading => SessionView::Loading,
            SessionState::Anonymous => SessionView::Anonymous,
            SessionState::Authenticated(s) => SessionView::SignedIn(&s.user),
        }
    }
}

// ---------------------------------------------------------------------------
// Durable storage
// ---------------------------------------------------------------------------

/// Key/value storage that survives restarts.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// One file per key inside a directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir`, creating it on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The platform's local data directory, falling back to `./.campus`.
    pub fn default_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("campus"))
            .unwrap_or_else(|| PathBuf::from(".campus"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process storage for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }
}

impl MemoryStorage {
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

// ---------------------------------------------------------------------------
// Verification seam
// ---------------------------------------------------------------------------

/// Backend check of a persisted token (`GET /auth/verify`).
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Return the fresh user snapshot for a valid token.
    async fn verify_token(&self, token: &str) -> Result<User, ApiError>;
}

// ---------------------------------------------------------------------------
// SessionStore
// ---------------------------------------------------------------------------

/// Owner of the session. Inject it where a session is needed.
pub struct SessionStore {
    storage: Box<dyn SessionStorage>,
    state: watch::Sender<SessionState>,
}

impl SessionStore {
    /// Create a store in the [`SessionState::Loading`] state.
    pub fn new(storage: impl SessionStorage + 'static) -> Self {
        let (state, _) = watch::channel(SessionState::Loading);
        Self {
            storage: Box::new(storage),
            state,
        }
    }

    /// Subscribe to session changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn current(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token().map(str::to_owned)
    }

    /// Restore the persisted snapshot without touching the network.
    ///
    /// A missing or unreadable snapshot resolves to anonymous; a corrupt
    /// one is also removed from storage.
    pub fn hydrate(&self) -> SessionState {
        let next = match self.read_persisted() {
            Ok(Some(session)) => {
                tracing::info!(user_id = session.user.id, role = %session.user.role, "Restored persisted session");
                SessionState::Authenticated(session)
            }
            Ok(None) => SessionState::Anonymous,
            Err(e @ StorageError::Corrupt(_)) => {
                tracing::warn!(error = %e, "Discarding corrupt persisted session");
                self.clear_persisted();
                SessionState::Anonymous
            }
            Err(e) => {
                tracing::warn!(error = %e, "Persisted session unreadable; starting signed out");
                SessionState::Anonymous
            }
        };
        self.publish(next.clone());
        next
    }

    /// Reconcile the hydrated session with the backend.
    ///
    /// Invalid tokens (401/403) clear the session silently. Network and
    /// other failures keep the hydrated snapshot. The outcome is applied
    /// only if the session still holds the token that was verified.
    pub async fn verify(&self, verifier: &dyn TokenVerifier) -> SessionState {
        let Some(token) = self.token() else {
            return self.current();
        };

        let result = verifier.verify_token(&token).await;

        if self.token().as_deref() != Some(token.as_str()) {
            tracing::debug!("Session changed during verification; ignoring result");
            return self.current();
        }

        match result {
            Ok(user) => {
                let session = Session { token, user };
                if let Err(e) = self.persist(&session) {
                    tracing::warn!(error = %e, "Failed to persist verified session");
                }
                tracing::info!(user_id = session.user.id, "Session verified");
                self.publish(SessionState::Authenticated(session));
            }
            Err(e) if e.is_auth_rejection() => {
                tracing::info!("Persisted token rejected; clearing session");
                self.clear_persisted();
                self.publish(SessionState::Anonymous);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Session verification failed; keeping hydrated session");
            }
        }
        self.current()
    }

    /// Hydrate, then verify.
    pub async fn init(&self, verifier: &dyn TokenVerifier) -> SessionState {
        self.hydrate();
        self.verify(verifier).await
    }

    /// Install a fresh session after login or registration.
    pub fn login(&self, session: Session) -> Result<(), StorageError> {
        self.persist(&session)?;
        tracing::info!(user_id = session.user.id, role = %session.user.role, "Signed in");
        self.publish(SessionState::Authenticated(session));
        Ok(())
    }

    /// Drop the session and its persisted copy.
    pub fn logout(&self) {
        self.clear_persisted();
        self.publish(SessionState::Anonymous);
        tracing::info!("Signed out");
    }

    // ---- private helpers ----

    fn publish(&self, next: SessionState) {
        self.state.send_replace(next);
    }

    fn read_persisted(&self) -> Result<Option<Session>, StorageError> {
        let token = self.storage.get(TOKEN_KEY)?;
        let user = self.storage.get(USER_KEY)?;
        match (token, user) {
            (Some(token), Some(user)) if !token.trim().is_empty() => {
                let user: User = serde_json::from_str(&user)?;
                Ok(Some(Session {
                    token: token.trim().to_string(),
                    user,
                }))
            }
            _ => Ok(None),
        }
    }

    fn persist(&self, session: &Session) -> Result<(), StorageError> {
        let user = serde_json::to_string(&session.user)?;
        self.storage.set(TOKEN_KEY, &session.token)?;
        self.storage.set(USER_KEY, &user)?;
        Ok(())
    }

    fn clear_persisted(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(key, error = %e, "Failed to clear persisted session entry");
            }
        }
    }
}
