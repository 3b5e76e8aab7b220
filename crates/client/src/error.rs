//! Error types for the API client, session storage and messaging.

use campus_core::error::CoreError;

/// Errors from the REST gateway layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never reached the backend (DNS, refused connection,
    /// TLS, transport timeout).
    #[error("Unable to reach the server at {url}: {hint}")]
    Network {
        url: String,
        hint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// 401: missing, expired or invalid token.
    #[error("{message}")]
    Unauthorized { message: String },

    /// 403: the backend refused an action for the current role.
    #[error("{message}")]
    Forbidden {
        message: String,
        details: Option<serde_json::Value>,
    },

    /// Any other non-2xx status with the backend's own message.
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// A 2xx response whose body did not match the expected shape.
    #[error("Unexpected response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// HTTP status, when the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Forbidden { .. } => Some(403),
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Network { .. } | ApiError::Decode { .. } => None,
        }
    }

    /// The backend rejected the credentials or the action (401/403).
    pub fn is_auth_rejection(&self) -> bool {
        matches!(
            self,
            ApiError::Unauthorized { .. } | ApiError::Forbidden { .. }
        )
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network { .. })
    }

    /// Optional structured `details` from the error body.
    pub fn details(&self) -> Option<&serde_json::Value> {
        match self {
            ApiError::Forbidden { details, .. } | ApiError::Api { details, .. } => {
                details.as_ref()
            }
            _ => None,
        }
    }
}

/// Errors from durable session storage.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored session is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Reasons a message send is refused or fails.
#[derive(Debug, thiserror::Error)]
pub enum MessagingError {
    /// Blank draft or no contact selected; nothing was sent.
    #[error(transparent)]
    Invalid(#[from] CoreError),

    /// A previous send from the same input has not finished yet.
    #[error("A message is already being sent")]
    SendInFlight,

    /// The poller was torn down.
    #[error("Conversation view is closed")]
    Closed,

    #[error(transparent)]
    Api(#[from] ApiError),
}
