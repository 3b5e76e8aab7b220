use campus_client::{ApiError, MessagingError, StorageError};
use campus_core::error::CoreError;
use campus_core::role_management::Denial;

use crate::config::ConfigError;

/// How an error is presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input; nothing was sent.
    Validation,
    /// The session or the role does not permit the action.
    Authorization,
    /// The backend could not be reached.
    Network,
    /// The backend or the client failed otherwise.
    Application,
    /// The user declined a confirmation prompt.
    Cancelled,
}

/// Application-level error for screen actions.
///
/// Wraps the core, client and guard errors and classifies them through
/// [`AppError::kind`].
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Denied(#[from] Denial),

    #[error(transparent)]
    Messaging(#[from] MessagingError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Please sign in to continue")]
    NotSignedIn,

    #[error("Action cancelled")]
    Cancelled,
}

/// Convenience alias for screen actions.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Core(core) => core_kind(core),
            AppError::Api(api) => api_kind(api),
            AppError::Denied(_) | AppError::NotSignedIn => ErrorKind::Authorization,
            AppError::Messaging(err) => match err {
                MessagingError::Invalid(core) => core_kind(core),
                MessagingError::SendInFlight => ErrorKind::Validation,
                MessagingError::Api(api) => api_kind(api),
                MessagingError::Closed => ErrorKind::Application,
            },
            AppError::Storage(_) | AppError::Config(_) => ErrorKind::Application,
            AppError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Text shown to the user, verbatim.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Core(CoreError::Validation(msg))
            | AppError::Messaging(MessagingError::Invalid(CoreError::Validation(msg))) => {
                msg.clone()
            }
            AppError::Api(ApiError::Network { url, hint, .. })
            | AppError::Messaging(MessagingError::Api(ApiError::Network { url, hint, .. })) => {
                format!("Unable to reach the server at {url}: {hint}")
            }
            AppError::Core(CoreError::Internal(_)) => "An internal error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

fn core_kind(err: &CoreError) -> ErrorKind {
    match err {
        CoreError::Validation(_) => ErrorKind::Validation,
        CoreError::Unauthorized(_) | CoreError::Forbidden(_) => ErrorKind::Authorization,
        CoreError::NotFound { .. } | CoreError::Conflict(_) | CoreError::Internal(_) => {
            ErrorKind::Application
        }
    }
}

fn api_kind(err: &ApiError) -> ErrorKind {
    match err {
        ApiError::Network { .. } => ErrorKind::Network,
        ApiError::Unauthorized { .. } | ApiError::Forbidden { .. } => ErrorKind::Authorization,
        ApiError::Api { .. } | ApiError::Decode { .. } => ErrorKind::Application,
    }
}
