//! I/O layer of the campus client: REST gateway, wire models, session
//! persistence and the conversation poller.

pub mod api;
pub mod error;
pub mod models;
pub mod navigation;
pub mod poller;
pub mod resources;
pub mod session;

pub use api::ApiClient;
pub use error::{ApiError, MessagingError, StorageError};
pub use navigation::NavigationFilter;
pub use poller::{ConversationSnapshot, MessageService, MessagingPoller};
pub use session::{Session, SessionState, SessionStore};
