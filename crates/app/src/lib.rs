//! Screen controllers, configuration and application state for the campus
//! client. The `campus` binary in `main.rs` drives these from the command
//! line.

pub mod config;
pub mod error;
pub mod screens;
pub mod state;

pub use config::ClientConfig;
pub use error::{AppError, AppResult, ErrorKind};
pub use state::AppState;
