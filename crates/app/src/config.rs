use std::path::PathBuf;
use std::time::Duration;

use campus_client::session::FileStorage;
use campus_core::messaging::POLL_INTERVAL;

const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Client configuration loaded from environment variables.
///
/// All fields have defaults suitable for a local backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the REST backend, including the `/api` prefix.
    pub api_url: String,
    /// Directory holding the persisted session.
    pub data_dir: PathBuf,
    /// Period of the conversation poller.
    pub poll_interval: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            data_dir: FileStorage::default_dir(),
            poll_interval: POLL_INTERVAL,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                        |
    /// |---------------------------|--------------------------------|
    /// | `CAMPUS_API_URL`          | `http://localhost:5000/api`    |
    /// | `CAMPUS_DATA_DIR`         | platform data dir + `/campus`  |
    /// | `CAMPUS_POLL_INTERVAL_MS` | `2000`                         |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_url = match lookup("CAMPUS_API_URL") {
            Some(url) => {
                let url = url.trim().trim_end_matches('/').to_string();
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::Invalid {
                        var: "CAMPUS_API_URL",
                        expected: "an http(s) URL",
                        value: url,
                    });
                }
                url
            }
            None => defaults.api_url,
        };

        let data_dir = lookup("CAMPUS_DATA_DIR")
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let poll_interval = match lookup("CAMPUS_POLL_INTERVAL_MS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => Duration::from_millis(ms),
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "CAMPUS_POLL_INTERVAL_MS",
                        expected: "a positive number of milliseconds",
                        value: raw,
                    })
                }
            },
            None => defaults.poll_interval,
        };

        Ok(Self {
            api_url,
            data_dir,
            poll_interval,
        })
    }
}
