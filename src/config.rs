//! Client configuration.
//!
//! Settings come from, in increasing priority: built-in defaults, the JSON
//! file at `<config dir>/assistant-chat/config.json`, `ASSISTANT_CHAT_*`
//! environment variables and finally command-line flags (applied by the
//! binary through the `with_*` builders).

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Server used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

const CONFIG_DIR: &str = "assistant-chat";
const CONFIG_FILE: &str = "config.json";

pub const ENV_URL: &str = "ASSISTANT_CHAT_URL";
pub const ENV_TOKEN: &str = "ASSISTANT_CHAT_TOKEN";
pub const ENV_ASSISTANT: &str = "ASSISTANT_CHAT_ASSISTANT";
pub const ENV_TIMEOUT_SECS: &str = "ASSISTANT_CHAT_TIMEOUT_SECS";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

/// Settings for an [`AssistantClient`](crate::client::AssistantClient).
///
/// # Example
///
/// ```ignore
/// use assistant_chat::config::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_base_url("http://chat.internal:8000")
///     .with_assistant("helper");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root URL of the assistant server, without a trailing slash.
    pub base_url: String,
    /// Assistant to talk to when none is chosen explicitly.
    pub assistant: Option<String>,
    /// Bearer token sent with every request.
    pub token: Option<String>,
    /// Seconds to wait for a connection before giving up.
    pub connect_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            assistant: None,
            token: None,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server URL. A trailing slash is dropped.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_assistant(mut self, assistant: impl Into<String>) -> Self {
        self.assistant = Some(assistant.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_connect_timeout_secs(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Location of the config file, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Read a config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let base_url = config.base_url.clone();
        Ok(config.with_base_url(base_url))
    }

    /// Overlay values from an environment lookup.
    ///
    /// Empty values are treated as unset.
    pub fn apply_env_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = get(ENV_URL) {
            self = self.with_base_url(url);
        }
        if let Some(token) = get(ENV_TOKEN) {
            self.token = Some(token);
        }
        if let Some(assistant) = get(ENV_ASSISTANT) {
            self.assistant = Some(assistant);
        }
        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            self.connect_timeout_secs =
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: ENV_TIMEOUT_SECS.to_string(),
                        value: raw.clone(),
                    })?;
        }

        Ok(self)
    }

    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().apply_env_from(|key| std::env::var(key).ok())
    }

    /// Defaults, then the config file at `path` if it exists, then the
    /// process environment.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "Loading config file");
                Self::from_file(path)?
            }
            _ => Self::default(),
        };

        base.apply_env_from(|key| std::env::var(key).ok())
    }

    /// [`load_from`](Self::load_from) with the default config path.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::default_path().as_deref())
    }
}
