//! Layered configuration for the backend client and the feedback poller.
//!
//! Sources, highest priority first:
//!
//! 1. Environment variables prefixed `HOMESTEAD_`, with `__` separating
//!    nested sections (`HOMESTEAD_BACKEND__BASE_URL` -> `backend.base_url`)
//! 2. An explicit TOML file, or `homestead.toml` in the working directory
//! 3. Built-in defaults

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "HOMESTEAD_";

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "homestead.toml";

const fn default_timeout_secs() -> u64 {
    15
}

const fn default_poll_interval_secs() -> u64 {
    60
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_owned()
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment failed to merge or extract a source.
    #[error("configuration error: {0}")]
    Figment(Box<figment::Error>),

    /// A field holds a value the client cannot use.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// Dotted field path.
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

/// Backend REST endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL every REST path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Bearer token sent with every request, if any.
    #[serde(default)]
    pub api_token: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            api_token: None,
        }
    }
}

impl BackendConfig {
    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Pending-feedback poll settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackPollConfig {
    /// Seconds between polls.
    #[serde(default = "default_poll_interval_secs")]
    pub interval_secs: u64,
}

impl Default for FeedbackPollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval_secs(),
        }
    }
}

impl FeedbackPollConfig {
    /// Returns the poll interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomesteadConfig {
    /// Backend REST settings.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Feedback poller settings.
    #[serde(default)]
    pub feedback_poll: FeedbackPollConfig,
}

impl HomesteadConfig {
    /// Loads configuration from defaults, `homestead.toml` and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a source cannot be parsed or a value is
    /// unusable.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration, reading `path` instead of the default file when
    /// given.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a source cannot be parsed or a value is
    /// unusable.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(path).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Builds the provider chain without extracting it.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let file = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), Path::to_path_buf);
        if file.exists() {
            figment = figment.merge(Toml::file(file));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.backend.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "backend.base_url",
                reason: format!("'{base_url}' must start with http:// or https://"),
            });
        }
        if self.backend.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "backend.timeout_secs",
                reason: "must be greater than zero".to_owned(),
            });
        }
        if self.feedback_poll.interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "feedback_poll.interval_secs",
                reason: "must be greater than zero".to_owned(),
            });
        }
        Ok(())
    }
}
