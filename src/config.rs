//! Client configuration.
//!
//! A [`ClientConfig`] holds everything a request needs besides its own
//! descriptor: the normalized base URL, the optional auth token and the
//! per-request timeout.
//!
//! Embedding applications that keep their settings in a file can use
//! [`ClientConfig::load`], which reads a YAML file with the following
//! structure:
//!
//! ```yaml
//! # Base URL of the game service, scheme optional
//! base_url: "geo.example.com"
//!
//! # App Check token sent with protected calls (optional)
//! auth_token: "token"
//!
//! # Per-request timeout in seconds (optional, default 15)
//! timeout_secs: 15
//! ```
//!
//! Any value can be overridden with `GEOGUESS_` prefixed environment
//! variables, e.g. `GEOGUESS_BASE_URL`.

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::utils::normalize_base_url;

/// Timeout applied to every request unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Prefix of the environment variables read by [`ClientConfig::load`].
pub const ENV_PREFIX: &str = "GEOGUESS_";

/// Configuration owned by an [`crate::ApiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Normalized base URL, see [`normalize_base_url`].
    base_url: String,
    /// Auth token, never an empty string.
    auth_token: Option<String>,
    /// Per-request timeout.
    timeout: Duration,
}

/// Raw shape of the YAML file and environment variables.
#[derive(Deserialize)]
struct FileConfig {
    base_url: String,
    auth_token: Option<String>,
    timeout_secs: Option<u64>,
}

impl ClientConfig {
    /// Create a new [`ClientConfig`].
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the service, normalized before being stored.
    /// * `auth_token` - Optional auth token; an empty token counts as none.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the base URL is empty or invalid.
    pub fn new(base_url: &str, auth_token: Option<&str>) -> Result<Self, ApiError> {
        Ok(ClientConfig {
            base_url: normalize_base_url(base_url)?,
            auth_token: non_empty(auth_token),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Loads a configuration from a YAML file, overridden by `GEOGUESS_`
    /// environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the file cannot be read or parsed, or
    /// if the resulting base URL is invalid.
    pub fn load(path: &str) -> Result<Self, ApiError> {
        let file_config: FileConfig = Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(|e| ApiError::config(format!("failed to load config {}: {}", path, e)))?;

        let mut config = ClientConfig::new(&file_config.base_url, file_config.auth_token.as_deref())?;
        if let Some(secs) = file_config.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    /// Returns the configuration with another per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Replaces the base URL after normalizing it. The previous value is kept
    /// on error.
    pub fn set_base_url(&mut self, base_url: &str) -> Result<(), ApiError> {
        self.base_url = normalize_base_url(base_url)?;
        Ok(())
    }

    /// Stores the token, or clears it when `None` or empty.
    pub fn set_token(&mut self, token: Option<&str>) {
        self.auth_token = non_empty(token);
    }
}

fn non_empty(token: Option<&str>) -> Option<String> {
    token.filter(|t| !t.is_empty()).map(str::to_owned)
}
