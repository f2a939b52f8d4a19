//! Configuration types for the Canvas SDK.

use crate::error::{CanvasError, CanvasResult};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Default per-request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// Path prefix of the Canvas REST API.
const API_PREFIX: &str = "api/v1/";

/// Configuration for the Canvas client.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the Canvas instance, e.g. `https://school.instructure.com`.
    pub base_url: Url,
    /// Personal access token sent as a bearer credential.
    pub api_token: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a new configuration with the default timeout.
    pub fn new(base_url: Url, api_token: impl Into<String>) -> Self {
        Self {
            base_url,
            api_token: api_token.into(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    /// Set the timeout, rejecting zero.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> CanvasResult<Self> {
        self.timeout = validate_timeout_ms(timeout_ms)?;
        Ok(self)
    }

    /// Timeout in whole milliseconds, as reported in timeout errors.
    pub fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }

    /// Root of the REST API (`{base_url}/api/v1/`).
    ///
    /// A base URL that already ends in `/api/v1` is used as is.
    pub fn api_root(&self) -> CanvasResult<Url> {
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        if base.path().ends_with(API_PREFIX) {
            return Ok(base);
        }
        Ok(base.join(API_PREFIX)?)
    }

    /// Check the invariants the transport relies on.
    pub fn validate(&self) -> CanvasResult<()> {
        match self.base_url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(CanvasError::Config(format!(
                    "base URL must use http or https, got {}",
                    other
                )))
            }
        }
        if self.api_token.trim().is_empty() {
            return Err(CanvasError::Config("API token must not be empty".to_string()));
        }
        validate_timeout_ms(self.timeout_ms())?;
        Ok(())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Timeouts must be a positive number of milliseconds.
pub fn validate_timeout_ms(timeout_ms: u64) -> CanvasResult<Duration> {
    if timeout_ms == 0 {
        return Err(CanvasError::Config(
            "timeout must be a positive number of milliseconds".to_string(),
        ));
    }
    Ok(Duration::from_millis(timeout_ms))
}
