//! Error types for the Canvas SDK.

/// Result type for SDK operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Error types that can occur when talking to the Canvas API.
///
/// Messages never include the API token or response bodies.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    /// The request did not complete within the configured timeout.
    #[error("Request timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    /// Canvas answered with a non-success status.
    #[error("Canvas API returned status {status}")]
    Upstream { status: u16 },

    /// The response body was not the expected JSON structure.
    #[error("Invalid response from Canvas: {0}")]
    InvalidResponse(String),

    /// Transport failure other than a timeout.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl CanvasError {
    /// Stable machine-readable code, used to tag tool errors and log records.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "TIMEOUT",
            Self::Upstream { .. } => "UPSTREAM_ERROR",
            Self::InvalidResponse(_) => "INVALID_RESPONSE",
            Self::Http(_) => "NETWORK_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::InvalidUrl(_) => "CONFIG_ERROR",
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
