//! Main client for the Canvas SDK.

use crate::api::*;
use crate::config::{ClientConfig, DEFAULT_TIMEOUT_MS};
use crate::error::{CanvasError, CanvasResult};
use crate::transport::{HttpTransport, LinkPaginator};
use std::sync::Arc;
use url::Url;

/// Read-only client for the Canvas REST API.
#[derive(Debug, Clone)]
pub struct CanvasClient {
    config: Arc<ClientConfig>,
    pub(crate) http: HttpTransport,
    pub(crate) pages: LinkPaginator,
}

impl CanvasClient {
    /// Create a new client builder.
    pub fn builder() -> CanvasClientBuilder {
        CanvasClientBuilder::new()
    }

    /// Create a client from configuration.
    pub fn from_config(config: ClientConfig) -> CanvasResult<Self> {
        let config = Arc::new(config);
        let http = HttpTransport::new(config.clone())?;
        let pages = LinkPaginator::new(http.clone());

        Ok(Self {
            config,
            http,
            pages,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the courses API.
    pub fn courses(&self) -> CoursesApi<'_> {
        CoursesApi::new(self)
    }

    /// Get the assignments API.
    pub fn assignments(&self) -> AssignmentsApi<'_> {
        AssignmentsApi::new(self)
    }

    /// Get the grades API.
    pub fn grades(&self) -> GradesApi<'_> {
        GradesApi::new(self)
    }

    /// Get the upcoming-deadlines API.
    pub fn upcoming(&self) -> UpcomingApi<'_> {
        UpcomingApi::new(self)
    }
}

/// Builder for creating a CanvasClient.
pub struct CanvasClientBuilder {
    base_url: Option<String>,
    api_token: Option<String>,
    timeout_ms: u64,
}

impl CanvasClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_token: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Set the base URL of the Canvas instance.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the API token.
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Set the per-request timeout in milliseconds.
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Build the client.
    pub fn build(self) -> CanvasResult<CanvasClient> {
        let base_url_str = self
            .base_url
            .ok_or_else(|| CanvasError::Config("base_url is required".to_string()))?;
        let api_token = self
            .api_token
            .ok_or_else(|| CanvasError::Config("api_token is required".to_string()))?;

        let base_url = Url::parse(&base_url_str)?;
        let config = ClientConfig::new(base_url, api_token).with_timeout_ms(self.timeout_ms)?;

        CanvasClient::from_config(config)
    }
}

impl Default for CanvasClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
