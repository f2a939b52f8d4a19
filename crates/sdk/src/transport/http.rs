//! HTTP transport layer for the Canvas SDK.

use crate::config::ClientConfig;
use crate::error::{CanvasError, CanvasResult};
use reqwest::{header, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;
use url::Url;

const USER_AGENT: &str = concat!("canvas-mcp/", env!("CARGO_PKG_VERSION"));

/// HTTP transport for making authenticated, timeout-bounded API requests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<ClientConfig>,
    api_root: Url,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration.
    pub fn new(config: Arc<ClientConfig>) -> CanvasResult<Self> {
        config.validate()?;

        let mut headers = header::HeaderMap::new();
        let mut auth = header::HeaderValue::from_str(&format!("Bearer {}", config.api_token))
            .map_err(|_| CanvasError::Config("Invalid API token format".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        // Covers connect, headers and body; `bounded` adds the typed error.
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        let api_root = config.api_root()?;

        Ok(Self {
            client,
            config,
            api_root,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build an API URL for the given path, relative to `/api/v1/`.
    pub fn build_url(&self, path: &str) -> CanvasResult<Url> {
        Ok(self.api_root.join(path.trim_start_matches('/'))?)
    }

    /// Send a request, failing with `Timeout` if no response arrives in time.
    ///
    /// The client-level timeout still bounds a later body read of the
    /// returned response.
    pub async fn fetch(&self, request: RequestBuilder) -> CanvasResult<Response> {
        self.bounded(async { Ok::<_, CanvasError>(request.send().await?) })
            .await
    }

    /// Run one whole exchange under the configured deadline.
    ///
    /// When the timer wins, the future is dropped, which aborts the in-flight
    /// request. A timeout reported by reqwest itself maps to `Timeout` too.
    async fn bounded<T, F>(&self, exchange: F) -> CanvasResult<T>
    where
        F: Future<Output = CanvasResult<T>>,
    {
        let timeout = CanvasError::Timeout {
            timeout_ms: self.config.timeout_ms(),
        };
        match tokio::time::timeout(self.config.timeout, exchange).await {
            Ok(Err(CanvasError::Http(e))) if e.is_timeout() => Err(timeout),
            Ok(result) => result,
            Err(_) => Err(timeout),
        }
    }

    /// GET `url` and decode its JSON body, returning the response headers
    /// alongside. Status check and body read share the request deadline.
    pub async fn get_document<T: DeserializeOwned>(
        &self,
        url: Url,
    ) -> CanvasResult<(header::HeaderMap, T)> {
        debug!(path = url.path(), "GET request");
        let request = self.client.get(url);
        self.bounded(async {
            let response = ensure_success(request.send().await?)?;
            let headers = response.headers().clone();
            let body = decode_json(response).await?;
            Ok::<_, CanvasError>((headers, body))
        })
        .await
    }

    /// GET a single JSON document from `path` with extra query parameters.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> CanvasResult<T> {
        let mut url = self.build_url(path)?;
        append_query(&mut url, query);

        let (_, body) = self.get_document(url).await?;
        Ok(body)
    }
}

/// Append query parameters in order.
pub(crate) fn append_query(url: &mut Url, query: &[(&str, &str)]) {
    if query.is_empty() {
        return;
    }
    let mut pairs = url.query_pairs_mut();
    for (key, value) in query {
        pairs.append_pair(key, value);
    }
}

/// Turn any non-2xx response into `Upstream`.
fn ensure_success(response: Response) -> CanvasResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(CanvasError::Upstream {
            status: status.as_u16(),
        })
    }
}

/// Read the body and parse it as `T`.
async fn decode_json<T: DeserializeOwned>(response: Response) -> CanvasResult<T> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| CanvasError::InvalidResponse(e.to_string()))
}
