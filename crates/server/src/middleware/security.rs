// Request gate for the MCP endpoint: Host, Origin, then bearer token.
//
// Every check runs before the body is read or any tool is dispatched.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::net::Ipv4Addr;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use url::Url;

/// Origin allow-list entry
#[derive(Debug, Clone, PartialEq, Eq)]
enum OriginRule {
    Exact(String),
    /// `scheme://host:*`, any port or none
    AnyPort { scheme: String, host: String },
}

impl OriginRule {
    fn parse(entry: &str) -> Self {
        let entry = entry.trim().trim_end_matches('/');
        if let Some(prefix) = entry.strip_suffix(":*") {
            if let Ok(url) = Url::parse(prefix) {
                if let Some(host) = url.host_str() {
                    return Self::AnyPort {
                        scheme: url.scheme().to_string(),
                        host: host.to_string(),
                    };
                }
            }
        }
        Self::Exact(entry.to_ascii_lowercase())
    }

    fn matches(&self, origin: &str) -> bool {
        match self {
            Self::Exact(allowed) => origin.eq_ignore_ascii_case(allowed),
            Self::AnyPort { scheme, host } => match Url::parse(origin) {
                Ok(url) => url.scheme() == scheme && url.host_str() == Some(host.as_str()),
                Err(_) => false,
            },
        }
    }
}

/// Which check turned a request away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Host,
    Origin,
    Token,
}

impl Rejection {
    fn name(&self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::Origin => "origin",
            Self::Token => "bearer_token",
        }
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        match self {
            Self::Host | Self::Origin => (
                StatusCode::FORBIDDEN,
                Json(serde_json::json!({"error": "Forbidden"})),
            )
                .into_response(),
            Self::Token => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"))],
                Json(serde_json::json!({"error": "Unauthorized"})),
            )
                .into_response(),
        }
    }
}

#[derive(Debug)]
pub struct SecurityPolicy {
    origins: Vec<OriginRule>,
    auth_token: Option<String>,
}

impl SecurityPolicy {
    pub fn new(allowed_origins: Vec<String>, auth_token: Option<String>) -> Self {
        Self {
            origins: allowed_origins.iter().map(|o| OriginRule::parse(o)).collect(),
            auth_token,
        }
    }

    /// Run all checks in order
    pub fn check(&self, headers: &HeaderMap) -> Result<(), Rejection> {
        let host = headers.get(header::HOST).and_then(|v| v.to_str().ok());
        if !host.is_some_and(is_local_host) {
            return Err(Rejection::Host);
        }

        if let Some(origin) = headers.get(header::ORIGIN) {
            let allowed = origin
                .to_str()
                .map(|origin| self.origin_allowed(origin))
                .unwrap_or(false);
            if !allowed {
                return Err(Rejection::Origin);
            }
        }

        if let Some(expected) = &self.auth_token {
            let presented = headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "));
            if !presented.is_some_and(|token| token_matches(token, expected)) {
                return Err(Rejection::Token);
            }
        }

        Ok(())
    }

    fn origin_allowed(&self, origin: &str) -> bool {
        let origin = origin.trim().trim_end_matches('/');
        self.origins.iter().any(|rule| rule.matches(origin))
    }
}

/// Loopback, unspecified, private IPv4, or an mDNS `.local` name; any port
pub fn is_local_host(host: &str) -> bool {
    let name = strip_port(host.trim()).to_ascii_lowercase();

    if matches!(name.as_str(), "localhost" | "127.0.0.1" | "0.0.0.0") {
        return true;
    }
    if let Ok(ip) = name.parse::<Ipv4Addr>() {
        return ip.is_private();
    }
    name.len() > ".local".len() && name.ends_with(".local")
}

fn strip_port(host: &str) -> &str {
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}

/// Lengths first, then a constant-time byte comparison
fn token_matches(presented: &str, expected: &str) -> bool {
    if presented.len() != expected.len() {
        return false;
    }
    presented.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Axum middleware wrapping [`SecurityPolicy::check`]
pub async fn security_gate(
    State(policy): State<Arc<SecurityPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    match policy.check(request.headers()) {
        Ok(()) => next.run(request).await,
        Err(rejection) => {
            tracing::warn!(check = rejection.name(), "Request rejected");
            rejection.into_response()
        }
    }
}
