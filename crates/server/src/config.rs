use crate::middleware::SecurityPolicy;
use anyhow::{bail, Context, Result};
use canvas_mcp::tools::{register_canvas_tools, ToolRegistry};
use canvas_mcp::{McpServer, SessionRegistry};
use canvas_sdk::{CanvasClient, ClientConfig, DEFAULT_TIMEOUT_MS};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use url::Url;

#[derive(Clone, Default, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub canvas: CanvasConfig,

    #[serde(default)]
    pub server: ListenConfig,
}

/// Upstream Canvas connection
#[derive(Clone, Deserialize)]
pub struct CanvasConfig {
    #[serde(default)]
    pub base_url: String,

    #[serde(default)]
    pub api_token: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Inbound MCP endpoint
#[derive(Clone, Deserialize)]
pub struct ListenConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_base_path")]
    pub base_path: String,

    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    #[serde(default)]
    pub auth_token: Option<String>,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_base_path() -> String {
    "/mcp".to_string()
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:*".to_string(),
        "http://127.0.0.1:*".to_string(),
    ]
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_token: String::new(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_path: default_base_path(),
            allowed_origins: default_allowed_origins(),
            auth_token: None,
        }
    }
}

/// Command-line and environment overrides, applied on top of the file
#[derive(clap::Args, Debug, Default, Clone)]
pub struct ConfigOverrides {
    /// Canvas instance URL, e.g. https://school.instructure.com
    #[arg(long, env = "CANVAS_BASE_URL")]
    pub canvas_base_url: Option<String>,

    /// Canvas personal access token
    #[arg(long, env = "CANVAS_API_TOKEN", hide_env_values = true)]
    pub canvas_api_token: Option<String>,

    /// Per-request timeout for Canvas calls, in milliseconds
    #[arg(long, env = "CANVAS_TIMEOUT_MS")]
    pub canvas_timeout_ms: Option<u64>,

    /// Comma-separated Origin allow-list; `scheme://host:*` allows any port
    #[arg(long, env = "MCP_ALLOWED_ORIGINS", value_delimiter = ',')]
    pub allowed_origins: Option<Vec<String>>,

    /// Bearer token clients must present
    #[arg(long, env = "MCP_AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    /// Host to bind to
    #[arg(long, env = "MCP_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "MCP_PORT")]
    pub port: Option<u16>,

    /// Path the MCP endpoint is mounted on
    #[arg(long, env = "MCP_BASE_PATH")]
    pub base_path: Option<String>,
}

impl ServerConfig {
    /// Load the TOML file if present, overlay overrides, then validate
    pub fn load(config_path: &Path, overrides: ConfigOverrides) -> Result<Self> {
        let mut config: Self = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .context("Failed to read configuration file")?;
            toml::from_str(&content).context("Failed to parse configuration file")?
        } else {
            tracing::info!(path = %config_path.display(), "Configuration file not found, using defaults");
            Self::default()
        };

        config.apply(overrides);
        config.normalize();
        config.validate()?;

        Ok(config)
    }

    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(base_url) = overrides.canvas_base_url {
            self.canvas.base_url = base_url;
        }
        if let Some(api_token) = overrides.canvas_api_token {
            self.canvas.api_token = api_token;
        }
        if let Some(timeout_ms) = overrides.canvas_timeout_ms {
            self.canvas.timeout_ms = timeout_ms;
        }
        if let Some(origins) = overrides.allowed_origins {
            self.server.allowed_origins = origins;
        }
        if let Some(auth_token) = overrides.auth_token {
            self.server.auth_token = Some(auth_token);
        }
        if let Some(host) = overrides.host {
            self.server.host = host;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(base_path) = overrides.base_path {
            self.server.base_path = base_path;
        }
    }

    /// Trim whitespace and trailing slashes; drop empty origins and tokens
    pub fn normalize(&mut self) {
        self.canvas.base_url = self.canvas.base_url.trim().to_string();
        self.canvas.api_token = self.canvas.api_token.trim().to_string();

        let base_path = self.server.base_path.trim().trim_end_matches('/');
        self.server.base_path = if base_path.is_empty() {
            "/".to_string()
        } else {
            base_path.to_string()
        };

        self.server.allowed_origins = self
            .server
            .allowed_origins
            .iter()
            .map(|o| o.trim().trim_end_matches('/').to_string())
            .filter(|o| !o.is_empty())
            .collect();

        self.server.auth_token = self
            .server
            .auth_token
            .take()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
    }

    pub fn validate(&self) -> Result<()> {
        if self.canvas.base_url.is_empty() {
            bail!("Canvas base URL is required (CANVAS_BASE_URL)");
        }
        let base_url = Url::parse(&self.canvas.base_url).context("Invalid Canvas base URL")?;
        if !matches!(base_url.scheme(), "http" | "https") {
            bail!("Canvas base URL must use http or https, got {}", base_url.scheme());
        }
        if self.canvas.api_token.is_empty() {
            bail!("Canvas API token is required (CANVAS_API_TOKEN)");
        }
        if self.canvas.timeout_ms == 0 {
            bail!("Canvas timeout must be a positive number of milliseconds");
        }
        if !self.server.base_path.starts_with('/') {
            bail!("Base path must start with '/', got {}", self.server.base_path);
        }
        if self.server.base_path == "/healthz" {
            bail!("Base path /healthz is reserved for the health check");
        }

        Ok(())
    }

    pub fn client_config(&self) -> Result<ClientConfig> {
        let base_url = Url::parse(&self.canvas.base_url).context("Invalid Canvas base URL")?;
        let config = ClientConfig::new(base_url, self.canvas.api_token.clone())
            .with_timeout_ms(self.canvas.timeout_ms)?;
        Ok(config)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// Tokens never reach logs through Debug
impl fmt::Debug for CanvasConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &"<redacted>")
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl fmt::Debug for ListenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("base_path", &self.base_path)
            .field("allowed_origins", &self.allowed_origins)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("canvas", &self.canvas)
            .field("server", &self.server)
            .finish()
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub mcp: Arc<McpServer>,
    pub sessions: SessionRegistry,
    pub security: Arc<SecurityPolicy>,
    pub base_path: String,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let client = CanvasClient::from_config(config.client_config()?)
            .context("Failed to create Canvas client")?;

        let mut registry = ToolRegistry::new();
        register_canvas_tools(&mut registry, Arc::new(client));
        tracing::info!(tools = registry.len(), "Registered tools");

        Ok(Self {
            mcp: Arc::new(McpServer::new(registry)),
            sessions: SessionRegistry::new(),
            security: Arc::new(SecurityPolicy::new(
                config.server.allowed_origins.clone(),
                config.server.auth_token.clone(),
            )),
            base_path: config.server.base_path.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ServerConfig {
        let mut config = ServerConfig::default();
        config.apply(ConfigOverrides {
            canvas_base_url: Some("https://school.instructure.com".to_string()),
            canvas_api_token: Some("secret-canvas-token".to_string()),
            ..Default::default()
        });
        config
    }

    #[test]
    fn test_toml_with_defaults() {
        let config: ServerConfig = toml::from_str(
            r#"
            [canvas]
            base_url = "https://school.instructure.com"
            api_token = "abc"

            [server]
            port = 8123
            "#,
        )
        .unwrap();

        assert_eq!(config.canvas.timeout_ms, 15_000);
        assert_eq!(config.server.port, 8123);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.base_path, "/mcp");
        assert!(config.server.auth_token.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides_win() {
        let mut config = valid();
        config.apply(ConfigOverrides {
            canvas_timeout_ms: Some(500),
            allowed_origins: Some(vec!["https://app.example.com".to_string()]),
            port: Some(9000),
            ..Default::default()
        });

        assert_eq!(config.canvas.timeout_ms, 500);
        assert_eq!(config.server.allowed_origins, vec!["https://app.example.com"]);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.canvas.api_token, "secret-canvas-token");
    }

    #[test]
    fn test_validation_failures() {
        let mut config = valid();
        config.canvas.timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = valid();
        config.canvas.base_url = "ftp://school.example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = valid();
        config.canvas.api_token = "   ".to_string();
        config.normalize();
        assert!(config.validate().is_err());

        let mut config = valid();
        config.server.base_path = "mcp".to_string();
        config.normalize();
        assert!(config.validate().is_err());

        assert!(ServerConfig::default().validate().is_err());
    }

    #[test]
    fn test_normalize() {
        let mut config = valid();
        config.server.base_path = "/mcp/".to_string();
        config.server.allowed_origins = vec![" https://a.example/ ".to_string(), "".to_string()];
        config.server.auth_token = Some("  ".to_string());
        config.normalize();

        assert_eq!(config.server.base_path, "/mcp");
        assert_eq!(config.server.allowed_origins, vec!["https://a.example"]);
        assert!(config.server.auth_token.is_none());

        config.server.base_path = "/".to_string();
        config.normalize();
        assert_eq!(config.server.base_path, "/");
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let mut config = valid();
        config.server.auth_token = Some("server-secret".to_string());

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret-canvas-token"));
        assert!(!rendered.contains("server-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_client_config() {
        let config = valid();
        let client = config.client_config().unwrap();
        assert_eq!(client.timeout_ms(), 15_000);
    }
}
