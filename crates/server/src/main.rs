use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

mod api;
mod config;
mod middleware;

use config::{ConfigOverrides, ServerConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "canvas-mcp")]
#[command(version, about = "Read-only Canvas LMS tools over the Model Context Protocol", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "canvas-mcp.toml")]
    config: PathBuf,

    /// Log output format
    #[arg(long, value_enum, default_value = "text", env = "MCP_LOG_FORMAT")]
    log_format: LogFormat,

    #[command(flatten)]
    overrides: ConfigOverrides,
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "canvas=info,tower_http=info".into());

    match format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // .env is optional

    let args = Args::parse();
    init_tracing(args.log_format);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Canvas MCP server");

    let config = ServerConfig::load(&args.config, args.overrides)?;
    tracing::debug!(?config, "Configuration loaded");

    api::serve(config).await?;

    Ok(())
}
