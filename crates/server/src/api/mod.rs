use crate::config::{AppState, ServerConfig};
use crate::middleware::security_gate;
use anyhow::{Context, Result};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

mod handlers;

/// Start the MCP server
pub async fn serve(config: ServerConfig) -> Result<()> {
    let state = AppState::new(&config)?;
    let base_path = state.base_path.clone();

    let app = create_router(state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(addr = %addr, base_path = %base_path, "MCP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("MCP server shut down");
    Ok(())
}

/// Create the router. Only the MCP endpoint sits behind the security gate.
pub fn create_router(state: AppState) -> Router {
    let state = Arc::new(state);

    let mcp = Router::new()
        .route(&state.base_path, post(handlers::mcp_post))
        .route_layer(middleware::from_fn_with_state(
            state.security.clone(),
            security_gate,
        ));

    Router::new()
        .route("/healthz", get(health_check))
        .merge(mcp)
        // Headers stay out of spans: they carry bearer tokens
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}
