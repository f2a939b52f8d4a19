use crate::config::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    Json,
};
use canvas_mcp::protocol::{JsonRpcError, JsonRpcResponse};
use futures::Stream;
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

/// `POST {base_path}`: opens a stream without `sessionId`, otherwise handles
/// one JSON-RPC message against the live session
pub async fn mcp_post(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SessionQuery>,
    body: Bytes,
) -> Response {
    match query.session_id {
        None => open_session(&state).into_response(),
        Some(session_id) => session_message(&state, &session_id, &body).await,
    }
}

/// Event stream owning the session. The first event tells the client where
/// to post; the session closes when the client goes away.
fn open_session(state: &AppState) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let handle = state.sessions.open();
    let endpoint = format!("{}?sessionId={}", state.base_path, handle.id());

    let stream = async_stream::stream! {
        let handle = handle;

        match handle.activate() {
            Ok(()) => {
                tracing::info!(session_id = %handle.id(), "Session established");
                yield Ok::<_, Infallible>(Event::default().event("endpoint").data(endpoint));

                // Hold the session until the connection drops this stream
                futures::future::pending::<()>().await;
            }
            Err(e) => {
                tracing::warn!(session_id = %handle.id(), error = %e, "Session could not be activated");
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

async fn session_message(state: &AppState, session_id: &str, body: &[u8]) -> Response {
    if !state.sessions.is_active(session_id) {
        tracing::debug!(session_id = %session_id, "Message for unknown session");
        return (
            StatusCode::NOT_FOUND,
            Json(JsonRpcResponse::error(
                serde_json::Value::Null,
                JsonRpcError::session_not_found(),
            )),
        )
            .into_response();
    }

    match state.mcp.handle_message(body).await {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}
