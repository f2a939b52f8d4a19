// MCP request dispatch: envelope validation, method routing, and tool calls

use crate::error::ToolError;
use crate::protocol::{
    CallToolParams, CallToolResult, InitializeParams, InitializeResult, JsonRpcError,
    JsonRpcRequest, JsonRpcResponse, ListToolsResult, ServerInfo, JSONRPC_VERSION,
};
use crate::tools::ToolRegistry;
use serde_json::Value;
use std::time::Instant;
use uuid::Uuid;

/// Log target for per-call telemetry records
pub const TELEMETRY_TARGET: &str = "canvas_mcp::telemetry";

pub struct McpServer {
    registry: ToolRegistry,
    server_info: ServerInfo,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry,
            server_info: ServerInfo {
                name: "canvas-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn server_info(&self) -> &ServerInfo {
        &self.server_info
    }

    /// Handle one raw JSON-RPC message. Returns `None` for notifications.
    pub async fn handle_message(&self, body: &[u8]) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(error = %e, "Rejected unparseable message");
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    JsonRpcError::invalid_request("Body is not valid JSON"),
                ));
            }
        };

        let request = match validate_envelope(value) {
            Ok(request) => request,
            Err(error) => return Some(JsonRpcResponse::error(Value::Null, error)),
        };

        self.handle_request(request).await
    }

    /// Dispatch a validated request
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id.clone() else {
            tracing::debug!(method = %request.method, "Received notification");
            return None;
        };

        let response = match request.method.as_str() {
            "initialize" => self.initialize(id, request.params),
            "ping" => JsonRpcResponse::success(id, serde_json::json!({})),
            "tools/list" => JsonRpcResponse::from_serializable(
                id,
                &ListToolsResult {
                    tools: self.registry.list_schemas(),
                },
            ),
            "tools/call" => match parse_call_params(request.params) {
                Ok(params) => {
                    let result = self.call_tool(params).await;
                    JsonRpcResponse::from_serializable(id, &result)
                }
                Err(error) => JsonRpcResponse::error(id, error),
            },
            other => JsonRpcResponse::error(id, JsonRpcError::method_not_found(other)),
        };

        Some(response)
    }

    fn initialize(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let params: InitializeParams = match params {
            Some(params) => match serde_json::from_value(params) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(id, JsonRpcError::invalid_params(e.to_string()))
                }
            },
            None => InitializeParams::default(),
        };

        let result =
            InitializeResult::negotiate(params.protocol_version.as_deref(), self.server_info.clone());
        tracing::info!(
            protocol_version = %result.protocol_version,
            client = params.client_info.as_ref().map(|c| c.name.as_str()).unwrap_or("unknown"),
            "Client initialized"
        );

        JsonRpcResponse::from_serializable(id, &result)
    }

    /// Run a tool. Failures become `isError` results, never protocol errors.
    pub async fn call_tool(&self, params: CallToolParams) -> CallToolResult {
        let request_id = Uuid::new_v4();
        let started = Instant::now();

        let outcome = match self.registry.get(&params.name) {
            Some(tool) => {
                tool.execute(params.arguments.unwrap_or(Value::Null))
                    .await
            }
            None => Err(ToolError::UnknownTool(params.name.clone())),
        };

        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        match outcome {
            Ok(result) => {
                tracing::info!(
                    target: TELEMETRY_TARGET,
                    tool = %params.name,
                    request_id = %request_id,
                    duration_ms,
                    success = true,
                    "Tool call completed"
                );
                result
            }
            Err(err) => {
                let code = err.code();
                tracing::info!(
                    target: TELEMETRY_TARGET,
                    tool = %params.name,
                    request_id = %request_id,
                    duration_ms,
                    success = false,
                    error_code = code,
                    "Tool call failed"
                );
                CallToolResult::error(code, err)
            }
        }
    }
}

/// Check the JSON-RPC 2.0 envelope before anything is dispatched
fn validate_envelope(value: Value) -> Result<JsonRpcRequest, JsonRpcError> {
    let Value::Object(object) = value else {
        return Err(JsonRpcError::invalid_request("Request must be a JSON object"));
    };

    if object.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
        return Err(JsonRpcError::invalid_request("jsonrpc must be \"2.0\""));
    }

    let method = match object.get("method").and_then(Value::as_str) {
        Some(method) if !method.is_empty() => method.to_string(),
        _ => return Err(JsonRpcError::invalid_request("method must be a non-empty string")),
    };

    // A present `"id": null` still expects a response
    let id = object.get("id").cloned();
    let params = object.get("params").cloned();

    Ok(JsonRpcRequest {
        jsonrpc: JSONRPC_VERSION.to_string(),
        id,
        method,
        params,
    })
}

fn parse_call_params(params: Option<Value>) -> Result<CallToolParams, JsonRpcError> {
    let params = params.ok_or_else(|| JsonRpcError::invalid_params("Missing params"))?;
    serde_json::from_value(params)
        .map_err(|e| JsonRpcError::invalid_params(format!("Invalid tools/call params: {}", e)))
}
