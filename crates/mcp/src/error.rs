// Tool-level errors. These never fail the transport: the server turns them
// into `isError` results.

use canvas_sdk::CanvasError;

pub type ToolResult<T> = Result<T, ToolError>;

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error(transparent)]
    Canvas(#[from] CanvasError),

    #[error("Failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ToolError {
    /// Stable code shown to the agent and in telemetry
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArguments(_) => "INVALID_ARGUMENTS",
            Self::UnknownTool(_) => "UNKNOWN_TOOL",
            Self::Canvas(err) => err.code(),
            Self::Encode(_) => "INTERNAL_ERROR",
        }
    }
}
