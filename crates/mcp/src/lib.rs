// MCP (Model Context Protocol) server for Canvas LMS
//
// Exposes the read-only Canvas operations as tools to agent clients.

pub mod error;
pub mod protocol;
pub mod server;
pub mod session;
pub mod tools;

pub use error::{ToolError, ToolResult};
pub use server::McpServer;
pub use session::{SessionError, SessionHandle, SessionRegistry, SessionState};
