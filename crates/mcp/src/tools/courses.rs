// Course listing tool

use crate::error::ToolResult;
use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_object, Tool};
use canvas_sdk::CanvasClient;
use std::sync::Arc;

/// Lists the caller's active courses
pub struct ListCoursesTool {
    client: Arc<CanvasClient>,
}

impl ListCoursesTool {
    pub fn new(client: Arc<CanvasClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for ListCoursesTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "list_courses".to_string(),
            description: "List your active Canvas courses with id, name, course code and enrollment state."
                .to_string(),
            input_schema: json_schema_object(serde_json::json!({}), vec![]),
        }
    }

    async fn execute(&self, _arguments: serde_json::Value) -> ToolResult<CallToolResult> {
        let courses = self.client.courses().list().await?;
        Ok(CallToolResult::json(&courses)?)
    }
}
