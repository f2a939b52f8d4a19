// Course grade summary tool

use crate::error::ToolResult;
use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::args::{deserialize_id, parse_args};
use crate::tools::{json_schema_id, json_schema_object, Tool};
use canvas_sdk::CanvasClient;
use serde::Deserialize;
use std::sync::Arc;

pub struct GetCourseGradesTool {
    client: Arc<CanvasClient>,
}

impl GetCourseGradesTool {
    pub fn new(client: Arc<CanvasClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct CourseGradesArgs {
    #[serde(deserialize_with = "deserialize_id")]
    course_id: u64,
}

#[async_trait::async_trait]
impl Tool for GetCourseGradesTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_course_grades".to_string(),
            description: "Get your current and final grade for a course. \
                Reports the grade as unavailable when it is hidden or not posted yet."
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "course_id": json_schema_id("Canvas course id")
                }),
                vec!["course_id"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> ToolResult<CallToolResult> {
        let args: CourseGradesArgs = parse_args("get_course_grades", arguments)?;

        // Upstream failures already collapse into an unavailable summary
        let summary = self.client.grades().course(args.course_id).await;
        Ok(CallToolResult::json(&summary)?)
    }
}
