// Assignment listing and submission status tools

use crate::error::ToolResult;
use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::args::{deserialize_id, parse_args};
use crate::tools::{
    json_schema_boolean, json_schema_enum, json_schema_id, json_schema_object, Tool,
};
use canvas_sdk::{CanvasClient, StatusFilter};
use serde::Deserialize;
use std::sync::Arc;

pub struct ListAssignmentsTool {
    client: Arc<CanvasClient>,
}

impl ListAssignmentsTool {
    pub fn new(client: Arc<CanvasClient>) -> Self {
        Self { client }
    }
}

fn default_include_future() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct ListAssignmentsArgs {
    #[serde(deserialize_with = "deserialize_id")]
    course_id: u64,
    #[serde(default = "default_include_future")]
    include_future: bool,
    #[serde(default)]
    status_filter: StatusFilter,
}

#[async_trait::async_trait]
impl Tool for ListAssignmentsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "list_assignments".to_string(),
            description: "List assignments in a course with your submission status. \
                Filter by status: missing, unsubmitted, submitted or all."
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "course_id": json_schema_id("Canvas course id"),
                    "include_future": json_schema_boolean(
                        "Include assignments that are not unlocked yet (default: true)"
                    ),
                    "status_filter": json_schema_enum(
                        &StatusFilter::VARIANTS,
                        "Submission status to keep (default: all)"
                    )
                }),
                vec!["course_id"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> ToolResult<CallToolResult> {
        let args: ListAssignmentsArgs = parse_args("list_assignments", arguments)?;

        let assignments = self
            .client
            .assignments()
            .list(args.course_id, args.include_future, args.status_filter)
            .await?;
        Ok(CallToolResult::json(&assignments)?)
    }
}

pub struct GetSubmissionStatusTool {
    client: Arc<CanvasClient>,
}

impl GetSubmissionStatusTool {
    pub fn new(client: Arc<CanvasClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct SubmissionArgs {
    #[serde(deserialize_with = "deserialize_id")]
    course_id: u64,
    #[serde(deserialize_with = "deserialize_id")]
    assignment_id: u64,
}

#[async_trait::async_trait]
impl Tool for GetSubmissionStatusTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_submission_status".to_string(),
            description: "Get your submission for one assignment: state, timestamps, score and late/missing/excused flags."
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "course_id": json_schema_id("Canvas course id"),
                    "assignment_id": json_schema_id("Canvas assignment id")
                }),
                vec!["course_id", "assignment_id"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> ToolResult<CallToolResult> {
        let args: SubmissionArgs = parse_args("get_submission_status", arguments)?;

        let submission = self
            .client
            .assignments()
            .submission(args.course_id, args.assignment_id)
            .await?;
        Ok(CallToolResult::json(&submission)?)
    }
}
