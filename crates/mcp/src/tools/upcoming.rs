// Upcoming deadlines tool

use crate::error::ToolResult;
use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::args::{deserialize_ids, parse_args};
use crate::tools::{
    json_schema_array, json_schema_boolean, json_schema_id, json_schema_integer,
    json_schema_object, Tool,
};
use canvas_sdk::{CanvasClient, DEFAULT_UPCOMING_DAYS};
use serde::Deserialize;
use std::sync::Arc;

pub struct ListUpcomingTool {
    client: Arc<CanvasClient>,
}

impl ListUpcomingTool {
    pub fn new(client: Arc<CanvasClient>) -> Self {
        Self { client }
    }
}

fn default_days() -> u32 {
    DEFAULT_UPCOMING_DAYS
}

fn default_include_overdue() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct ListUpcomingArgs {
    #[serde(default = "default_days")]
    days: u32,
    #[serde(default = "default_include_overdue")]
    include_overdue: bool,
    #[serde(default, deserialize_with = "deserialize_ids")]
    course_ids: Option<Vec<u64>>,
}

#[async_trait::async_trait]
impl Tool for ListUpcomingTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "list_upcoming".to_string(),
            description: "List deadlines across your active courses, soonest first, \
                with submitted/unsubmitted/missing status."
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "days": json_schema_integer(
                        &format!("Look-ahead window in days (default: {})", DEFAULT_UPCOMING_DAYS),
                        0
                    ),
                    "include_overdue": json_schema_boolean(
                        "Include assignments already past due (default: true)"
                    ),
                    "course_ids": json_schema_array(
                        json_schema_id("Canvas course id"),
                        "Only these courses (default: all active courses)"
                    )
                }),
                vec![],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> ToolResult<CallToolResult> {
        let args: ListUpcomingArgs = parse_args("list_upcoming", arguments)?;

        let items = self
            .client
            .upcoming()
            .list(args.days, args.include_overdue, args.course_ids.as_deref())
            .await?;
        Ok(CallToolResult::json(&items)?)
    }
}
