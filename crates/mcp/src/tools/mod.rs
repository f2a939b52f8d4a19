pub mod args;
pub mod assignments;
pub mod courses;
pub mod grades;
pub mod upcoming;
mod registry;

pub use assignments::{GetSubmissionStatusTool, ListAssignmentsTool};
pub use courses::ListCoursesTool;
pub use grades::GetCourseGradesTool;
pub use upcoming::ListUpcomingTool;
pub use registry::{
    json_schema_array, json_schema_boolean, json_schema_enum, json_schema_id,
    json_schema_integer, json_schema_object, Tool, ToolRegistry,
};

use canvas_sdk::CanvasClient;
use std::sync::Arc;

/// Register the read-only Canvas tool set
pub fn register_canvas_tools(registry: &mut ToolRegistry, client: Arc<CanvasClient>) {
    registry.register(Arc::new(ListCoursesTool::new(client.clone())));
    registry.register(Arc::new(ListAssignmentsTool::new(client.clone())));
    registry.register(Arc::new(GetSubmissionStatusTool::new(client.clone())));
    registry.register(Arc::new(GetCourseGradesTool::new(client.clone())));
    registry.register(Arc::new(ListUpcomingTool::new(client)));
}
