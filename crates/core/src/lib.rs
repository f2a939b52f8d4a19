// Domain model and normalization policies for the Canvas MCP server.
// Everything here is pure: callers pass in upstream payloads and "now".

pub mod filter;
pub mod grades;
pub mod types;
pub mod upcoming;

pub use filter::{filter_assignments, StatusFilter};
pub use grades::{summarize_grades, GradeSummary, RawEnrollment, UnavailableReason};
pub use types::*;
pub use upcoming::{UpcomingItem, UpcomingStatus, UpcomingWindow};
