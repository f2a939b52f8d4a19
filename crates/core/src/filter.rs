// Assignment filters applied by list_assignments

use crate::types::Assignment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Submission-status filter for assignment listings.
///
/// The predicates overlap on purpose: an overdue assignment with no
/// submission is both `Missing` and `Unsubmitted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Missing,
    Unsubmitted,
    Submitted,
}

impl StatusFilter {
    pub const VARIANTS: [&'static str; 4] = ["all", "missing", "unsubmitted", "submitted"];

    /// Whether `assignment` belongs to this filter as of `now`
    pub fn matches(&self, assignment: &Assignment, now: DateTime<Utc>) -> bool {
        match self {
            Self::All => true,
            Self::Missing => {
                assignment.is_flagged_missing()
                    || (assignment.due_at.is_some_and(|due| due < now)
                        && assignment.submitted_at().is_none())
            }
            Self::Unsubmitted => assignment.submitted_at().is_none(),
            Self::Submitted => match &assignment.submission_status {
                Some(status) => {
                    status.submitted_at.is_some()
                        || matches!(status.workflow_state.as_str(), "submitted" | "graded")
                }
                None => false,
            },
        }
    }
}

/// Best-effort check that an assignment is already unlocked.
/// Assignments without `unlock_at` count as unlocked.
pub fn is_unlocked(assignment: &Assignment, now: DateTime<Utc>) -> bool {
    assignment.unlock_at.map_or(true, |unlock| unlock <= now)
}

/// Apply the future filter, then the status filter
pub fn filter_assignments(
    assignments: Vec<Assignment>,
    include_future: bool,
    status: StatusFilter,
    now: DateTime<Utc>,
) -> Vec<Assignment> {
    assignments
        .into_iter()
        .filter(|a| include_future || is_unlocked(a, now))
        .filter(|a| status.matches(a, now))
        .collect()
}
