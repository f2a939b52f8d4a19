// Upcoming-deadline aggregation for list_upcoming

use crate::types::{Assignment, Course};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_UPCOMING_DAYS: u32 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpcomingStatus {
    Submitted,
    Unsubmitted,
    Missing,
}

impl UpcomingStatus {
    /// The missing flag wins over a submission timestamp
    pub fn of(assignment: &Assignment) -> Self {
        if assignment.is_flagged_missing() {
            Self::Missing
        } else if assignment.submitted_at().is_some() {
            Self::Submitted
        } else {
            Self::Unsubmitted
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingItem {
    pub course_id: u64,
    pub course_name: String,
    pub assignment_id: u64,
    pub name: String,
    pub due_at: DateTime<Utc>,
    pub status: UpcomingStatus,
    pub points_possible: f64,
}

/// Inclusion window for upcoming deadlines
#[derive(Debug, Clone, Copy)]
pub struct UpcomingWindow {
    pub now: DateTime<Utc>,
    pub days: u32,
    pub include_overdue: bool,
}

impl UpcomingWindow {
    pub fn new(now: DateTime<Utc>, days: u32, include_overdue: bool) -> Self {
        Self {
            now,
            days,
            include_overdue,
        }
    }

    /// Last instant inside the window; saturates instead of overflowing
    pub fn horizon(&self) -> DateTime<Utc> {
        self.now
            .checked_add_signed(Duration::days(i64::from(self.days)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Overdue items (when enabled) plus anything due in `[now, horizon]`
    pub fn contains(&self, due_at: DateTime<Utc>) -> bool {
        let overdue = due_at < self.now;
        (overdue && self.include_overdue) || (!overdue && due_at <= self.horizon())
    }
}

/// Whether `course` was requested; no list means every course
pub fn course_selected(course: &Course, course_ids: Option<&[u64]>) -> bool {
    course_ids.map_or(true, |ids| ids.contains(&course.id))
}

/// Items of one course's assignments that fall inside `window`
pub fn collect_upcoming(
    course: &Course,
    assignments: &[Assignment],
    window: &UpcomingWindow,
) -> Vec<UpcomingItem> {
    assignments
        .iter()
        .filter_map(|assignment| {
            let due_at = assignment.due_at?;
            if !window.contains(due_at) {
                return None;
            }
            Some(UpcomingItem {
                course_id: course.id,
                course_name: course.name.clone(),
                assignment_id: assignment.id,
                name: assignment.name.clone(),
                due_at,
                status: UpcomingStatus::of(assignment),
                points_possible: assignment.points_possible,
            })
        })
        .collect()
}

/// Stable sort by due date, earliest first
pub fn sort_by_due(items: &mut [UpcomingItem]) {
    items.sort_by_key(|item| item.due_at);
}
