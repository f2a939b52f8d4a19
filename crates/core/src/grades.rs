// Grade summary selection for get_course_grades

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Enrollment as returned by `GET /users/self/enrollments`
#[derive(Debug, Clone, Deserialize)]
pub struct RawEnrollment {
    pub id: u64,
    pub course_id: u64,
    pub enrollment_state: Option<String>,
    pub enrollment_term_id: Option<u64>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub grades: Option<RawGrades>,
    pub computed_current_score: Option<f64>,
    pub computed_current_grade: Option<String>,
    pub computed_final_score: Option<f64>,
    pub computed_final_grade: Option<String>,
    pub course: Option<RawEnrollmentCourse>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGrades {
    pub current_score: Option<f64>,
    pub current_grade: Option<String>,
    pub final_score: Option<f64>,
    pub final_grade: Option<String>,
}

/// Course dates, present when upstream embeds the course in the enrollment
#[derive(Debug, Clone, Deserialize)]
pub struct RawEnrollmentCourse {
    pub enrollment_term_id: Option<u64>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
}

impl RawEnrollment {
    pub fn is_active(&self) -> bool {
        self.enrollment_state.as_deref() == Some("active")
    }

    pub fn term_id(&self) -> Option<u64> {
        self.course
            .as_ref()
            .and_then(|c| c.enrollment_term_id)
            .or(self.enrollment_term_id)
    }

    pub fn course_start_at(&self) -> Option<DateTime<Utc>> {
        self.course.as_ref().and_then(|c| c.start_at).or(self.start_at)
    }

    pub fn course_end_at(&self) -> Option<DateTime<Utc>> {
        self.course.as_ref().and_then(|c| c.end_at).or(self.end_at)
    }

    /// True when any grade value, including a zero score, is present
    pub fn has_grades(&self) -> bool {
        let nested = self.grades.as_ref().is_some_and(|g| {
            g.current_score.is_some()
                || g.current_grade.is_some()
                || g.final_score.is_some()
                || g.final_grade.is_some()
        });
        nested || self.computed_current_score.is_some() || self.computed_current_grade.is_some()
    }

    fn metadata(&self) -> EnrollmentMetadata {
        EnrollmentMetadata {
            enrollment_state: self
                .enrollment_state
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            term_id: self.term_id(),
            course_start_at: self.course_start_at(),
            course_end_at: self.course_end_at(),
        }
    }
}

/// Why grades could not be reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    NoGradesYet,
    HiddenOrUnavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentMetadata {
    pub enrollment_state: String,
    pub term_id: Option<u64>,
    pub course_start_at: Option<DateTime<Utc>>,
    pub course_end_at: Option<DateTime<Utc>>,
}

/// Grade summary for one course
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GradeSummary {
    Unavailable {
        course_id: u64,
        reason: UnavailableReason,
        #[serde(flatten)]
        enrollment: Option<EnrollmentMetadata>,
    },
    Available {
        course_id: u64,
        current_score: Option<f64>,
        current_grade: Option<String>,
        final_score: Option<f64>,
        final_grade: Option<String>,
        #[serde(flatten)]
        enrollment: EnrollmentMetadata,
        last_updated: Option<DateTime<Utc>>,
    },
}

impl GradeSummary {
    /// Summary for a course whose enrollments could not be read
    pub fn hidden(course_id: u64) -> Self {
        Self::Unavailable {
            course_id,
            reason: UnavailableReason::HiddenOrUnavailable,
            enrollment: None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }
}

/// Ranking used to pick one enrollment: open-ended enrollments first, then
/// the latest course end date, then the highest enrollment id.
fn compare_enrollments(a: &RawEnrollment, b: &RawEnrollment) -> Ordering {
    let by_end = match (a.course_end_at(), b.course_end_at()) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => y.cmp(&x),
    };
    by_end.then_with(|| b.id.cmp(&a.id))
}

/// Pick the enrollment to report for `course_id`, preferring active ones
pub fn select_enrollment(enrollments: &[RawEnrollment], course_id: u64) -> Option<&RawEnrollment> {
    let candidates: Vec<&RawEnrollment> = enrollments
        .iter()
        .filter(|e| e.course_id == course_id)
        .collect();

    let active: Vec<&RawEnrollment> = candidates.iter().copied().filter(|e| e.is_active()).collect();
    let pool = if active.is_empty() { candidates } else { active };

    pool.into_iter().min_by(|a, b| compare_enrollments(a, b))
}

/// Build the grade summary for `course_id` out of the caller's enrollments
pub fn summarize_grades(enrollments: &[RawEnrollment], course_id: u64) -> GradeSummary {
    let Some(enrollment) = select_enrollment(enrollments, course_id) else {
        return GradeSummary::hidden(course_id);
    };

    if !enrollment.has_grades() {
        return GradeSummary::Unavailable {
            course_id,
            reason: UnavailableReason::NoGradesYet,
            enrollment: Some(enrollment.metadata()),
        };
    }

    let grades = enrollment.grades.clone().unwrap_or_default();
    GradeSummary::Available {
        course_id,
        current_score: grades.current_score.or(enrollment.computed_current_score),
        current_grade: grades
            .current_grade
            .or_else(|| enrollment.computed_current_grade.clone()),
        final_score: grades.final_score.or(enrollment.computed_final_score),
        final_grade: grades
            .final_grade
            .or_else(|| enrollment.computed_final_grade.clone()),
        enrollment: enrollment.metadata(),
        last_updated: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn enrollment(value: serde_json::Value) -> RawEnrollment {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_active_preferred_over_later_inactive() {
        let enrollments = vec![
            enrollment(json!({
                "id": 1, "course_id": 10, "enrollment_state": "active",
                "end_at": "2024-05-01T00:00:00Z"
            })),
            enrollment(json!({
                "id": 2, "course_id": 10, "enrollment_state": "completed",
                "end_at": "2024-12-01T00:00:00Z"
            })),
        ];

        let selected = select_enrollment(&enrollments, 10).unwrap();
        assert_eq!(selected.id, 1);
    }

    #[test]
    fn test_higher_id_wins_without_end_dates() {
        let enrollments = vec![
            enrollment(json!({"id": 5, "course_id": 10, "enrollment_state": "active"})),
            enrollment(json!({"id": 9, "course_id": 10, "enrollment_state": "active"})),
        ];

        assert_eq!(select_enrollment(&enrollments, 10).unwrap().id, 9);
    }

    #[test]
    fn test_open_ended_ranks_before_dated() {
        let enrollments = vec![
            enrollment(json!({
                "id": 20, "course_id": 10, "enrollment_state": "active",
                "end_at": "2030-01-01T00:00:00Z"
            })),
            enrollment(json!({"id": 3, "course_id": 10, "enrollment_state": "active"})),
        ];

        assert_eq!(select_enrollment(&enrollments, 10).unwrap().id, 3);
    }

    #[test]
    fn test_inactive_fallback_when_no_active() {
        let enrollments = vec![
            enrollment(json!({
                "id": 1, "course_id": 10, "enrollment_state": "completed",
                "end_at": "2023-01-01T00:00:00Z"
            })),
            enrollment(json!({
                "id": 2, "course_id": 10, "enrollment_state": "inactive",
                "end_at": "2023-06-01T00:00:00Z"
            })),
            enrollment(json!({"id": 3, "course_id": 11, "enrollment_state": "active"})),
        ];

        assert_eq!(select_enrollment(&enrollments, 10).unwrap().id, 2);
    }

    #[test]
    fn test_zero_score_is_available() {
        let enrollments = vec![enrollment(json!({
            "id": 1, "course_id": 10, "enrollment_state": "active",
            "computed_current_score": 0
        }))];

        let summary = summarize_grades(&enrollments, 10);
        assert!(summary.is_available());
        match summary {
            GradeSummary::Available { current_score, .. } => assert_eq!(current_score, Some(0.0)),
            other => panic!("expected available, got {:?}", other),
        }
    }

    #[test]
    fn test_no_grades_yet_carries_metadata() {
        let enrollments = vec![enrollment(json!({
            "id": 1, "course_id": 10, "enrollment_state": "active",
            "enrollment_term_id": 4,
            "grades": {"current_score": null, "final_score": null},
            "course": {"start_at": "2024-01-10T00:00:00Z", "end_at": null}
        }))];

        let value = serde_json::to_value(summarize_grades(&enrollments, 10)).unwrap();
        assert_eq!(value["status"], "unavailable");
        assert_eq!(value["reason"], "no_grades_yet");
        assert_eq!(value["enrollment_state"], "active");
        assert_eq!(value["term_id"], 4);
        assert_eq!(value["course_start_at"], "2024-01-10T00:00:00Z");
        assert_eq!(value["course_end_at"], serde_json::Value::Null);
    }

    #[test]
    fn test_nested_grades_preferred_over_computed() {
        let enrollments = vec![enrollment(json!({
            "id": 1, "course_id": 10, "enrollment_state": "active",
            "grades": {"current_score": 91.5, "current_grade": "A-", "final_score": null},
            "computed_current_score": 80.0,
            "computed_current_grade": "B",
            "computed_final_score": 70.0
        }))];

        let value = serde_json::to_value(summarize_grades(&enrollments, 10)).unwrap();
        assert_eq!(value["status"], "available");
        assert_eq!(value["current_score"], 91.5);
        assert_eq!(value["current_grade"], "A-");
        assert_eq!(value["final_score"], 70.0);
        assert_eq!(value["final_grade"], serde_json::Value::Null);
        assert_eq!(value["last_updated"], serde_json::Value::Null);
    }

    #[test]
    fn test_missing_course_is_hidden() {
        let enrollments = vec![enrollment(json!({"id": 1, "course_id": 11}))];

        let value = serde_json::to_value(summarize_grades(&enrollments, 10)).unwrap();
        assert_eq!(value["status"], "unavailable");
        assert_eq!(value["reason"], "hidden_or_unavailable");
        assert_eq!(value["course_id"], 10);
        assert!(value.get("enrollment_state").is_none());
    }
}
