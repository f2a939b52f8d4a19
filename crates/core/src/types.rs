use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Enrollment state assumed for courses fetched with the active-enrollment filter
pub const DEFAULT_ENROLLMENT_STATE: &str = "active";

// Upstream shapes. Only the fields we read are declared; everything else in
// the upstream payload is ignored during deserialization.

/// Course as returned by `GET /courses`
#[derive(Debug, Clone, Deserialize)]
pub struct RawCourse {
    pub id: u64,
    pub name: Option<String>,
    pub course_code: Option<String>,
    pub enrollment_state: Option<String>,
    #[serde(default)]
    pub enrollments: Vec<RawCourseEnrollment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCourseEnrollment {
    pub enrollment_state: Option<String>,
}

/// Assignment as returned by `GET /courses/:id/assignments?include[]=submission`
#[derive(Debug, Clone, Deserialize)]
pub struct RawAssignment {
    pub id: u64,
    pub name: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
    pub unlock_at: Option<DateTime<Utc>>,
    pub lock_at: Option<DateTime<Utc>>,
    pub points_possible: Option<f64>,
    #[serde(default)]
    pub submission_types: Vec<String>,
    pub submission: Option<RawSubmission>,
}

/// Submission object, either embedded in an assignment or fetched directly
#[derive(Debug, Clone, Deserialize)]
pub struct RawSubmission {
    pub assignment_id: Option<u64>,
    pub workflow_state: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub graded_at: Option<DateTime<Utc>>,
    pub score: Option<f64>,
    pub late: Option<bool>,
    pub missing: Option<bool>,
    pub excused: Option<bool>,
    pub assignment: Option<RawSubmissionAssignment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSubmissionAssignment {
    pub name: Option<String>,
}

// Normalized shapes handed to the agent.

/// An active course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: u64,
    pub name: String,
    pub course_code: String,
    pub enrollment_state: String,
}

impl From<RawCourse> for Course {
    fn from(raw: RawCourse) -> Self {
        let enrollment_state = raw
            .enrollment_state
            .or_else(|| {
                raw.enrollments
                    .into_iter()
                    .find_map(|enrollment| enrollment.enrollment_state)
            })
            .unwrap_or_else(|| DEFAULT_ENROLLMENT_STATE.to_string());

        Self {
            id: raw.id,
            name: raw.name.unwrap_or_default(),
            course_code: raw.course_code.unwrap_or_default(),
            enrollment_state,
        }
    }
}

/// Submission summary attached to an assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionStatus {
    pub workflow_state: String,
    pub submitted_at: Option<DateTime<Utc>>,
    pub missing: bool,
    pub late: bool,
}

impl From<RawSubmission> for SubmissionStatus {
    fn from(raw: RawSubmission) -> Self {
        Self {
            workflow_state: raw
                .workflow_state
                .unwrap_or_else(|| "unsubmitted".to_string()),
            submitted_at: raw.submitted_at,
            missing: raw.missing.unwrap_or(false),
            late: raw.late.unwrap_or(false),
        }
    }
}

/// Assignment with its optional submission summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: u64,
    pub name: String,
    pub due_at: Option<DateTime<Utc>>,
    pub unlock_at: Option<DateTime<Utc>>,
    pub lock_at: Option<DateTime<Utc>>,
    pub points_possible: f64,
    pub submission_types: Vec<String>,
    pub submission_status: Option<SubmissionStatus>,
}

impl From<RawAssignment> for Assignment {
    fn from(raw: RawAssignment) -> Self {
        Self {
            id: raw.id,
            name: raw.name.unwrap_or_default(),
            due_at: raw.due_at,
            unlock_at: raw.unlock_at,
            lock_at: raw.lock_at,
            points_possible: raw.points_possible.unwrap_or(0.0).max(0.0),
            submission_types: raw.submission_types,
            submission_status: raw.submission.map(SubmissionStatus::from),
        }
    }
}

impl Assignment {
    /// Submission timestamp, if a submission exists and was turned in
    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submission_status.as_ref().and_then(|s| s.submitted_at)
    }

    /// Whether upstream flagged the submission as missing
    pub fn is_flagged_missing(&self) -> bool {
        self.submission_status.as_ref().is_some_and(|s| s.missing)
    }
}

/// Full status of the caller's own submission for one assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionDetail {
    pub assignment_id: u64,
    pub name: Option<String>,
    pub workflow_state: String,
    pub submitted_at: Option<DateTime<Utc>>,
    pub graded_at: Option<DateTime<Utc>>,
    pub score: Option<f64>,
    pub late: bool,
    pub missing: bool,
    pub excused: bool,
}

impl SubmissionDetail {
    /// Normalize a raw submission. `requested_assignment_id` is used when
    /// upstream leaves `assignment_id` out of the body.
    pub fn from_raw(raw: RawSubmission, requested_assignment_id: u64) -> Self {
        Self {
            assignment_id: raw.assignment_id.unwrap_or(requested_assignment_id),
            name: raw.assignment.and_then(|a| a.name),
            workflow_state: raw
                .workflow_state
                .unwrap_or_else(|| "unsubmitted".to_string()),
            submitted_at: raw.submitted_at,
            graded_at: raw.graded_at,
            score: raw.score,
            late: raw.late.unwrap_or(false),
            missing: raw.missing.unwrap_or(false),
            excused: raw.excused.unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_course_strips_extra_fields() {
        let raw: RawCourse = serde_json::from_value(json!({
            "id": 42,
            "name": "Biology",
            "course_code": "BIO-101",
            "workflow_state": "available",
            "account_id": 7,
            "uuid": "abc",
            "enrollments": [{"type": "student", "enrollment_state": "active"}]
        }))
        .unwrap();

        let value = serde_json::to_value(Course::from(raw)).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 4);
        for key in ["id", "name", "course_code", "enrollment_state"] {
            assert!(keys.contains(&key), "missing {}", key);
        }
    }

    #[test]
    fn test_course_enrollment_state_defaults_to_active() {
        let raw: RawCourse = serde_json::from_value(json!({"id": 1, "name": "Art"})).unwrap();
        let course = Course::from(raw);
        assert_eq!(course.enrollment_state, "active");
        assert_eq!(course.course_code, "");
    }

    #[test]
    fn test_assignment_normalization() {
        let raw: RawAssignment = serde_json::from_value(json!({
            "id": 9,
            "name": "Essay",
            "due_at": "2024-03-01T23:59:00Z",
            "points_possible": null,
            "html_url": "https://canvas.example/courses/1/assignments/9",
            "rubric": [{"id": "r1"}],
            "submission": {
                "workflow_state": "submitted",
                "submitted_at": "2024-02-28T10:00:00Z",
                "missing": null,
                "late": false,
                "body": "secret essay text"
            }
        }))
        .unwrap();

        let assignment = Assignment::from(raw);
        assert_eq!(assignment.points_possible, 0.0);
        assert!(assignment.submission_types.is_empty());

        let status = assignment.submission_status.clone().unwrap();
        assert_eq!(status.workflow_state, "submitted");
        assert!(!status.missing);

        let value = serde_json::to_value(&assignment).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 8);
        assert!(!object.contains_key("html_url"));
        assert!(!object.contains_key("rubric"));
        assert_eq!(object["unlock_at"], serde_json::Value::Null);
        let submission = object["submission_status"].as_object().unwrap();
        assert_eq!(submission.len(), 4);
        assert!(!submission.contains_key("body"));
    }

    #[test]
    fn test_negative_points_clamped() {
        let raw: RawAssignment =
            serde_json::from_value(json!({"id": 1, "points_possible": -5.0})).unwrap();
        assert_eq!(Assignment::from(raw).points_possible, 0.0);
    }

    #[test]
    fn test_submission_detail_nulls_not_absent() {
        let raw: RawSubmission = serde_json::from_value(json!({})).unwrap();
        let detail = SubmissionDetail::from_raw(raw, 55);

        assert_eq!(detail.assignment_id, 55);
        assert_eq!(detail.workflow_state, "unsubmitted");

        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["submitted_at"], serde_json::Value::Null);
        assert_eq!(value["graded_at"], serde_json::Value::Null);
        assert_eq!(value["score"], serde_json::Value::Null);
        assert_eq!(value["name"], serde_json::Value::Null);
        assert_eq!(value["excused"], json!(false));
    }
}
