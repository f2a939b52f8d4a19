//! Assignments and submissions API endpoints.

use crate::client::CanvasClient;
use crate::error::CanvasResult;
use canvas_core::filter::{filter_assignments, StatusFilter};
use canvas_core::types::{Assignment, RawAssignment, RawSubmission, SubmissionDetail};
use chrono::{DateTime, Utc};

/// Assignments API for one course at a time.
pub struct AssignmentsApi<'a> {
    client: &'a CanvasClient,
}

impl<'a> AssignmentsApi<'a> {
    pub(crate) fn new(client: &'a CanvasClient) -> Self {
        Self { client }
    }

    /// Every assignment of a course with its submission summary, unfiltered.
    pub async fn all(&self, course_id: u64) -> CanvasResult<Vec<Assignment>> {
        let raw: Vec<RawAssignment> = self
            .client
            .pages
            .fetch_all_pages(
                &format!("/courses/{}/assignments", course_id),
                &[("include[]", "submission")],
            )
            .await?;
        Ok(raw.into_iter().map(Assignment::from).collect())
    }

    /// List assignments, dropping locked ones unless `include_future`, then
    /// keeping those matching `status`.
    pub async fn list(
        &self,
        course_id: u64,
        include_future: bool,
        status: StatusFilter,
    ) -> CanvasResult<Vec<Assignment>> {
        self.list_at(course_id, include_future, status, Utc::now()).await
    }

    /// Same as [`list`](Self::list) evaluated at a fixed instant.
    pub async fn list_at(
        &self,
        course_id: u64,
        include_future: bool,
        status: StatusFilter,
        now: DateTime<Utc>,
    ) -> CanvasResult<Vec<Assignment>> {
        let assignments = self.all(course_id).await?;
        Ok(filter_assignments(assignments, include_future, status, now))
    }

    /// The caller's own submission for one assignment.
    pub async fn submission(
        &self,
        course_id: u64,
        assignment_id: u64,
    ) -> CanvasResult<SubmissionDetail> {
        let raw: RawSubmission = self
            .client
            .http
            .get_json(
                &format!(
                    "/courses/{}/assignments/{}/submissions/self",
                    course_id, assignment_id
                ),
                &[("include[]", "assignment")],
            )
            .await?;
        Ok(SubmissionDetail::from_raw(raw, assignment_id))
    }
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::client_for;
    use crate::error::CanvasError;
    use canvas_core::filter::StatusFilter;
    use chrono::{TimeZone, Utc};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_assignments(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/v1/courses/5/assignments"))
            .and(query_param("include[]", "submission"))
            .and(query_param("per_page", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "id": 1, "name": "Lab 1", "due_at": "2024-03-10T23:59:00Z",
                    "points_possible": 20, "submission_types": ["online_upload"],
                    "submission": {"workflow_state": "unsubmitted", "submitted_at": null, "missing": true}
                },
                {
                    "id": 2, "name": "Lab 2", "due_at": "2024-03-20T23:59:00Z",
                    "unlock_at": "2024-03-18T00:00:00Z",
                    "submission": {"workflow_state": "unsubmitted", "submitted_at": null}
                },
                {
                    "id": 3, "name": "Quiz", "due_at": "2024-03-01T23:59:00Z",
                    "submission": {"workflow_state": "graded", "submitted_at": "2024-03-01T20:00:00Z", "score": 9}
                }
            ])))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_list_assignments_filters() {
        let server = MockServer::start().await;
        mount_assignments(&server).await;

        let client = client_for(&server);
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();

        let all = client
            .assignments()
            .list_at(5, true, StatusFilter::All, now)
            .await
            .unwrap();
        assert_eq!(all.len(), 3);

        let unlocked = client
            .assignments()
            .list_at(5, false, StatusFilter::All, now)
            .await
            .unwrap();
        let ids: Vec<u64> = unlocked.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 3]);

        let missing = client
            .assignments()
            .list_at(5, true, StatusFilter::Missing, now)
            .await
            .unwrap();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].id, 1);

        let submitted = client
            .assignments()
            .list_at(5, true, StatusFilter::Submitted, now)
            .await
            .unwrap();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].id, 3);
    }

    #[tokio::test]
    async fn test_submission_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/courses/5/assignments/3/submissions/self"))
            .and(query_param("include[]", "assignment"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "assignment_id": 3,
                "workflow_state": "graded",
                "submitted_at": "2024-03-01T20:00:00Z",
                "graded_at": "2024-03-02T09:00:00Z",
                "score": 9.5,
                "late": false,
                "missing": false,
                "excused": null,
                "preview_url": "https://canvas.example/preview",
                "assignment": {"id": 3, "name": "Quiz"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let detail = client_for(&server).assignments().submission(5, 3).await.unwrap();
        assert_eq!(detail.assignment_id, 3);
        assert_eq!(detail.name.as_deref(), Some("Quiz"));
        assert_eq!(detail.score, Some(9.5));
        assert!(!detail.excused);
    }

    #[tokio::test]
    async fn test_submission_status_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/courses/5/assignments/99/submissions/self"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = client_for(&server).assignments().submission(5, 99).await;
        assert!(matches!(result, Err(CanvasError::Upstream { status: 404 })));
    }
}
