//! Upcoming deadlines across courses.

use crate::client::CanvasClient;
use crate::error::CanvasResult;
use canvas_core::upcoming::{collect_upcoming, course_selected, sort_by_due, UpcomingItem, UpcomingWindow};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

/// Upcoming API, aggregating assignments over the caller's active courses.
pub struct UpcomingApi<'a> {
    client: &'a CanvasClient,
}

impl<'a> UpcomingApi<'a> {
    pub(crate) fn new(client: &'a CanvasClient) -> Self {
        Self { client }
    }

    /// Deadlines due within `days`, plus overdue ones if `include_overdue`,
    /// sorted by due date.
    pub async fn list(
        &self,
        days: u32,
        include_overdue: bool,
        course_ids: Option<&[u64]>,
    ) -> CanvasResult<Vec<UpcomingItem>> {
        self.list_at(UpcomingWindow::new(Utc::now(), days, include_overdue), course_ids)
            .await
    }

    /// Same as [`list`](Self::list) for an explicit window.
    ///
    /// A course whose assignments cannot be fetched is skipped; the other
    /// courses still contribute.
    pub async fn list_at(
        &self,
        window: UpcomingWindow,
        course_ids: Option<&[u64]>,
    ) -> CanvasResult<Vec<UpcomingItem>> {
        let courses = self.client.courses().list().await?;

        let mut items = Vec::new();
        for course in courses.iter().filter(|c| course_selected(c, course_ids)) {
            match self.client.assignments().all(course.id).await {
                Ok(assignments) => {
                    let found = collect_upcoming(course, &assignments, &window);
                    debug!(course_id = course.id, count = found.len(), "Collected upcoming items");
                    items.extend(found);
                }
                Err(err) => {
                    warn!(
                        course_id = course.id,
                        error_code = err.code(),
                        "Skipping course, assignments unavailable"
                    );
                }
            }
        }

        sort_by_due(&mut items);
        Ok(items)
    }

    /// Evaluate at a fixed instant.
    pub async fn list_as_of(
        &self,
        now: DateTime<Utc>,
        days: u32,
        include_overdue: bool,
        course_ids: Option<&[u64]>,
    ) -> CanvasResult<Vec<UpcomingItem>> {
        self.list_at(UpcomingWindow::new(now, days, include_overdue), course_ids)
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::client_for;
    use canvas_core::upcoming::UpcomingStatus;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    fn iso(at: DateTime<Utc>) -> String {
        at.to_rfc3339()
    }

    async fn mount_courses(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/v1/courses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 1, "name": "Physics", "course_code": "PHY"},
                {"id": 2, "name": "Chemistry", "course_code": "CHEM"},
                {"id": 3, "name": "Drama", "course_code": "DRA"}
            ])))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_one_failing_course_is_skipped() {
        let server = MockServer::start().await;
        mount_courses(&server).await;

        Mock::given(method("GET"))
            .and(path("/api/v1/courses/1/assignments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 10, "name": "Problem set", "due_at": iso(now() + Duration::days(3)), "points_possible": 10},
                {"id": 11, "name": "No date"}
            ])))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/v1/courses/2/assignments"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/v1/courses/3/assignments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "id": 30, "name": "Monologue", "due_at": iso(now() + Duration::days(1)),
                    "submission": {"workflow_state": "submitted", "submitted_at": iso(now())}
                },
                {"id": 31, "name": "Far away", "due_at": iso(now() + Duration::days(40))}
            ])))
            .mount(&server)
            .await;

        let items = client_for(&server)
            .upcoming()
            .list_as_of(now(), 14, true, None)
            .await
            .unwrap();

        let ids: Vec<u64> = items.iter().map(|i| i.assignment_id).collect();
        assert_eq!(ids, vec![30, 10]);
        assert_eq!(items[0].status, UpcomingStatus::Submitted);
        assert_eq!(items[0].course_name, "Drama");
        assert_eq!(items[1].points_possible, 10.0);
    }

    #[tokio::test]
    async fn test_course_filter_and_window_edges() {
        let server = MockServer::start().await;
        mount_courses(&server).await;

        let horizon = now() + Duration::days(7);
        Mock::given(method("GET"))
            .and(path("/api/v1/courses/2/assignments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 20, "name": "Edge", "due_at": iso(horizon)},
                {"id": 21, "name": "Past edge", "due_at": iso(horizon + Duration::milliseconds(1))},
                {"id": 22, "name": "Overdue", "due_at": iso(now() - Duration::hours(1))}
            ])))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let only_two = [2u64];

        let without_overdue = client
            .upcoming()
            .list_as_of(now(), 7, false, Some(&only_two[..]))
            .await
            .unwrap();
        let ids: Vec<u64> = without_overdue.iter().map(|i| i.assignment_id).collect();
        assert_eq!(ids, vec![20]);

        let with_overdue = client
            .upcoming()
            .list_as_of(now(), 7, true, Some(&only_two[..]))
            .await
            .unwrap();
        let ids: Vec<u64> = with_overdue.iter().map(|i| i.assignment_id).collect();
        assert_eq!(ids, vec![22, 20]);
    }

    #[tokio::test]
    async fn test_course_list_failure_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/courses"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let result = client_for(&server).upcoming().list_as_of(now(), 14, true, None).await;
        assert!(result.is_err());
    }
}
