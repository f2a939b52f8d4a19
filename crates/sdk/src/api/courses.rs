//! Courses API endpoints.

use crate::client::CanvasClient;
use crate::error::CanvasResult;
use canvas_core::types::{Course, RawCourse};

/// Courses API for the caller's active courses.
pub struct CoursesApi<'a> {
    client: &'a CanvasClient,
}

impl<'a> CoursesApi<'a> {
    pub(crate) fn new(client: &'a CanvasClient) -> Self {
        Self { client }
    }

    /// List every active course, reduced to id/name/code/state.
    pub async fn list(&self) -> CanvasResult<Vec<Course>> {
        let raw: Vec<RawCourse> = self
            .client
            .pages
            .fetch_all_pages("/courses", &[("enrollment_state", "active")])
            .await?;
        Ok(raw.into_iter().map(Course::from).collect())
    }
}
