//! Canvas API endpoints, grouped by resource.

mod assignments;
mod courses;
mod grades;
mod upcoming;

pub use assignments::AssignmentsApi;
pub use courses::CoursesApi;
pub use grades::GradesApi;
pub use upcoming::UpcomingApi;
