//! # Canvas SDK
//!
//! Read-only Rust client for the Canvas LMS REST API.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use canvas_sdk::{CanvasClient, CanvasResult, StatusFilter};
//!
//! #[tokio::main]
//! async fn main() -> CanvasResult<()> {
//!     let client = CanvasClient::builder()
//!         .base_url("https://school.instructure.com")
//!         .api_token("your-access-token")
//!         .timeout_ms(15_000)
//!         .build()?;
//!
//!     for course in client.courses().list().await? {
//!         let missing = client
//!             .assignments()
//!             .list(course.id, true, StatusFilter::Missing)
//!             .await?;
//!         println!("{}: {} missing", course.name, missing.len());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! List endpoints follow `Link: <...>; rel="next"` headers until the last
//! page. Every request is bounded by the configured timeout.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;

// Re-export main client
pub use client::{CanvasClient, CanvasClientBuilder};
pub use config::{ClientConfig, DEFAULT_TIMEOUT_MS};
pub use error::{CanvasError, CanvasResult};

// Re-export domain types for convenience
pub use canvas_core::{
    filter::StatusFilter,
    grades::{EnrollmentMetadata, GradeSummary, UnavailableReason},
    types::{Assignment, Course, SubmissionDetail, SubmissionStatus},
    upcoming::{UpcomingItem, UpcomingStatus, DEFAULT_UPCOMING_DAYS},
};
