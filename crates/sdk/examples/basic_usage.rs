//! Basic SDK usage example.
//!
//! Lists active courses, the assignments still missing in each, and the
//! deadlines of the coming week.
//!
//! Run with:
//! CANVAS_BASE_URL=https://school.instructure.com CANVAS_API_TOKEN=... \
//!     cargo run --example basic_usage

use canvas_sdk::{CanvasClient, CanvasError, CanvasResult, StatusFilter};

#[tokio::main]
async fn main() -> CanvasResult<()> {
    tracing_subscriber::fmt::init();

    let base_url = std::env::var("CANVAS_BASE_URL")
        .map_err(|_| CanvasError::Config("CANVAS_BASE_URL is not set".to_string()))?;
    let api_token = std::env::var("CANVAS_API_TOKEN")
        .map_err(|_| CanvasError::Config("CANVAS_API_TOKEN is not set".to_string()))?;

    let client = CanvasClient::builder()
        .base_url(base_url)
        .api_token(api_token)
        .timeout_ms(15_000)
        .build()?;

    let courses = client.courses().list().await?;
    println!("Found {} active courses", courses.len());

    for course in &courses {
        let missing = client
            .assignments()
            .list(course.id, true, StatusFilter::Missing)
            .await?;
        println!("  {} ({}): {} missing", course.name, course.course_code, missing.len());

        for assignment in missing.iter().take(3) {
            println!("    - {} (due {:?})", assignment.name, assignment.due_at);
        }
    }

    println!("\nDue in the next 7 days:");
    for item in client.upcoming().list(7, false, None).await? {
        println!(
            "  {} | {} | {} [{:?}]",
            item.due_at, item.course_name, item.name, item.status
        );
    }

    Ok(())
}
