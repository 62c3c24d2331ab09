pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::delivery::handlers as delivery;
use crate::generation::handlers as generation;
use crate::state::AppState;

/// Upload cap for resume PDFs on the multipart routes.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Draft API
        .route("/api/v1/jobs/extract", post(generation::handle_extract_jobs))
        .route("/api/v1/emails/draft", post(generation::handle_draft_email))
        // Upload API
        .route(
            "/api/v1/resume/extract",
            post(generation::handle_extract_resume),
        )
        .route("/api/v1/emails/send", post(delivery::handle_send_email))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
