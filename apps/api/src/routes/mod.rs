pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::intake::handlers as intake;
use crate::intake::MAX_FILE_BYTES;
use crate::jobs::handlers as jobs;
use crate::state::AppState;

/// Multipart framing headroom on top of the file cap, so oversized files reach
/// the intake check and get a structured error.
const UPLOAD_BODY_LIMIT: usize = MAX_FILE_BYTES * 2;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs
        .route(
            "/api/v1/jobs",
            post(jobs::handle_create_job).get(jobs::handle_list_jobs),
        )
        .route("/api/v1/jobs/:id", get(jobs::handle_get_job))
        .route("/api/v1/jobs/:id/claim", post(jobs::handle_claim_job))
        .route("/api/v1/jobs/:id/complete", post(jobs::handle_complete_job))
        .route("/api/v1/jobs/:id/quota", get(jobs::handle_quota))
        // Candidates
        .route(
            "/api/v1/jobs/:id/candidates",
            get(jobs::handle_list_candidates).post(intake::handle_submit_candidates),
        )
        .route(
            "/api/v1/jobs/:id/candidates/upload",
            post(intake::handle_upload_candidates).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .with_state(state)
}
