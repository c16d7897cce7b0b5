//! Axum route handlers for the Jobs API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::lifecycle::claim_job;
use crate::jobs::quota::{check_and_complete_job, quota_status, QuotaStatus};
use crate::jobs::{create_job, get_accepted_candidates, get_job, list_jobs};
use crate::models::candidate::Candidate;
use crate::models::job::{Job, JobStatus, NewJob};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListJobsQuery {
    pub status: Option<JobStatus>,
}

/// The acting sourcer, always passed explicitly by the caller.
#[derive(Debug, Deserialize)]
pub struct SourcerAction {
    pub sourcer_id: Uuid,
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(request): Json<NewJob>,
) -> Result<(StatusCode, Json<Job>), AppError> {
    let job = create_job(state.store.as_ref(), request).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/jobs?status=unclaimed
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<ListJobsQuery>,
) -> Result<Json<Vec<Job>>, AppError> {
    Ok(Json(list_jobs(state.store.as_ref(), params.status).await?))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Job>, AppError> {
    Ok(Json(get_job(state.store.as_ref(), job_id).await?))
}

/// POST /api/v1/jobs/:id/claim
pub async fn handle_claim_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(action): Json<SourcerAction>,
) -> Result<Json<Job>, AppError> {
    Ok(Json(
        claim_job(state.store.as_ref(), job_id, action.sourcer_id).await?,
    ))
}

/// POST /api/v1/jobs/:id/complete
///
/// Re-counts accepted candidates server-side; never trusts a client-side count.
pub async fn handle_complete_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(action): Json<SourcerAction>,
) -> Result<Json<Job>, AppError> {
    let job = check_and_complete_job(
        state.store.as_ref(),
        state.notifier.clone(),
        job_id,
        action.sourcer_id,
    )
    .await?;
    Ok(Json(job))
}

/// GET /api/v1/jobs/:id/quota
pub async fn handle_quota(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<QuotaStatus>, AppError> {
    Ok(Json(quota_status(state.store.as_ref(), job_id).await?))
}

/// GET /api/v1/jobs/:id/candidates
pub async fn handle_list_candidates(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<Candidate>>, AppError> {
    Ok(Json(
        get_accepted_candidates(state.store.as_ref(), job_id).await?,
    ))
}
