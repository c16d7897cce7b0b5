//! Quota tracking: accepted candidates vs. the job's requested count.
//!
//! Counts are always read live from the store right before they gate anything.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use super::lifecycle::transition;
use super::{get_job, require_claimed_by, JobError};
use crate::models::job::{Job, JobStatus};
use crate::notify::{dispatch, CompletionNotifier, JobCompletedEvent};
use crate::store::Store;

#[derive(Debug, Clone, Serialize)]
pub struct QuotaStatus {
    pub job_id: Uuid,
    pub accepted: i64,
    pub required: i32,
    pub remaining: i64,
    pub met: bool,
}

impl QuotaStatus {
    fn new(job: &Job, accepted: i64) -> Self {
        let required = i64::from(job.candidates_requested);
        Self {
            job_id: job.id,
            accepted,
            required: job.candidates_requested,
            remaining: (required - accepted).max(0),
            met: accepted >= required,
        }
    }
}

pub async fn quota_status(store: &dyn Store, job_id: Uuid) -> Result<QuotaStatus, JobError> {
    let job = get_job(store, job_id).await?;
    let accepted = store.count_candidates_for_job(job_id).await?;
    Ok(QuotaStatus::new(&job, accepted))
}

pub async fn is_quota_met(store: &dyn Store, job_id: Uuid) -> Result<bool, JobError> {
    Ok(quota_status(store, job_id).await?.met)
}

/// Completes a job once its quota is met. The count is re-read here, never
/// taken from the caller. Notifies the completion observer after commit.
#[instrument(skip(store, notifier))]
pub async fn check_and_complete_job(
    store: &dyn Store,
    notifier: Arc<dyn CompletionNotifier>,
    job_id: Uuid,
    sourcer_id: Uuid,
) -> Result<Job, JobError> {
    let job = require_claimed_by(store, job_id, sourcer_id).await?;

    let status = QuotaStatus::new(&job, store.count_candidates_for_job(job_id).await?);
    if !status.met {
        return Err(JobError::QuotaNotMet {
            current: status.accepted,
            required: status.required,
        });
    }

    transition(store, job_id, JobStatus::Claimed, JobStatus::Completed, sourcer_id).await?;
    info!(
        "Job {job_id} completed by sourcer {sourcer_id} with {}/{} candidates",
        status.accepted, status.required
    );

    let completed = get_job(store, job_id).await?;
    dispatch(notifier, JobCompletedEvent::new(&completed, status.accepted));
    Ok(completed)
}
