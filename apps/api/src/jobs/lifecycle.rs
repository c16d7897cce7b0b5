//! Job lifecycle: `Unclaimed → Claimed → Completed`, never backwards.
//!
//! Every transition is a single conditional update in the store, so racing
//! callers are decided by the store rather than by a read-then-write here.

use tracing::{info, instrument};
use uuid::Uuid;

use super::{get_job, JobError};
use crate::models::job::{Job, JobStatus};
use crate::store::Store;

/// First claim wins. Losers get `AlreadyClaimed`.
#[instrument(skip(store))]
pub async fn claim_job(store: &dyn Store, job_id: Uuid, sourcer_id: Uuid) -> Result<Job, JobError> {
    transition(store, job_id, JobStatus::Unclaimed, JobStatus::Claimed, sourcer_id).await?;
    info!("Job {job_id} claimed by sourcer {sourcer_id}");
    get_job(store, job_id).await
}

/// Applies `from → to` atomically. On a lost race, re-reads the job to report why.
pub(crate) async fn transition(
    store: &dyn Store,
    job_id: Uuid,
    from: JobStatus,
    to: JobStatus,
    sourcer_id: Uuid,
) -> Result<(), JobError> {
    debug_assert!(from.can_transition_to(to));

    if store.transition_job(job_id, from, to, sourcer_id).await? {
        return Ok(());
    }

    let current = get_job(store, job_id).await?;
    Err(match (from, current.status) {
        (JobStatus::Unclaimed, JobStatus::Claimed | JobStatus::Completed) => JobError::AlreadyClaimed,
        (_, status) if status == from && current.sourcer_id != Some(sourcer_id) => {
            JobError::NotJobOwner
        }
        (_, status) => JobError::InvalidState { current: status },
    })
}
