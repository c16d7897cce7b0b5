//! Jobs — creation, lookup, the claim/complete lifecycle and quota tracking.

use thiserror::Error;
use uuid::Uuid;

use crate::models::candidate::Candidate;
use crate::models::job::{Job, JobStatus, NewJob};
use crate::store::{Store, StoreError};

pub mod handlers;
pub mod lifecycle;
pub mod quota;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("job {0} not found")]
    NotFound(Uuid),

    #[error("job has already been claimed")]
    AlreadyClaimed,

    #[error("only the claiming sourcer may act on this job")]
    NotJobOwner,

    #[error("job is {current}, which does not allow this action")]
    InvalidState { current: JobStatus },

    #[error("quota not met: {current} of {required} candidates accepted")]
    QuotaNotMet { current: i64, required: i32 },

    #[error("invalid job: {0}")]
    InvalidJob(String),

    #[error("persistence error: {0}")]
    Persistence(#[from] StoreError),
}

/// Validates and stores a client's job. Skills are trimmed and deduplicated
/// case-insensitively, keeping first spelling.
pub async fn create_job(store: &dyn Store, mut job: NewJob) -> Result<Job, JobError> {
    job.title = job.title.trim().to_string();
    job.description = job.description.trim().to_string();

    if job.title.is_empty() {
        return Err(JobError::InvalidJob("title cannot be empty".to_string()));
    }
    if job.candidates_requested <= 0 {
        return Err(JobError::InvalidJob(
            "candidates_requested must be greater than zero".to_string(),
        ));
    }

    let mut seen = std::collections::HashSet::new();
    job.key_skills = job
        .key_skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
        .map(String::from)
        .collect();

    let created = store.insert_job(&job).await?;
    tracing::info!(
        "Created job {} ({}) requesting {} candidates",
        created.id,
        created.title,
        created.candidates_requested
    );
    Ok(created)
}

pub async fn get_job(store: &dyn Store, id: Uuid) -> Result<Job, JobError> {
    store.get_job(id).await?.ok_or(JobError::NotFound(id))
}

pub async fn list_jobs(store: &dyn Store, status: Option<JobStatus>) -> Result<Vec<Job>, JobError> {
    Ok(store.list_jobs(status).await?)
}

/// Accepted candidates for an existing job, highest score first.
pub async fn get_accepted_candidates(
    store: &dyn Store,
    job_id: Uuid,
) -> Result<Vec<Candidate>, JobError> {
    get_job(store, job_id).await?;
    Ok(store.list_candidates_for_job(job_id).await?)
}

/// Fetches a job and checks it is Claimed by `sourcer_id`.
pub async fn require_claimed_by(
    store: &dyn Store,
    job_id: Uuid,
    sourcer_id: Uuid,
) -> Result<Job, JobError> {
    let job = get_job(store, job_id).await?;
    if job.status == JobStatus::Unclaimed {
        return Err(JobError::InvalidState {
            current: job.status,
        });
    }
    if job.sourcer_id != Some(sourcer_id) {
        return Err(JobError::NotJobOwner);
    }
    if job.status != JobStatus::Claimed {
        return Err(JobError::InvalidState {
            current: job.status,
        });
    }
    Ok(job)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::SeniorityLevel;
    use crate::store::memory::MemoryStore;

    fn new_job(title: &str, requested: i32) -> NewJob {
        NewJob {
            client_id: Uuid::new_v4(),
            title: title.to_string(),
            description: "  Build the ingest tier. ".to_string(),
            seniority: SeniorityLevel::Senior,
            key_skills: vec![
                " Rust ".to_string(),
                "rust".to_string(),
                "".to_string(),
                "Postgres".to_string(),
            ],
            candidates_requested: requested,
        }
    }

    #[tokio::test]
    async fn test_create_job_starts_unclaimed_with_clean_skills() {
        let store = MemoryStore::new();
        let job = create_job(&store, new_job(" Senior Rust Engineer ", 5))
            .await
            .unwrap();
        assert_eq!(job.status, JobStatus::Unclaimed);
        assert_eq!(job.sourcer_id, None);
        assert_eq!(job.title, "Senior Rust Engineer");
        assert_eq!(job.description, "Build the ingest tier.");
        assert_eq!(job.key_skills, vec!["Rust", "Postgres"]);
    }

    #[tokio::test]
    async fn test_create_job_rejects_non_positive_quota() {
        let store = MemoryStore::new();
        assert!(matches!(
            create_job(&store, new_job("Analyst", 0)).await,
            Err(JobError::InvalidJob(_))
        ));
        assert!(matches!(
            create_job(&store, new_job("   ", 3)).await,
            Err(JobError::InvalidJob(_))
        ));
    }

    #[tokio::test]
    async fn test_get_missing_job() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        assert!(matches!(get_job(&store, id).await, Err(JobError::NotFound(x)) if x == id));
    }

    #[tokio::test]
    async fn test_list_jobs_filters_by_status() {
        let store = MemoryStore::new();
        let a = create_job(&store, new_job("A", 1)).await.unwrap();
        create_job(&store, new_job("B", 1)).await.unwrap();
        lifecycle::claim_job(&store, a.id, Uuid::new_v4()).await.unwrap();

        assert_eq!(list_jobs(&store, None).await.unwrap().len(), 2);
        let unclaimed = list_jobs(&store, Some(JobStatus::Unclaimed)).await.unwrap();
        assert_eq!(unclaimed.len(), 1);
        assert_eq!(unclaimed[0].title, "B");
    }

    #[tokio::test]
    async fn test_accepted_candidates_for_missing_job() {
        let store = MemoryStore::new();
        assert!(matches!(
            get_accepted_candidates(&store, Uuid::new_v4()).await,
            Err(JobError::NotFound(_))
        ));
    }
}
