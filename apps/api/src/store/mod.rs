//! Persistence port. Handlers and services only ever see `Arc<dyn Store>`.
//!
//! Production uses `PgStore`; tests run against the in-memory store.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::candidate::{Candidate, NewCandidate};
use crate::models::job::{Job, JobStatus, NewJob};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt row: {0}")]
    Corrupt(String),
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_job(&self, job: &NewJob) -> Result<Job, StoreError>;

    async fn get_job(&self, id: Uuid) -> Result<Option<Job>, StoreError>;

    /// Newest first. `None` lists every status.
    async fn list_jobs(&self, status: Option<JobStatus>) -> Result<Vec<Job>, StoreError>;

    /// Atomic conditional update: moves the job from `from` to `to` only if it
    /// is still in `from` and either unowned or owned by `sourcer_id`.
    /// Returns whether the row changed.
    async fn transition_job(
        &self,
        id: Uuid,
        from: JobStatus,
        to: JobStatus,
        sourcer_id: Uuid,
    ) -> Result<bool, StoreError>;

    async fn insert_candidate(&self, candidate: &NewCandidate) -> Result<Candidate, StoreError>;

    /// Live count of persisted candidates. Never cached.
    async fn count_candidates_for_job(&self, job_id: Uuid) -> Result<i64, StoreError>;

    /// Highest score first.
    async fn list_candidates_for_job(&self, job_id: Uuid) -> Result<Vec<Candidate>, StoreError>;
}
