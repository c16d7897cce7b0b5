use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::models::candidate::{Candidate, NewCandidate};
use crate::models::job::{Job, JobStatus, NewJob};

/// In-process `Store` for tests. One mutex guards everything, which makes
/// `transition_job` linearizable just like the conditional UPDATE in Postgres.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    jobs: HashMap<Uuid, Job>,
    candidates: Vec<Candidate>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_job(&self, job: &NewJob) -> Result<Job, StoreError> {
        let job = Job {
            id: Uuid::new_v4(),
            client_id: job.client_id,
            title: job.title.clone(),
            description: job.description.clone(),
            seniority: job.seniority,
            key_skills: job.key_skills.clone(),
            candidates_requested: job.candidates_requested,
            status: JobStatus::Unclaimed,
            sourcer_id: None,
            created_at: Utc::now(),
            claimed_at: None,
            completed_at: None,
        };
        self.inner.lock().await.jobs.insert(job.id, job.clone());
        Ok(job)
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<Job>, StoreError> {
        Ok(self.inner.lock().await.jobs.get(&id).cloned())
    }

    async fn list_jobs(&self, status: Option<JobStatus>) -> Result<Vec<Job>, StoreError> {
        let inner = self.inner.lock().await;
        let mut jobs: Vec<Job> = inner
            .jobs
            .values()
            .filter(|j| status.map_or(true, |s| j.status == s))
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }

    async fn transition_job(
        &self,
        id: Uuid,
        from: JobStatus,
        to: JobStatus,
        sourcer_id: Uuid,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().await;
        let Some(job) = inner.jobs.get_mut(&id) else {
            return Ok(false);
        };
        if job.status != from || job.sourcer_id.is_some_and(|s| s != sourcer_id) {
            return Ok(false);
        }
        job.status = to;
        job.sourcer_id = Some(sourcer_id);
        match to {
            JobStatus::Claimed => job.claimed_at = Some(Utc::now()),
            JobStatus::Completed => job.completed_at = Some(Utc::now()),
            JobStatus::Unclaimed => {}
        }
        Ok(true)
    }

    async fn insert_candidate(&self, candidate: &NewCandidate) -> Result<Candidate, StoreError> {
        let row = Candidate {
            id: Uuid::new_v4(),
            job_id: candidate.job_id,
            first_name: candidate.first_name.clone(),
            last_name: candidate.last_name.clone(),
            headline: candidate.headline.clone(),
            location: candidate.location.clone(),
            profile_url: candidate.profile_url.clone(),
            match_score: i16::from(candidate.match_score),
            match_reasoning: candidate.match_reasoning.clone(),
            created_at: Utc::now(),
        };
        self.inner.lock().await.candidates.push(row.clone());
        Ok(row)
    }

    async fn count_candidates_for_job(&self, job_id: Uuid) -> Result<i64, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.candidates.iter().filter(|c| c.job_id == job_id).count() as i64)
    }

    async fn list_candidates_for_job(&self, job_id: Uuid) -> Result<Vec<Candidate>, StoreError> {
        let inner = self.inner.lock().await;
        let mut rows: Vec<Candidate> = inner
            .candidates
            .iter()
            .filter(|c| c.job_id == job_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.match_score
                .cmp(&a.match_score)
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(rows)
    }
}
