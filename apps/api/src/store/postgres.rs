use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::models::candidate::{Candidate, NewCandidate};
use crate::models::job::{Job, JobRow, JobStatus, NewJob};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_job(row: JobRow) -> Result<Job, StoreError> {
    Job::try_from(row).map_err(StoreError::Corrupt)
}

#[async_trait]
impl Store for PgStore {
    async fn insert_job(&self, job: &NewJob) -> Result<Job, StoreError> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs
                (id, client_id, title, description, seniority, key_skills,
                 candidates_requested, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'unclaimed')
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(job.client_id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(job.seniority.as_str())
        .bind(&job.key_skills)
        .bind(job.candidates_requested)
        .fetch_one(&self.pool)
        .await?;

        into_job(row)
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<Job>, StoreError> {
        sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(into_job)
            .transpose()
    }

    async fn list_jobs(&self, status: Option<JobStatus>) -> Result<Vec<Job>, StoreError> {
        let rows = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT * FROM jobs
            WHERE $1::TEXT IS NULL OR status = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(into_job).collect()
    }

    async fn transition_job(
        &self,
        id: Uuid,
        from: JobStatus,
        to: JobStatus,
        sourcer_id: Uuid,
    ) -> Result<bool, StoreError> {
        // Single statement so concurrent claimers race inside Postgres, not here.
        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET status       = $3,
                sourcer_id   = $4,
                claimed_at   = CASE WHEN $3 = 'claimed'   THEN now() ELSE claimed_at END,
                completed_at = CASE WHEN $3 = 'completed' THEN now() ELSE completed_at END
            WHERE id = $1
              AND status = $2
              AND (sourcer_id IS NULL OR sourcer_id = $4)
            "#,
        )
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .bind(sourcer_id)
        .execute(&self.pool)
        .await?;

        let changed = result.rows_affected() == 1;
        debug!("Transition {id} {from} -> {to} by {sourcer_id}: changed={changed}");
        Ok(changed)
    }

    async fn insert_candidate(&self, candidate: &NewCandidate) -> Result<Candidate, StoreError> {
        Ok(sqlx::query_as::<_, Candidate>(
            r#"
            INSERT INTO candidates
                (id, job_id, first_name, last_name, headline, location,
                 profile_url, match_score, match_reasoning)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(candidate.job_id)
        .bind(&candidate.first_name)
        .bind(&candidate.last_name)
        .bind(&candidate.headline)
        .bind(&candidate.location)
        .bind(&candidate.profile_url)
        .bind(i16::from(candidate.match_score))
        .bind(&candidate.match_reasoning)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn count_candidates_for_job(&self, job_id: Uuid) -> Result<i64, StoreError> {
        Ok(
            sqlx::query_scalar("SELECT COUNT(*) FROM candidates WHERE job_id = $1")
                .bind(job_id)
                .fetch_one(&self.pool)
                .await?,
        )
    }

    async fn list_candidates_for_job(&self, job_id: Uuid) -> Result<Vec<Candidate>, StoreError> {
        Ok(sqlx::query_as::<_, Candidate>(
            "SELECT * FROM candidates WHERE job_id = $1 ORDER BY match_score DESC, created_at ASC",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?)
    }
}
