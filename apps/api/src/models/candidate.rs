use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An accepted, persisted candidate tied to a job. Rejected profiles never become rows.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Candidate {
    pub id: Uuid,
    pub job_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub headline: Option<String>,
    pub location: Option<String>,
    pub profile_url: String,
    pub match_score: i16, // 0 – 100
    pub match_reasoning: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCandidate {
    pub job_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub headline: Option<String>,
    pub location: Option<String>,
    pub profile_url: String,
    pub match_score: u8,
    pub match_reasoning: String,
}
