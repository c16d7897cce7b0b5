use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Where a job sits in its lifecycle. Transitions only move forward:
/// `Unclaimed → Claimed → Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Unclaimed,
    Claimed,
    Completed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Unclaimed => "unclaimed",
            JobStatus::Claimed => "claimed",
            JobStatus::Completed => "completed",
        }
    }

    /// Whether `self → next` is a legal lifecycle step.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Unclaimed, JobStatus::Claimed) | (JobStatus::Claimed, JobStatus::Completed)
        )
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unclaimed" => Ok(JobStatus::Unclaimed),
            "claimed" => Ok(JobStatus::Claimed),
            "completed" => Ok(JobStatus::Completed),
            _ => Err(format!("Invalid job status: {s}")),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeniorityLevel {
    Junior,
    Mid,
    Senior,
    Executive,
}

impl SeniorityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeniorityLevel::Junior => "junior",
            SeniorityLevel::Mid => "mid",
            SeniorityLevel::Senior => "senior",
            SeniorityLevel::Executive => "executive",
        }
    }
}

impl FromStr for SeniorityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "junior" => Ok(SeniorityLevel::Junior),
            "mid" => Ok(SeniorityLevel::Mid),
            "senior" => Ok(SeniorityLevel::Senior),
            "executive" => Ok(SeniorityLevel::Executive),
            _ => Err(format!("Invalid seniority level: {s}")),
        }
    }
}

impl fmt::Display for SeniorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A client's request for a target number of sourced candidates.
///
/// `sourcer_id` is `Some` exactly when `status` is `Claimed` or `Completed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub client_id: Uuid,
    pub title: String,
    pub description: String,
    pub seniority: SeniorityLevel,
    pub key_skills: Vec<String>,
    pub candidates_requested: i32,
    pub status: JobStatus,
    pub sourcer_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub claimed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    /// The subset of a job the match scorer sees.
    pub fn requirements(&self) -> JobRequirements {
        JobRequirements {
            title: self.title.clone(),
            description: self.description.clone(),
            seniority: self.seniority,
            key_skills: self.key_skills.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRequirements {
    pub title: String,
    pub description: String,
    pub seniority: SeniorityLevel,
    pub key_skills: Vec<String>,
}

/// Fields supplied when a client submits a job. Validated by `jobs::create_job`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewJob {
    pub client_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub seniority: SeniorityLevel,
    #[serde(default)]
    pub key_skills: Vec<String>,
    pub candidates_requested: i32,
}

/// Raw `jobs` row. Enum columns are TEXT and parsed in `TryFrom`.
#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub client_id: Uuid,
    pub title: String,
    pub description: String,
    pub seniority: String,
    pub key_skills: Vec<String>,
    pub candidates_requested: i32,
    pub status: String,
    pub sourcer_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub claimed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<JobRow> for Job {
    type Error = String;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        Ok(Job {
            id: row.id,
            client_id: row.client_id,
            title: row.title,
            description: row.description,
            seniority: row.seniority.parse()?,
            key_skills: row.key_skills,
            candidates_requested: row.candidates_requested,
            status: row.status.parse()?,
            sourcer_id: row.sourcer_id,
            created_at: row.created_at,
            claimed_at: row.claimed_at,
            completed_at: row.completed_at,
        })
    }
}
