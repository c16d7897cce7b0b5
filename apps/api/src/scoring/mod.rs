//! Match scoring — pluggable, trait-based scorer rating a scraped candidate
//! against a job's requirements on a 0 – 100 scale.
//!
//! Backends: `LlmMatchScorer` (Claude) and `KeywordMatchScorer` (pure Rust,
//! deterministic). `AppState` holds an `Arc<dyn MatchScorer>` picked at startup.
//!
//! Scorer failures never block intake: `score_or_fallback` substitutes a fixed
//! score instead.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::llm_client::LlmError;
use crate::models::job::JobRequirements;
use crate::scraper::NormalizedCandidate;

pub mod keyword;
pub mod llm;
mod prompts;

pub use keyword::KeywordMatchScorer;
pub use llm::LlmMatchScorer;

/// Candidates scoring at or above this are accepted.
pub const DEFAULT_ACCEPT_THRESHOLD: u8 = 60;
/// Score used when the scorer errors or times out.
pub const DEFAULT_FALLBACK_SCORE: u8 = 60;
pub const FALLBACK_REASONING: &str =
    "Automatic scoring was unavailable; a default match score was applied.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    pub score: u8, // 0 – 100
    pub reasoning: String,
}

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("scorer reply missing or invalid field: {0}")]
    Malformed(String),

    #[error("scoring timed out after {0}s")]
    Timeout(u64),
}

#[async_trait]
pub trait MatchScorer: Send + Sync {
    async fn score(
        &self,
        job: &JobRequirements,
        candidate: &NormalizedCandidate,
    ) -> Result<MatchScore, ScoreError>;

    /// "llm" | "keyword", for logs.
    fn backend(&self) -> &'static str;
}

/// Outcome of scoring with the fallback policy applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMatch {
    pub score: MatchScore,
    pub fell_back: bool,
}

/// Runs `scorer` under `timeout`; any error or timeout yields `fallback_score`.
pub async fn score_or_fallback(
    scorer: &dyn MatchScorer,
    job: &JobRequirements,
    candidate: &NormalizedCandidate,
    timeout: Duration,
    fallback_score: u8,
) -> ScoredMatch {
    let result = match tokio::time::timeout(timeout, scorer.score(job, candidate)).await {
        Ok(result) => result,
        Err(_) => Err(ScoreError::Timeout(timeout.as_secs())),
    };

    match result {
        Ok(score) => ScoredMatch {
            score: MatchScore {
                score: score.score.min(100),
                reasoning: score.reasoning,
            },
            fell_back: false,
        },
        Err(e) => {
            warn!(
                "{} scorer failed for {} {}: {e}; using fallback score {fallback_score}",
                scorer.backend(),
                candidate.first_name,
                candidate.last_name
            );
            ScoredMatch {
                score: MatchScore {
                    score: fallback_score,
                    reasoning: FALLBACK_REASONING.to_string(),
                },
                fell_back: true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::SeniorityLevel;

    struct FailingScorer;

    #[async_trait]
    impl MatchScorer for FailingScorer {
        async fn score(
            &self,
            _job: &JobRequirements,
            _candidate: &NormalizedCandidate,
        ) -> Result<MatchScore, ScoreError> {
            Err(ScoreError::Malformed("score".to_string()))
        }

        fn backend(&self) -> &'static str {
            "failing"
        }
    }

    struct SlowScorer;

    #[async_trait]
    impl MatchScorer for SlowScorer {
        async fn score(
            &self,
            _job: &JobRequirements,
            _candidate: &NormalizedCandidate,
        ) -> Result<MatchScore, ScoreError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(MatchScore {
                score: 99,
                reasoning: "too late".to_string(),
            })
        }

        fn backend(&self) -> &'static str {
            "slow"
        }
    }

    fn job() -> JobRequirements {
        JobRequirements {
            title: "Backend Engineer".to_string(),
            description: String::new(),
            seniority: SeniorityLevel::Mid,
            key_skills: vec!["rust".to_string()],
        }
    }

    #[tokio::test]
    async fn test_error_falls_back_to_default() {
        let scored = score_or_fallback(
            &FailingScorer,
            &job(),
            &NormalizedCandidate::default(),
            Duration::from_secs(15),
            DEFAULT_FALLBACK_SCORE,
        )
        .await;
        assert!(scored.fell_back);
        assert_eq!(scored.score.score, 60);
        assert_eq!(scored.score.reasoning, FALLBACK_REASONING);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_falls_back() {
        let scored = score_or_fallback(
            &SlowScorer,
            &job(),
            &NormalizedCandidate::default(),
            Duration::from_secs(15),
            DEFAULT_FALLBACK_SCORE,
        )
        .await;
        assert!(scored.fell_back);
        assert_eq!(scored.score.score, DEFAULT_FALLBACK_SCORE);
    }

    #[test]
    fn test_default_fallback_meets_default_threshold() {
        assert!(DEFAULT_FALLBACK_SCORE >= DEFAULT_ACCEPT_THRESHOLD);
    }
}
