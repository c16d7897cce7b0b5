//! The intake pipeline: validate, then scrape → score → accept/reject → persist
//! for each identifier, with bounded concurrency.
//!
//! Per-identifier failures (scrape errors, timeouts) are recorded and skipped;
//! scorer failures fall back to a default score. Only validation, job state and
//! persistence errors fail the whole call.

use std::sync::Arc;

use bytes::Bytes;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::batch::{SubmissionBatch, SubmissionMethod};
use super::IntakeError;
use crate::config::IntakeSettings;
use crate::jobs::quota::is_quota_met;
use crate::jobs::require_claimed_by;
use crate::models::candidate::{Candidate, NewCandidate};
use crate::models::job::JobRequirements;
use crate::scoring::{score_or_fallback, MatchScorer};
use crate::scraper::{ProfileScraper, ScrapeError};
use crate::store::{Store, StoreError};

/// Raw submission as received from a caller, before validation.
#[derive(Debug, Clone)]
pub enum BatchInput {
    Manual(Vec<String>),
    File(Bytes),
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemError {
    pub identifier: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Rejection {
    pub identifier: String,
    pub score: u8,
    pub reasoning: String,
}

/// Aggregate outcome of one batch. `accepted + rejected + errors.len()`
/// always equals `submitted`.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub success: bool,
    pub job_id: Uuid,
    pub method: SubmissionMethod,
    pub submitted: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub errors: Vec<ItemError>,
    pub accepted_candidates: Vec<Candidate>,
    pub rejections: Vec<Rejection>,
    /// Candidates whose score came from the fallback rather than the scorer.
    pub fallback_scores: usize,
    pub skipped_rows: usize,
    /// Quota re-read from the store after the batch was written; `None` when
    /// that read failed. The batch itself is already committed either way.
    pub quota_met: Option<bool>,
}

enum ItemOutcome {
    Accepted { candidate: Candidate, fell_back: bool },
    Rejected { rejection: Rejection, fell_back: bool },
    Failed(ItemError),
}

#[derive(Clone)]
pub struct IntakePipeline {
    store: Arc<dyn Store>,
    scraper: Arc<dyn ProfileScraper>,
    scorer: Arc<dyn MatchScorer>,
    settings: IntakeSettings,
}

impl IntakePipeline {
    pub fn new(
        store: Arc<dyn Store>,
        scraper: Arc<dyn ProfileScraper>,
        scorer: Arc<dyn MatchScorer>,
        settings: IntakeSettings,
    ) -> Self {
        Self {
            store,
            scraper,
            scorer,
            settings,
        }
    }

    /// Validates `input` fully before any scrape, checks that `sourcer_id`
    /// holds the claim on `job_id`, then processes every identifier.
    #[instrument(skip(self, input), fields(scorer = self.scorer.backend()))]
    pub async fn submit_candidate_batch(
        &self,
        job_id: Uuid,
        sourcer_id: Uuid,
        input: BatchInput,
    ) -> Result<BatchResult, IntakeError> {
        let batch = match input {
            BatchInput::Manual(entries) => SubmissionBatch::manual(entries)?,
            BatchInput::File(data) => SubmissionBatch::from_file(&data)?,
        };

        let job = require_claimed_by(self.store.as_ref(), job_id, sourcer_id).await?;
        let requirements = job.requirements();

        info!(
            "Processing {} identifiers for job {job_id} ({:?})",
            batch.len(),
            batch.method
        );

        let outcomes: Vec<ItemOutcome> = stream::iter(batch.identifiers.iter().cloned())
            .map(|identifier| self.process_identifier(job_id, &requirements, identifier))
            .buffered(self.settings.concurrency.max(1))
            .try_collect()
            .await?;

        let mut result = aggregate(job_id, &batch, outcomes);
        result.quota_met = match is_quota_met(self.store.as_ref(), job_id).await {
            Ok(met) => Some(met),
            Err(e) => {
                warn!("Quota re-read failed for job {job_id} after batch commit: {e}");
                None
            }
        };
        info!(
            "Batch for job {job_id} done: {} accepted, {} rejected, {} errors (quota met: {:?})",
            result.accepted,
            result.rejected,
            result.errors.len(),
            result.quota_met
        );
        Ok(result)
    }

    async fn process_identifier(
        &self,
        job_id: Uuid,
        requirements: &JobRequirements,
        identifier: String,
    ) -> Result<ItemOutcome, StoreError> {
        let timeout = self.settings.scrape_timeout;
        let scraped = match tokio::time::timeout(timeout, self.scraper.scrape(&identifier)).await {
            Ok(result) => result,
            Err(_) => Err(ScrapeError::Timeout(timeout.as_secs())),
        };

        let profile = match scraped {
            Ok(profile) => profile,
            Err(e) => {
                warn!("Scrape failed for {identifier}: {e}");
                return Ok(ItemOutcome::Failed(ItemError {
                    identifier,
                    reason: e.to_string(),
                }));
            }
        };

        let scored = score_or_fallback(
            self.scorer.as_ref(),
            requirements,
            &profile,
            self.settings.score_timeout,
            self.settings.fallback_score,
        )
        .await;
        let score = scored.score.score;

        if score < self.settings.accept_threshold {
            debug!("Rejected {identifier} with score {score}");
            return Ok(ItemOutcome::Rejected {
                rejection: Rejection {
                    identifier,
                    score,
                    reasoning: scored.score.reasoning,
                },
                fell_back: scored.fell_back,
            });
        }

        let candidate = self
            .store
            .insert_candidate(&NewCandidate {
                job_id,
                first_name: profile.first_name,
                last_name: profile.last_name,
                headline: profile.headline,
                location: profile.location,
                profile_url: identifier,
                match_score: score,
                match_reasoning: scored.score.reasoning,
            })
            .await?;

        debug!("Accepted {} with score {score}", candidate.profile_url);
        Ok(ItemOutcome::Accepted {
            candidate,
            fell_back: scored.fell_back,
        })
    }
}

fn aggregate(job_id: Uuid, batch: &SubmissionBatch, outcomes: Vec<ItemOutcome>) -> BatchResult {
    let mut result = BatchResult {
        success: true,
        job_id,
        method: batch.method,
        submitted: batch.len(),
        accepted: 0,
        rejected: 0,
        errors: Vec::new(),
        accepted_candidates: Vec::new(),
        rejections: Vec::new(),
        fallback_scores: 0,
        skipped_rows: batch.skipped_rows,
        quota_met: None,
    };

    for outcome in outcomes {
        match outcome {
            ItemOutcome::Accepted {
                candidate,
                fell_back,
            } => {
                result.accepted += 1;
                result.fallback_scores += usize::from(fell_back);
                result.accepted_candidates.push(candidate);
            }
            ItemOutcome::Rejected {
                rejection,
                fell_back,
            } => {
                result.rejected += 1;
                result.fallback_scores += usize::from(fell_back);
                result.rejections.push(rejection);
            }
            ItemOutcome::Failed(error) => result.errors.push(error),
        }
    }

    result
}
