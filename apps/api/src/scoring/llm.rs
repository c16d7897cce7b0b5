use async_trait::async_trait;
use serde_json::Value;

use super::prompts::{MATCH_SCORE_PROMPT_TEMPLATE, MATCH_SCORE_SYSTEM};
use super::{MatchScore, MatchScorer, ScoreError};
use crate::llm_client::LlmClient;
use crate::models::job::JobRequirements;
use crate::scraper::NormalizedCandidate;

/// Semantic scorer via Claude.
pub struct LlmMatchScorer(pub LlmClient);

#[async_trait]
impl MatchScorer for LlmMatchScorer {
    async fn score(
        &self,
        job: &JobRequirements,
        candidate: &NormalizedCandidate,
    ) -> Result<MatchScore, ScoreError> {
        let prompt = build_prompt(job, candidate);
        let reply: Value = self.0.call_json(&prompt, MATCH_SCORE_SYSTEM).await?;
        parse_reply(&reply)
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}

fn build_prompt(job: &JobRequirements, candidate: &NormalizedCandidate) -> String {
    let job_json = serde_json::to_string_pretty(job).unwrap_or_default();
    let candidate_json = serde_json::to_string_pretty(candidate).unwrap_or_default();
    MATCH_SCORE_PROMPT_TEMPLATE
        .replace("{job_json}", &job_json)
        .replace("{candidate_json}", &candidate_json)
}

/// Checks field presence explicitly. Numeric scores are rounded and clamped;
/// numeric strings ("72") are tolerated.
fn parse_reply(reply: &Value) -> Result<MatchScore, ScoreError> {
    let raw = reply
        .get("score")
        .and_then(|v| v.as_f64().or_else(|| v.as_str()?.trim().parse().ok()))
        .ok_or_else(|| ScoreError::Malformed("score".to_string()))?;

    if !raw.is_finite() {
        return Err(ScoreError::Malformed("score".to_string()));
    }

    let reasoning = reply
        .get("reasoning")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("No reasoning provided.")
        .to_string();

    Ok(MatchScore {
        score: raw.round().clamp(0.0, 100.0) as u8,
        reasoning,
    })
}
