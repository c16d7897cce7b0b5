use std::collections::HashSet;

use async_trait::async_trait;

use super::{MatchScore, MatchScorer, ScoreError};
use crate::models::job::JobRequirements;
use crate::scraper::NormalizedCandidate;

/// Score given when the job lists no key skills to measure against.
const NEUTRAL_SCORE: u32 = 60;
/// Added when the candidate's headline or a past title shares a word with the job title.
const TITLE_BONUS: u32 = 15;

/// Pure-Rust scorer. Fast, deterministic, no LLM call.
///
/// Algorithm:
/// 1. coverage = key skills found in the profile / key skills listed
/// 2. base = round(coverage × 100), or 60 when the job lists no skills
/// 3. +15 when a job-title word (4+ chars) appears in the headline or an experience title
/// 4. capped at 100
pub struct KeywordMatchScorer;

#[async_trait]
impl MatchScorer for KeywordMatchScorer {
    async fn score(
        &self,
        job: &JobRequirements,
        candidate: &NormalizedCandidate,
    ) -> Result<MatchScore, ScoreError> {
        Ok(compute_keyword_match(job, candidate))
    }

    fn backend(&self) -> &'static str {
        "keyword"
    }
}

fn compute_keyword_match(job: &JobRequirements, candidate: &NormalizedCandidate) -> MatchScore {
    let haystack = profile_text(candidate);

    let skills: Vec<String> = job
        .key_skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    let candidate_skills: HashSet<String> =
        candidate.skills.iter().map(|s| s.to_lowercase()).collect();

    let matched: Vec<&String> = skills
        .iter()
        .filter(|s| candidate_skills.contains(*s) || contains_term(&haystack, s))
        .collect();

    let base = if skills.is_empty() {
        NEUTRAL_SCORE
    } else {
        ((matched.len() as f32 / skills.len() as f32) * 100.0).round() as u32
    };

    let title_hit = title_overlap(&job.title, candidate);
    let score = (base + if title_hit { TITLE_BONUS } else { 0 }).min(100);

    let mut reasoning = if skills.is_empty() {
        "Job lists no key skills; neutral baseline applied.".to_string()
    } else {
        format!(
            "Matched {}/{} key skills{}.",
            matched.len(),
            skills.len(),
            if matched.is_empty() {
                String::new()
            } else {
                format!(
                    " ({})",
                    matched.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
                )
            }
        )
    };
    if title_hit {
        reasoning.push_str(" Prior titles align with the role.");
    }

    MatchScore {
        score: score as u8,
        reasoning,
    }
}

/// Lowercased headline, about and experience text in one string.
fn profile_text(candidate: &NormalizedCandidate) -> String {
    let mut parts: Vec<&str> = Vec::new();
    parts.extend(candidate.headline.as_deref());
    parts.extend(candidate.about.as_deref());
    for exp in &candidate.experience {
        parts.push(&exp.title);
        parts.push(&exp.company);
    }
    parts.join(" ").to_lowercase()
}

/// Whether `term` occurs in `text` as a whole word or phrase: the characters
/// on either side of the match must not be alphanumeric. Keeps "go" from
/// matching "google" while still finding "c++" or "node.js".
fn contains_term(text: &str, term: &str) -> bool {
    let is_word = |c: Option<char>| c.is_some_and(char::is_alphanumeric);
    text.match_indices(term).any(|(start, m)| {
        let before = text[..start].chars().next_back();
        let after = text[start + m.len()..].chars().next();
        !is_word(before) && !is_word(after)
    })
}

fn title_overlap(job_title: &str, candidate: &NormalizedCandidate) -> bool {
    let words: Vec<String> = job_title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() >= 4)
        .map(str::to_lowercase)
        .collect();
    if words.is_empty() {
        return false;
    }

    candidate
        .headline
        .iter()
        .chain(candidate.experience.iter().map(|e| &e.title))
        .map(|t| t.to_lowercase())
        .any(|t| words.iter().any(|w| t.contains(w.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::SeniorityLevel;
    use crate::scraper::ExperienceItem;

    fn job(title: &str, skills: &[&str]) -> JobRequirements {
        JobRequirements {
            title: title.to_string(),
            description: String::new(),
            seniority: SeniorityLevel::Senior,
            key_skills: skills.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn candidate(headline: &str, skills: &[&str]) -> NormalizedCandidate {
        NormalizedCandidate {
            first_name: "Sam".to_string(),
            last_name: "Rivera".to_string(),
            headline: Some(headline.to_string()),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_full_skill_coverage_scores_100() {
        let m = compute_keyword_match(
            &job("Platform Lead", &["Rust", "Kubernetes"]),
            &candidate("Engineer", &["rust", "kubernetes"]),
        );
        assert_eq!(m.score, 100);
        assert!(m.reasoning.contains("2/2"));
    }

    #[test]
    fn test_partial_coverage_with_title_bonus() {
        let mut c = candidate("Staff Engineer", &["rust"]);
        c.experience.push(ExperienceItem {
            title: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
            duration: None,
        });
        let m = compute_keyword_match(&job("Backend Engineer", &["rust", "go"]), &c);
        // 50 coverage + 15 title bonus
        assert_eq!(m.score, 65);
        assert!(m.reasoning.contains("align"));
    }

    #[test]
    fn test_skill_found_in_headline_text_counts() {
        let m = compute_keyword_match(
            &job("Analyst", &["sql"]),
            &candidate("SQL wizard and dashboards", &[]),
        );
        assert_eq!(m.score, 100);
    }

    #[test]
    fn test_short_skills_need_whole_word_match() {
        let m = compute_keyword_match(
            &job("Analyst", &["go", "r"]),
            &candidate("Former Google recruiter", &[]),
        );
        assert_eq!(m.score, 0);

        let m = compute_keyword_match(
            &job("Analyst", &["go", "c++"]),
            &candidate("Backend in Go, some C++ (embedded)", &[]),
        );
        assert_eq!(m.score, 100);
    }

    #[test]
    fn test_contains_term_boundaries() {
        assert!(contains_term("rust, go and sql", "go"));
        assert!(contains_term("machine learning lead", "machine learning"));
        assert!(!contains_term("golang", "go"));
        assert!(!contains_term("ergo", "go"));
        assert!(contains_term("node.js", "node.js"));
    }

    #[test]
    fn test_no_key_skills_is_neutral() {
        let m = compute_keyword_match(&job("CEO", &[]), &candidate("Founder", &[]));
        assert_eq!(m.score, 60);
    }

    #[test]
    fn test_no_overlap_scores_zero() {
        let m = compute_keyword_match(
            &job("Designer", &["figma"]),
            &candidate("Accountant", &["excel"]),
        );
        assert_eq!(m.score, 0);
        assert!(m.reasoning.contains("0/1"));
    }
}
