//! Stubs and fixtures shared by unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::intake::batch::profile_slug;
use crate::models::candidate::{Candidate, NewCandidate};
use crate::models::job::{Job, JobRequirements, JobStatus, NewJob, SeniorityLevel};
use crate::notify::{CompletionNotifier, JobCompletedEvent, NotifyError};
use crate::scoring::{MatchScore, MatchScorer, ScoreError};
use crate::scraper::{NormalizedCandidate, ProfileScraper, ScrapeError};
use crate::store::memory::MemoryStore;
use crate::store::{Store, StoreError};

pub fn profile_url(slug: &str) -> String {
    format!("https://www.linkedin.com/in/{slug}")
}

pub async fn seed_job(store: &dyn Store, candidates_requested: i32) -> Job {
    store
        .insert_job(&NewJob {
            client_id: Uuid::new_v4(),
            title: "Senior Backend Engineer".to_string(),
            description: "Own the ingestion services.".to_string(),
            seniority: SeniorityLevel::Senior,
            key_skills: vec!["rust".to_string(), "postgres".to_string()],
            candidates_requested,
        })
        .await
        .expect("insert job")
}

pub async fn add_candidates(store: &dyn Store, job_id: Uuid, n: usize) {
    for i in 0..n {
        store
            .insert_candidate(&NewCandidate {
                job_id,
                first_name: format!("Fixture{i}"),
                last_name: "Candidate".to_string(),
                headline: None,
                location: None,
                profile_url: profile_url(&format!("fixture-{i}")),
                match_score: 75,
                match_reasoning: "fixture".to_string(),
            })
            .await
            .expect("insert candidate");
    }
}

/// Succeeds for every URL, naming the candidate after the profile slug.
/// Slugs can be marked as failing (404) or slow (never finishes in time).
#[derive(Default)]
pub struct StubScraper {
    failing: HashSet<String>,
    slow: HashSet<String>,
    pub calls: AtomicUsize,
}

impl StubScraper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, slug: &str) -> Self {
        self.failing.insert(slug.to_string());
        self
    }

    pub fn slow(mut self, slug: &str) -> Self {
        self.slow.insert(slug.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileScraper for StubScraper {
    async fn scrape(&self, url: &str) -> Result<NormalizedCandidate, ScrapeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let slug = profile_slug(url).ok_or(ScrapeError::NotFound)?;
        if self.slow.contains(&slug) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if self.failing.contains(&slug) {
            return Err(ScrapeError::NotFound);
        }
        Ok(NormalizedCandidate {
            first_name: slug,
            last_name: "Stub".to_string(),
            headline: Some("Backend Engineer".to_string()),
            skills: vec!["rust".to_string()],
            ..Default::default()
        })
    }
}

/// Scores by candidate first name (the scraped slug); unknown names get the default.
pub struct StubScorer {
    default_score: u8,
    scores: HashMap<String, u8>,
    failing: HashSet<String>,
    pub calls: AtomicUsize,
}

impl StubScorer {
    pub fn with_default(default_score: u8) -> Self {
        Self {
            default_score,
            scores: HashMap::new(),
            failing: HashSet::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn score_for(mut self, slug: &str, score: u8) -> Self {
        self.scores.insert(slug.to_string(), score);
        self
    }

    pub fn failing(mut self, slug: &str) -> Self {
        self.failing.insert(slug.to_string());
        self
    }
}

#[async_trait]
impl MatchScorer for StubScorer {
    async fn score(
        &self,
        _job: &JobRequirements,
        candidate: &NormalizedCandidate,
    ) -> Result<MatchScore, ScoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&candidate.first_name) {
            return Err(ScoreError::Malformed("score".to_string()));
        }
        Ok(MatchScore {
            score: *self
                .scores
                .get(&candidate.first_name)
                .unwrap_or(&self.default_score),
            reasoning: format!("stub score for {}", candidate.first_name),
        })
    }

    fn backend(&self) -> &'static str {
        "stub"
    }
}

pub struct FailingNotifier;

#[async_trait]
impl CompletionNotifier for FailingNotifier {
    async fn job_completed(&self, _event: &JobCompletedEvent) -> Result<(), NotifyError> {
        Err(NotifyError::Rejected(500))
    }
}

/// `MemoryStore` whose Nth candidate insert (0-based) fails once, or whose
/// candidate count always fails.
pub struct FlakyStore {
    pub inner: MemoryStore,
    fail_on: Option<usize>,
    fail_count: bool,
    inserts: AtomicUsize,
}

impl FlakyStore {
    pub fn failing_insert(fail_on: usize) -> Self {
        Self {
            inner: MemoryStore::new(),
            fail_on: Some(fail_on),
            fail_count: false,
            inserts: AtomicUsize::new(0),
        }
    }

    pub fn failing_count() -> Self {
        Self {
            inner: MemoryStore::new(),
            fail_on: None,
            fail_count: true,
            inserts: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Store for FlakyStore {
    async fn insert_job(&self, job: &NewJob) -> Result<Job, StoreError> {
        self.inner.insert_job(job).await
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<Job>, StoreError> {
        self.inner.get_job(id).await
    }

    async fn list_jobs(&self, status: Option<JobStatus>) -> Result<Vec<Job>, StoreError> {
        self.inner.list_jobs(status).await
    }

    async fn transition_job(
        &self,
        id: Uuid,
        from: JobStatus,
        to: JobStatus,
        sourcer_id: Uuid,
    ) -> Result<bool, StoreError> {
        self.inner.transition_job(id, from, to, sourcer_id).await
    }

    async fn insert_candidate(&self, candidate: &NewCandidate) -> Result<Candidate, StoreError> {
        if Some(self.inserts.fetch_add(1, Ordering::SeqCst)) == self.fail_on {
            return Err(StoreError::Corrupt("simulated write failure".to_string()));
        }
        self.inner.insert_candidate(candidate).await
    }

    async fn count_candidates_for_job(&self, job_id: Uuid) -> Result<i64, StoreError> {
        if self.fail_count {
            return Err(StoreError::Corrupt("simulated count failure".to_string()));
        }
        self.inner.count_candidates_for_job(job_id).await
    }

    async fn list_candidates_for_job(&self, job_id: Uuid) -> Result<Vec<Candidate>, StoreError> {
        self.inner.list_candidates_for_job(job_id).await
    }
}
