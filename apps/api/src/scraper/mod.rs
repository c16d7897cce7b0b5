//! Profile Scraper Gateway — turns a profile URL into a `NormalizedCandidate`.
//!
//! The provider is a black box behind `ProfileScraper`. Its JSON is never
//! trusted: `normalize` checks every field it reads.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod normalize;
pub mod scrapingdog;

pub use scrapingdog::ScrapingDogScraper;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceItem {
    pub title: String,
    pub company: String,
    pub duration: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationItem {
    pub school: String,
    pub degree: Option<String>,
}

/// Provider-independent candidate profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedCandidate {
    pub first_name: String,
    pub last_name: String,
    pub headline: Option<String>,
    pub location: Option<String>,
    pub experience: Vec<ExperienceItem>,
    pub education: Vec<EducationItem>,
    pub skills: Vec<String>,
    pub about: Option<String>,
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("profile not found")]
    NotFound,

    #[error("rate limited by scraping provider")]
    RateLimited,

    #[error("provider error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("unusable provider response: {0}")]
    Malformed(String),

    #[error("scrape timed out after {0}s")]
    Timeout(u64),
}

#[async_trait]
pub trait ProfileScraper: Send + Sync {
    async fn scrape(&self, profile_url: &str) -> Result<NormalizedCandidate, ScrapeError>;
}
