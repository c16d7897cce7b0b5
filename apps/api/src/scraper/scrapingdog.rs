use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use super::normalize::normalize_profile;
use super::{NormalizedCandidate, ProfileScraper, ScrapeError};
use crate::intake::batch::profile_slug;

/// HTTP scraper against a ScrapingDog-compatible LinkedIn profile endpoint.
#[derive(Clone)]
pub struct ScrapingDogScraper {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ScrapingDogScraper {
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self, ScrapeError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl ProfileScraper for ScrapingDogScraper {
    async fn scrape(&self, profile_url: &str) -> Result<NormalizedCandidate, ScrapeError> {
        let slug = profile_slug(profile_url)
            .ok_or_else(|| ScrapeError::Malformed(format!("no profile id in {profile_url}")))?;

        let response = self
            .client
            .get(format!("{}/linkedin", self.base_url))
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("type", "profile"),
                ("linkId", slug.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        match status {
            StatusCode::NOT_FOUND => return Err(ScrapeError::NotFound),
            StatusCode::TOO_MANY_REQUESTS => return Err(ScrapeError::RateLimited),
            s if !s.is_success() => {
                return Err(ScrapeError::Api {
                    status: s.as_u16(),
                    message: response.text().await.unwrap_or_default(),
                })
            }
            _ => {}
        }

        let body: Value = response.json().await?;
        debug!("Scraped profile {slug}");
        normalize_profile(&body)
    }
}
