use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::scoring::{DEFAULT_ACCEPT_THRESHOLD, DEFAULT_FALLBACK_SCORE};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub scraper_api_key: String,
    pub scraper_base_url: String,
    pub enable_llm_match_scoring: bool,
    /// Required only when LLM scoring is enabled.
    pub anthropic_api_key: Option<String>,
    pub crm_webhook_url: Option<String>,
    pub intake: IntakeSettings,
    pub port: u16,
    pub rust_log: String,
}

/// Tunables for the candidate intake pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct IntakeSettings {
    pub accept_threshold: u8,
    pub fallback_score: u8,
    pub scrape_timeout: Duration,
    pub score_timeout: Duration,
    /// Identifiers processed at once within one batch.
    pub concurrency: usize,
}

impl Default for IntakeSettings {
    fn default() -> Self {
        Self {
            accept_threshold: DEFAULT_ACCEPT_THRESHOLD,
            fallback_score: DEFAULT_FALLBACK_SCORE,
            scrape_timeout: Duration::from_secs(20),
            score_timeout: Duration::from_secs(15),
            concurrency: 4,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let enable_llm_match_scoring = parse_env("ENABLE_LLM_MATCH_SCORING", true)?;
        let anthropic_api_key = optional_env("ANTHROPIC_API_KEY");
        if enable_llm_match_scoring && anthropic_api_key.is_none() {
            bail!("ANTHROPIC_API_KEY is required when ENABLE_LLM_MATCH_SCORING is true");
        }

        let defaults = IntakeSettings::default();
        let intake = IntakeSettings {
            accept_threshold: parse_score("MATCH_ACCEPT_THRESHOLD", defaults.accept_threshold)?,
            fallback_score: parse_score("MATCH_FALLBACK_SCORE", defaults.fallback_score)?,
            scrape_timeout: Duration::from_secs(parse_env(
                "SCRAPE_TIMEOUT_SECS",
                defaults.scrape_timeout.as_secs(),
            )?),
            score_timeout: Duration::from_secs(parse_env(
                "SCORE_TIMEOUT_SECS",
                defaults.score_timeout.as_secs(),
            )?),
            concurrency: parse_env("INTAKE_CONCURRENCY", defaults.concurrency)?.max(1),
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            scraper_api_key: require_env("SCRAPER_API_KEY")?,
            scraper_base_url: optional_env("SCRAPER_BASE_URL")
                .unwrap_or_else(|| "https://api.scrapingdog.com".to_string()),
            enable_llm_match_scoring,
            anthropic_api_key,
            crm_webhook_url: optional_env("CRM_WEBHOOK_URL"),
            intake,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional_env(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| anyhow::anyhow!("{key} has invalid value '{raw}': {e}"))
}

fn parse_score(key: &str, default: u8) -> Result<u8> {
    let score = parse_env(key, default)?;
    if score > 100 {
        bail!("{key} must be between 0 and 100, got {score}");
    }
    Ok(score)
}
