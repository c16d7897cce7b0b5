mod config;
mod db;
mod errors;
mod intake;
mod jobs;
mod llm_client;
mod models;
mod notify;
mod routes;
mod scoring;
mod scraper;
mod state;
mod store;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::intake::pipeline::IntakePipeline;
use crate::llm_client::LlmClient;
use crate::notify::{CompletionNotifier, DisabledNotifier, WebhookNotifier};
use crate::routes::build_router;
use crate::scoring::{KeywordMatchScorer, LlmMatchScorer, MatchScorer};
use crate::scraper::ScrapingDogScraper;
use crate::state::AppState;
use crate::store::{PgStore, Store};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting sourcing API v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn Store> = Arc::new(PgStore::new(create_pool(&config.database_url).await?));

    let scraper = ScrapingDogScraper::new(
        config.scraper_base_url.clone(),
        config.scraper_api_key.clone(),
        // Outer per-profile timeout lives in the pipeline; this just bounds the socket.
        config.intake.scrape_timeout + Duration::from_secs(5),
    )
    .context("Failed to build scraper HTTP client")?;
    info!("Profile scraper initialized ({})", config.scraper_base_url);

    let scorer = build_scorer(&config)?;
    info!("Match scorer initialized (backend: {})", scorer.backend());

    let notifier: Arc<dyn CompletionNotifier> = match &config.crm_webhook_url {
        Some(url) => Arc::new(
            WebhookNotifier::new(url.clone()).context("Failed to build webhook HTTP client")?,
        ),
        None => {
            info!("CRM_WEBHOOK_URL not set; completion notifications disabled");
            Arc::new(DisabledNotifier)
        }
    };

    let state = AppState {
        intake: IntakePipeline::new(
            store.clone(),
            Arc::new(scraper),
            scorer,
            config.intake.clone(),
        ),
        store,
        notifier,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// LLM scorer unless ENABLE_LLM_MATCH_SCORING=false, then the keyword scorer.
fn build_scorer(config: &Config) -> Result<Arc<dyn MatchScorer>> {
    match (&config.anthropic_api_key, config.enable_llm_match_scoring) {
        (Some(key), true) => {
            let llm = LlmClient::new(key.clone(), config.intake.score_timeout)
                .context("Failed to build LLM HTTP client")?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Ok(Arc::new(LlmMatchScorer(llm)))
        }
        _ => Ok(Arc::new(KeywordMatchScorer)),
    }
}
