use std::sync::Arc;

use crate::intake::pipeline::IntakePipeline;
use crate::notify::CompletionNotifier;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    /// Scraper + scorer + settings, wired once at startup.
    pub intake: IntakePipeline,
    pub notifier: Arc<dyn CompletionNotifier>,
}
