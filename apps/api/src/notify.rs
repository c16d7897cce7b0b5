//! Out-of-band notification when a job completes (CRM webhook).
//!
//! Fired after the Completed transition commits. A failed notification is
//! logged and dropped; it never touches the job.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::job::Job;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webhook rejected notification (status {0})")]
    Rejected(u16),
}

#[derive(Debug, Clone, Serialize)]
pub struct JobCompletedEvent {
    pub event: &'static str,
    pub job_id: Uuid,
    pub title: String,
    pub client_id: Uuid,
    pub sourcer_id: Option<Uuid>,
    pub accepted: i64,
    pub required: i32,
}

impl JobCompletedEvent {
    pub fn new(job: &Job, accepted: i64) -> Self {
        Self {
            event: "job.completed",
            job_id: job.id,
            title: job.title.clone(),
            client_id: job.client_id,
            sourcer_id: job.sourcer_id,
            accepted,
            required: job.candidates_requested,
        }
    }
}

#[async_trait]
pub trait CompletionNotifier: Send + Sync {
    async fn job_completed(&self, event: &JobCompletedEvent) -> Result<(), NotifyError>;
}

/// POSTs the event as JSON to a CRM inbound webhook.
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: String) -> Result<Self, NotifyError> {
        Ok(Self {
            client: Client::builder().timeout(Duration::from_secs(10)).build()?,
            url,
        })
    }
}

#[async_trait]
impl CompletionNotifier for WebhookNotifier {
    async fn job_completed(&self, event: &JobCompletedEvent) -> Result<(), NotifyError> {
        let response = self.client.post(&self.url).json(event).send().await?;
        if !response.status().is_success() {
            return Err(NotifyError::Rejected(response.status().as_u16()));
        }
        info!("Sent completion webhook for job {}", event.job_id);
        Ok(())
    }
}

/// Used when no webhook is configured.
pub struct DisabledNotifier;

#[async_trait]
impl CompletionNotifier for DisabledNotifier {
    async fn job_completed(&self, event: &JobCompletedEvent) -> Result<(), NotifyError> {
        debug!("Notifications disabled; skipping job {}", event.job_id);
        Ok(())
    }
}

/// Fire-and-forget dispatch on a background task.
pub fn dispatch(notifier: Arc<dyn CompletionNotifier>, event: JobCompletedEvent) {
    tokio::spawn(async move {
        if let Err(e) = notifier.job_completed(&event).await {
            warn!("Completion notification for job {} failed: {e}", event.job_id);
        }
    });
}
