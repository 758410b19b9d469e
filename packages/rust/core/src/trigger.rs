//! Cross-stage hand-off.
//!
//! After the crawl stage commits, it may notify the quiz stage to run. The
//! notification is fire-and-forget: a failed notify is logged by the caller
//! and never fails the upstream stage. Local mode runs stages independently
//! and configures no trigger.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use quizforge_shared::{QuizForgeError, Result};

/// Payload handed from the crawl stage to the quiz stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerPayload {
    /// The URL whose content was just crawled.
    pub website_url: String,
    /// Storage key of the crawled content.
    pub intermediate_key: String,
}

/// Signals the quiz stage that new crawled content is available.
#[async_trait]
pub trait StageTrigger: Send + Sync {
    /// Deliver the hand-off payload.
    async fn notify(&self, payload: &TriggerPayload) -> Result<()>;
}

/// POSTs the payload as JSON to a configured endpoint.
pub struct WebhookTrigger {
    client: reqwest::Client,
    endpoint: String,
}

impl WebhookTrigger {
    /// A trigger posting to `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| QuizForgeError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl StageTrigger for WebhookTrigger {
    async fn notify(&self, payload: &TriggerPayload) -> Result<()> {
        debug!(endpoint = %self.endpoint, url = %payload.website_url, "notifying quiz stage");

        let response = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|e| QuizForgeError::Network(format!("{}: {e}", self.endpoint)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuizForgeError::Network(format!(
                "{}: HTTP {status}",
                self.endpoint
            )));
        }

        Ok(())
    }
}
