//! Batch delivery to the collector
//!
//! The recorder hands each flushed batch to a [`Transport`] from a detached
//! task. Delivery is one attempt; the response is never inspected.

use crate::capture::input::types::EventBatch;
use crate::recorder::error::TransportError;
use async_trait::async_trait;

#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver one batch. Only request-level failures are errors.
    async fn send(&self, batch: &EventBatch) -> Result<(), TransportError>;
}

/// POSTs batches as JSON to a fixed endpoint
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, batch: &EventBatch) -> Result<(), TransportError> {
        let response = self.client.post(&self.endpoint).json(batch).send().await?;

        tracing::debug!(
            "Delivered {} events to {} (status {})",
            batch.events.len(),
            self.endpoint,
            response.status()
        );
        Ok(())
    }
}
