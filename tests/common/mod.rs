//! Shared test doubles for recorder integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use interaction_recorder::{EventBatch, Host, Transport, TransportError};
use tokio::sync::mpsc;

/// Transport that forwards every batch to a channel.
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<EventBatch>,
}

impl ChannelTransport {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<EventBatch>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn send(&self, batch: &EventBatch) -> Result<(), TransportError> {
        let _ = self.tx.send(batch.clone());
        Ok(())
    }
}

/// Host with a fixed URL and a fixed clock.
pub struct FixedHost {
    pub url: String,
    pub now: u64,
}

impl FixedHost {
    pub fn new(url: &str, now: u64) -> Self {
        Self {
            url: url.to_string(),
            now,
        }
    }
}

impl Host for FixedHost {
    fn current_url(&self) -> String {
        self.url.clone()
    }

    fn now_unix_ms(&self) -> u64 {
        self.now
    }
}

/// Reader whose every read fails, for cutting a feed short.
pub struct FailingReader;

impl tokio::io::AsyncRead for FailingReader {
    fn poll_read(
        self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
        _buf: &mut tokio::io::ReadBuf<'_>,
    ) -> std::task::Poll<std::io::Result<()>> {
        std::task::Poll::Ready(Err(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "feed closed",
        )))
    }
}
