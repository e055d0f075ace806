//! Interaction Recorder - pointer and scroll analytics, batched.
//!
//! This is the main library crate. It records clicks, mouse movement and
//! scroll position reported by a host, and periodically ships them to a
//! collector endpoint as JSON.

pub mod capture;
pub mod commands;
pub mod recorder;

pub use capture::input::{
    CoordinatePolicy, EventBatch, EventKind, InteractionEvent, InteractionRecorder, PointerSample,
    RecorderStats, ScrollMetrics,
};
pub use capture::{Host, StaticHost};
pub use recorder::{HttpTransport, RecorderConfig, RecorderError, RecorderResult, Transport, TransportError};

use recorder::config::ENV_PAGE_URL;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "interaction_recorder=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Run the headless recorder: feed events from stdin until EOF, then
/// deliver whatever is still buffered.
pub async fn run() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!("Starting Interaction Recorder v{}", env!("CARGO_PKG_VERSION"));

    let config = RecorderConfig::from_env()?;
    let page_url = std::env::var(ENV_PAGE_URL).unwrap_or_else(|_| "about:blank".to_string());
    tracing::info!("Collecting for {} into {}", page_url, config.endpoint);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let report = commands::run_feed(stdin, &config, Arc::new(StaticHost::new(page_url))).await?;

    tracing::info!(
        "Feed finished (dispatched={}, skipped={}, sent={}, failed={})",
        report.summary.dispatched,
        report.summary.skipped,
        report.stats.batches_sent,
        report.stats.batches_failed
    );
    Ok(())
}
