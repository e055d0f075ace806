//! Headless event feed
//!
//! Reads newline-delimited JSON host events and dispatches them to a
//! recorder, standing in for a browser page when running from a terminal.

use crate::capture::host::Host;
use crate::capture::input::types::{PointerSample, ScrollMetrics};
use crate::capture::input::{InteractionRecorder, RecorderStats};
use crate::recorder::config::RecorderConfig;
use crate::recorder::error::RecorderResult;
use serde::Deserialize;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// One interaction as dispatched by the host
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HostEvent {
    Click(PointerSample),
    #[serde(rename = "mousemove")]
    MouseMove(PointerSample),
    Scroll(ScrollMetrics),
}

impl HostEvent {
    pub fn dispatch(self, recorder: &InteractionRecorder) {
        match self {
            HostEvent::Click(sample) => recorder.on_click(sample),
            HostEvent::MouseMove(sample) => recorder.on_mouse_move(sample),
            HostEvent::Scroll(metrics) => recorder.on_scroll(metrics),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedSummary {
    pub dispatched: usize,
    pub skipped: usize,
}

/// Outcome of a complete feed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedReport {
    pub summary: FeedSummary,
    pub stats: RecorderStats,
}

/// Dispatch every event read from `reader` until EOF.
///
/// Blank lines are ignored. Lines that are not UTF-8 or not a valid event
/// are logged and skipped. Only a failing reader ends the feed early.
pub async fn feed_lines<R>(mut reader: R, recorder: &InteractionRecorder) -> RecorderResult<FeedSummary>
where
    R: AsyncBufRead + Unpin,
{
    let mut summary = FeedSummary::default();
    let mut raw = Vec::new();
    let mut line_no = 0usize;

    loop {
        raw.clear();
        if reader.read_until(b'\n', &mut raw).await? == 0 {
            break;
        }
        line_no += 1;

        let line = match std::str::from_utf8(&raw) {
            Ok(line) => line.trim(),
            Err(e) => {
                tracing::warn!("Skipping non UTF-8 input on line {}: {}", line_no, e);
                summary.skipped += 1;
                continue;
            }
        };
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<HostEvent>(line) {
            Ok(event) => {
                event.dispatch(recorder);
                summary.dispatched += 1;
            }
            Err(e) => {
                tracing::warn!("Skipping malformed event on line {}: {}", line_no, e);
                summary.skipped += 1;
            }
        }
    }

    Ok(summary)
}

/// Record everything from `reader`, then deliver what is still buffered.
///
/// The flush timer runs while the feed is read. At EOF, or when the reader
/// fails, the timer is stopped and a final flush is awaited before the
/// result is returned.
pub async fn run_feed<R>(
    reader: R,
    config: &RecorderConfig,
    host: Arc<dyn Host>,
) -> RecorderResult<FeedReport>
where
    R: AsyncBufRead + Unpin,
{
    let recorder = InteractionRecorder::with_http(config, host)?;
    recorder.start()?;

    let fed = feed_lines(reader, &recorder).await;

    recorder.stop()?;
    if let Some(handle) = recorder.flush() {
        if let Err(e) = handle.await {
            tracing::error!("Final flush task failed: {}", e);
        }
    }

    Ok(FeedReport {
        summary: fed?,
        stats: recorder.stats(),
    })
}
