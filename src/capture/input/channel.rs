use crate::capture::host::Host;
use crate::capture::input::types::{
    CoordinatePolicy, EventBatch, EventKind, InteractionEvent, PointerSample, ScrollMetrics,
};
use crate::recorder::config::RecorderConfig;
use crate::recorder::error::{RecorderError, RecorderResult};
use crate::recorder::transport::{HttpTransport, Transport};
use parking_lot::Mutex as ParkingMutex;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Counters describing what a recorder has done so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecorderStats {
    pub recorded: u64,
    pub batches_sent: u64,
    pub batches_failed: u64,
    pub events_dropped: u64,
}

#[derive(Default)]
struct EventBuffer {
    events: Vec<InteractionEvent>,
    last_timestamp: u64,
}

#[derive(Default)]
struct Counters {
    recorded: AtomicU64,
    batches_sent: AtomicU64,
    batches_failed: AtomicU64,
    events_dropped: AtomicU64,
}

struct Inner {
    host: Arc<dyn Host>,
    transport: Arc<dyn Transport>,
    flush_interval: Duration,
    coordinate_policy: CoordinatePolicy,
    buffer: ParkingMutex<EventBuffer>,
    counters: Counters,
    is_recording: AtomicBool,
    timer_handle: ParkingMutex<Option<JoinHandle<()>>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(handle) = self.timer_handle.get_mut().take() {
            handle.abort();
        }
    }
}

/// Buffers pointer and scroll interactions and ships them in batches.
///
/// Cloning is cheap; every clone shares the same buffer and timer.
#[derive(Clone)]
pub struct InteractionRecorder {
    inner: Arc<Inner>,
}

impl InteractionRecorder {
    pub fn new(
        config: &RecorderConfig,
        host: Arc<dyn Host>,
        transport: Arc<dyn Transport>,
    ) -> RecorderResult<Self> {
        config.validate()?;

        Ok(Self {
            inner: Arc::new(Inner {
                host,
                transport,
                flush_interval: config.flush_interval(),
                coordinate_policy: config.coordinate_policy,
                buffer: ParkingMutex::new(EventBuffer::default()),
                counters: Counters::default(),
                is_recording: AtomicBool::new(false),
                timer_handle: ParkingMutex::new(None),
            }),
        })
    }

    /// Recorder delivering to `config.endpoint` over HTTP
    pub fn with_http(config: &RecorderConfig, host: Arc<dyn Host>) -> RecorderResult<Self> {
        let transport = Arc::new(HttpTransport::new(config.endpoint.clone()));
        Self::new(config, host, transport)
    }

    pub fn on_click(&self, sample: PointerSample) {
        self.record_pointer(EventKind::Click, sample);
    }

    pub fn on_mouse_move(&self, sample: PointerSample) {
        self.record_pointer(EventKind::MouseMove, sample);
    }

    pub fn on_scroll(&self, metrics: ScrollMetrics) {
        tracing::debug!("scroll {} {}", metrics.scroll_x, metrics.scroll_y);

        let (x, y) = metrics.percentages();
        self.push(|timestamp| InteractionEvent::scroll(timestamp, x, y));
    }

    fn record_pointer(&self, kind: EventKind, sample: PointerSample) {
        tracing::debug!("{}", kind);

        let policy = self.inner.coordinate_policy;
        let x = policy.apply(sample.client_x);
        let y = policy.apply(sample.client_y);
        self.push(|timestamp| InteractionEvent::pointer(kind, timestamp, x, y));
    }

    fn push(&self, build: impl FnOnce(u64) -> InteractionEvent) {
        let now = self.inner.host.now_unix_ms();

        let mut buffer = self.inner.buffer.lock();
        // Keep buffered timestamps non-decreasing if the host clock steps back
        let timestamp = now.max(buffer.last_timestamp);
        buffer.last_timestamp = timestamp;
        buffer.events.push(build(timestamp));
        drop(buffer);

        self.inner.counters.recorded.fetch_add(1, Ordering::Relaxed);
    }

    /// Hand everything buffered to the transport and clear the buffer.
    ///
    /// Returns `None` without touching the transport when nothing is
    /// buffered. Otherwise the send runs on a detached task; the returned
    /// handle may be awaited or dropped. A failed send is logged and the
    /// batch is discarded. Must be called from within a tokio runtime.
    pub fn flush(&self) -> Option<JoinHandle<()>> {
        let events = {
            let mut buffer = self.inner.buffer.lock();
            if buffer.events.is_empty() {
                return None;
            }
            std::mem::take(&mut buffer.events)
        };

        let batch = EventBatch {
            events,
            url: self.inner.host.current_url(),
        };
        tracing::info!("Flushing {} events from {}", batch.events.len(), batch.url);

        let inner = self.inner.clone();
        Some(tokio::spawn(async move {
            let count = batch.events.len() as u64;
            match inner.transport.send(&batch).await {
                Ok(()) => {
                    inner.counters.batches_sent.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => {
                    tracing::error!("Failed to deliver {} events: {}", count, e);
                    inner.counters.batches_failed.fetch_add(1, Ordering::Relaxed);
                    inner.counters.events_dropped.fetch_add(count, Ordering::Relaxed);
                }
            }
        }))
    }

    /// Start the recurring flush timer. The first flush happens one full
    /// interval after this call.
    pub fn start(&self) -> RecorderResult<()> {
        if self.inner.is_recording.swap(true, Ordering::SeqCst) {
            return Err(RecorderError::AlreadyRecording);
        }

        let period = self.inner.flush_interval;
        let handle = tokio::spawn(run_flush_timer(Arc::downgrade(&self.inner), period));
        *self.inner.timer_handle.lock() = Some(handle);

        tracing::info!("Interaction recorder started (flush_interval={:?})", period);
        Ok(())
    }

    /// Stop the flush timer. Buffered events stay buffered.
    pub fn stop(&self) -> RecorderResult<()> {
        if !self.inner.is_recording.swap(false, Ordering::SeqCst) {
            return Err(RecorderError::NotRecording);
        }

        if let Some(handle) = self.inner.timer_handle.lock().take() {
            handle.abort();
        }

        let stats = self.stats();
        tracing::info!(
            "Interaction recorder stopped (recorded={}, pending={}, sent={}, failed={})",
            stats.recorded,
            self.pending(),
            stats.batches_sent,
            stats.batches_failed
        );
        Ok(())
    }

    pub fn is_recording(&self) -> bool {
        self.inner.is_recording.load(Ordering::SeqCst)
    }

    /// Number of events waiting for the next flush
    pub fn pending(&self) -> usize {
        self.inner.buffer.lock().events.len()
    }

    pub fn stats(&self) -> RecorderStats {
        let counters = &self.inner.counters;
        RecorderStats {
            recorded: counters.recorded.load(Ordering::Relaxed),
            batches_sent: counters.batches_sent.load(Ordering::Relaxed),
            batches_failed: counters.batches_failed.load(Ordering::Relaxed),
            events_dropped: counters.events_dropped.load(Ordering::Relaxed),
        }
    }
}

async fn run_flush_timer(inner: Weak<Inner>, period: Duration) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let Some(shared) = inner.upgrade() else {
            break;
        };
        InteractionRecorder { inner: shared }.flush();
    }

    tracing::debug!("Flush timer exited");
}
