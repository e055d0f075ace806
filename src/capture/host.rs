//! Host environment the recorder is attached to
//!
//! A host is whatever dispatches pointer and scroll events: a browser page,
//! a webview, or a headless feed. The recorder only needs a clock and the
//! address of the page the events belong to.

/// Milliseconds since the Unix epoch from the wall clock
pub fn wall_clock_ms() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
}

pub trait Host: Send + Sync {
    /// Address of the page currently displayed
    fn current_url(&self) -> String;

    fn now_unix_ms(&self) -> u64 {
        wall_clock_ms()
    }
}

/// A host showing a single fixed page, timed by the wall clock
#[derive(Debug, Clone)]
pub struct StaticHost {
    url: String,
}

impl StaticHost {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Host for StaticHost {
    fn current_url(&self) -> String {
        self.url.clone()
    }
}
