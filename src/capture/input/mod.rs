//! Pointer and scroll interaction capture
//!
//! Implements the recorder that normalizes host interaction events into
//! uniform records, buffers them and flushes them to a collector on a timer.

pub mod channel;
pub mod types;

pub use channel::{InteractionRecorder, RecorderStats};
pub use types::{
    CoordinatePolicy, EventBatch, EventKind, InteractionEvent, PointerSample, ScrollMetrics,
};
