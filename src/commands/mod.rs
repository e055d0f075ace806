//! Host adapters that drive a recorder from outside a browser.

pub mod feed;

pub use feed::{feed_lines, run_feed, FeedReport, FeedSummary, HostEvent};
