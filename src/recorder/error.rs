//! Error types for the recorder and its transport

use thiserror::Error;

/// Errors raised while delivering a batch to the collector
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Errors that can occur while configuring or driving a recorder
#[derive(Error, Debug)]
pub enum RecorderError {
    #[error("Already recording")]
    AlreadyRecording,

    #[error("Not recording")]
    NotRecording,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for recorder operations
pub type RecorderResult<T> = Result<T, RecorderError>;
