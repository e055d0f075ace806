//! Delivery side of the recorder: configuration, errors and transport.

pub mod config;
pub mod error;
pub mod transport;

pub use config::RecorderConfig;
pub use error::{RecorderError, RecorderResult, TransportError};
pub use transport::{HttpTransport, Transport};
