//! Interaction capture
//!
//! This module provides the host abstraction and the input recorder that
//! attaches to it.

pub mod host;
pub mod input;

pub use host::{Host, StaticHost};
pub use input::InteractionRecorder;
