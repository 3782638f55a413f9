//! prdforge event bus.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`JobEvent`]: the envelope for every job lifecycle and progress event.

pub mod bus;

pub use bus::{EventBus, JobEvent};
