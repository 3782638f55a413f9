//! Event fan-out to browser clients.
//!
//! The [`EventBroadcaster`] subscribes to the event bus and forwards every
//! job event to all connected WebSocket clients.

pub mod broadcaster;

pub use broadcaster::EventBroadcaster;
