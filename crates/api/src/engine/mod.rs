//! Job execution engine.
//!
//! Holds the in-memory job store and the tracker that accepts generation
//! requests, runs each one as an independent background task and records
//! every status transition.

pub mod store;
pub mod tracker;

pub use store::JobStore;
pub use tracker::JobTracker;
