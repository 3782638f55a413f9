//! Domain types shared by every prdforge crate.
//!
//! Holds the job record and its status machine, artifact kinds, request
//! validation, user-story parsing and the helpers that pull structured
//! content out of free-form agent replies.

pub mod error;
pub mod extract;
pub mod generation;
pub mod job;
pub mod job_events;
pub mod types;
pub mod user_story;
