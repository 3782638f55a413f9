//! Event names and WebSocket message types for job lifecycle updates.
//!
//! Event names are published on the in-process bus; message types are the
//! `type` field of the JSON frames broadcast to browser clients.

// ---------------------------------------------------------------------------
// Bus event names
// ---------------------------------------------------------------------------

/// A job was accepted and stored as `pending`.
pub const EVENT_JOB_SUBMITTED: &str = "job.submitted";

/// The background task picked the job up.
pub const EVENT_JOB_PROCESSING: &str = "job.processing";

/// Free-form progress line emitted while generating.
pub const EVENT_JOB_LOG: &str = "job.log";

/// A role-played agent produced a reply.
pub const EVENT_JOB_AGENT_MESSAGE: &str = "job.agent_message";

/// All artifacts were written.
pub const EVENT_JOB_COMPLETED: &str = "job.completed";

/// Generation failed; the payload carries the error string.
pub const EVENT_JOB_FAILED: &str = "job.failed";

// ---------------------------------------------------------------------------
// WebSocket message types
// ---------------------------------------------------------------------------

/// Status change (`pending`, `processing`).
pub const MSG_TYPE_JOB_STATUS: &str = "job_status";

/// Progress log line.
pub const MSG_TYPE_JOB_LOG: &str = "job_log";

/// Agent reply content.
pub const MSG_TYPE_AGENT_MESSAGE: &str = "agent_message";

/// Job completed successfully.
pub const MSG_TYPE_JOB_COMPLETED: &str = "job_completed";

/// Job failed with an error.
pub const MSG_TYPE_JOB_FAILED: &str = "job_failed";

/// Map a bus event name to the WebSocket message type it is broadcast as.
///
/// Returns `None` for events that are not forwarded to browsers.
pub fn ws_message_type(event_type: &str) -> Option<&'static str> {
    match event_type {
        EVENT_JOB_SUBMITTED | EVENT_JOB_PROCESSING => Some(MSG_TYPE_JOB_STATUS),
        EVENT_JOB_LOG => Some(MSG_TYPE_JOB_LOG),
        EVENT_JOB_AGENT_MESSAGE => Some(MSG_TYPE_AGENT_MESSAGE),
        EVENT_JOB_COMPLETED => Some(MSG_TYPE_JOB_COMPLETED),
        EVENT_JOB_FAILED => Some(MSG_TYPE_JOB_FAILED),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_events_share_one_message_type() {
        assert_eq!(ws_message_type(EVENT_JOB_SUBMITTED), Some(MSG_TYPE_JOB_STATUS));
        assert_eq!(ws_message_type(EVENT_JOB_PROCESSING), Some(MSG_TYPE_JOB_STATUS));
    }

    #[test]
    fn terminal_events_have_dedicated_types() {
        assert_eq!(ws_message_type(EVENT_JOB_COMPLETED), Some(MSG_TYPE_JOB_COMPLETED));
        assert_eq!(ws_message_type(EVENT_JOB_FAILED), Some(MSG_TYPE_JOB_FAILED));
    }

    #[test]
    fn unknown_event_is_not_forwarded() {
        assert_eq!(ws_message_type("system.tick"), None);
    }
}
