use std::sync::Arc;

use prdforge_core::job_events::{EVENT_JOB_AGENT_MESSAGE, EVENT_JOB_LOG};
use prdforge_core::types::JobId;
use prdforge_events::{EventBus, JobEvent};

/// Publishes progress events for one job.
#[derive(Clone)]
pub struct JobReporter {
    bus: Arc<EventBus>,
    job_id: JobId,
}

impl JobReporter {
    pub fn new(bus: Arc<EventBus>, job_id: JobId) -> Self {
        Self { bus, job_id }
    }

    pub fn job_id(&self) -> JobId {
        self.job_id
    }

    /// A progress line shown to the user.
    pub fn log(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(job_id = %self.job_id, %message, "Job progress");
        self.bus.publish(
            JobEvent::new(EVENT_JOB_LOG, self.job_id)
                .with_payload(serde_json::json!({ "message": message })),
        );
    }

    /// A reply produced by one of the agents.
    pub fn agent_message(&self, agent: &str, content: &str) {
        self.bus.publish(
            JobEvent::new(EVENT_JOB_AGENT_MESSAGE, self.job_id).with_payload(serde_json::json!({
                "agent": agent,
                "content": content,
            })),
        );
    }
}
