//! Bus-to-WebSocket forwarding loop.

use std::sync::Arc;

use axum::extract::ws::Message;
use prdforge_core::job_events::ws_message_type;
use prdforge_events::JobEvent;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::ws::WsManager;

/// Forwards [`JobEvent`]s to every WebSocket connection.
///
/// There is no per-client filtering: each client receives every event and
/// picks out the jobs it cares about by `job_id`.
pub struct EventBroadcaster {
    ws_manager: Arc<WsManager>,
}

impl EventBroadcaster {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Run the forwarding loop.
    ///
    /// Exits when `cancel` fires or the channel is closed (i.e. the
    /// [`EventBus`](prdforge_events::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<JobEvent>, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Event broadcaster shutting down");
                    break;
                }
                received = receiver.recv() => match received {
                    Ok(event) => self.forward(&event).await,
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "Event broadcaster lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("Event bus closed, event broadcaster shutting down");
                        break;
                    }
                },
            }
        }
    }

    async fn forward(&self, event: &JobEvent) {
        let Some(frame) = to_frame(event) else {
            tracing::trace!(event_type = %event.event_type, "Event not forwarded to clients");
            return;
        };
        self.ws_manager
            .broadcast(Message::Text(frame.to_string().into()))
            .await;
    }
}

/// JSON frame sent to clients for a bus event.
///
/// `{"type", "job_id", "timestamp", ...payload}`; `None` for event types
/// that browsers never see.
pub fn to_frame(event: &JobEvent) -> Option<serde_json::Value> {
    let msg_type = ws_message_type(&event.event_type)?;

    let mut frame = serde_json::Map::new();
    if let serde_json::Value::Object(fields) = &event.payload {
        frame.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    frame.insert("type".into(), msg_type.into());
    frame.insert("job_id".into(), event.job_id.to_string().into());
    frame.insert("timestamp".into(), event.timestamp.to_rfc3339().into());

    Some(serde_json::Value::Object(frame))
}
