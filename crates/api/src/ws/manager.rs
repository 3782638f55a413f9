//! Open browser connections that receive job progress.
//!
//! The broadcaster task pushes every serialized job event through
//! [`WsManager::broadcast`]; each connection drains its own channel in the
//! socket handler.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::ws::Message;
use prdforge_core::types::Timestamp;
use tokio::sync::{mpsc, RwLock};

/// Outbound queue of one job-event subscriber.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// A subscriber to the job-event stream.
pub struct WsConnection {
    pub sender: WsSender,
    /// Upgrade time, reported in connection logs.
    pub connected_at: Timestamp,
}

/// Connection registry keyed by connection id.
///
/// Lives in `AppState` behind an `Arc`; the broadcaster, heartbeat and
/// socket handlers share one instance.
pub struct WsManager {
    connections: RwLock<HashMap<String, WsConnection>>,
}

impl WsManager {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Subscribe `conn_id` to job events.
    ///
    /// The socket handler forwards everything arriving on the returned
    /// receiver to the client.
    pub async fn add(&self, conn_id: String) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = WsConnection {
            sender: tx,
            connected_at: chrono::Utc::now(),
        };
        self.connections.write().await.insert(conn_id, conn);
        rx
    }

    /// Unsubscribe a closed connection.
    pub async fn remove(&self, conn_id: &str) {
        self.connections.write().await.remove(conn_id);
    }

    /// Fan one job-event frame out to every subscriber.
    ///
    /// A closed channel is skipped here; its handler unsubscribes it on exit.
    pub async fn broadcast(&self, message: Message) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.sender.send(message.clone());
        }
    }

    /// Subscribers currently registered, as reported by `/health`.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Close every subscriber and empty the registry on shutdown.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }

    /// Heartbeat ping so idle dashboards waiting on long jobs stay connected.
    pub async fn ping_all(&self) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Ping(Bytes::new()));
        }
    }
}

impl Default for WsManager {
    fn default() -> Self {
        Self::new()
    }
}
