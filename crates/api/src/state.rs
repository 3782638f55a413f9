use std::sync::Arc;

use prdforge_events::EventBus;

use crate::config::ServerConfig;
use crate::engine::JobTracker;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager (browser clients).
    pub ws_manager: Arc<WsManager>,
    /// Event bus carrying job lifecycle and progress events.
    pub event_bus: Arc<EventBus>,
    /// Owns the job store and runs submitted jobs.
    pub tracker: Arc<JobTracker>,
}
