use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use prdforge_events::EventBus;
use prdforge_llm::config::ProviderKind;
use prdforge_llm::{create_provider, LlmConfig};
use prdforge_pipeline::{
    AgentPipeline, ArtifactWriter, Generator, PipelineSettings, TemplateGenerator,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prdforge_api::config::ServerConfig;
use prdforge_api::engine::JobTracker;
use prdforge_api::notifications::EventBroadcaster;
use prdforge_api::router::build_app_router;
use prdforge_api::state::AppState;
use prdforge_api::ws;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    init_tracing();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        artifact_dir = %config.artifact_dir.display(),
        "Loaded server configuration"
    );

    let llm_config = LlmConfig::from_env();

    // --- Generator ---
    let generator = build_generator(&llm_config, &config);
    tracing::info!(generator = generator.name(), "Generator ready");

    // --- WebSocket manager ---
    let ws_manager = Arc::new(ws::WsManager::new());

    // --- Heartbeat ---
    let heartbeat_handle = ws::start_heartbeat(Arc::clone(&ws_manager));

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());
    tracing::info!("Event bus created");

    // Spawn the broadcaster (forwards job events to WebSocket clients).
    let broadcaster_cancel = CancellationToken::new();
    let broadcaster = EventBroadcaster::new(Arc::clone(&ws_manager));
    let broadcaster_handle = tokio::spawn(
        broadcaster.run(event_bus.subscribe(), broadcaster_cancel.clone()),
    );

    // --- Job tracker ---
    let tracker = Arc::new(JobTracker::new(
        generator,
        ArtifactWriter::new(config.artifact_dir.clone()),
        Arc::clone(&event_bus),
    ));

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        ws_manager: Arc::clone(&ws_manager),
        event_bus: Arc::clone(&event_bus),
        tracker,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    broadcaster_cancel.cancel();
    let _ = tokio::time::timeout(shutdown_timeout, broadcaster_handle).await;
    tracing::info!("Event broadcaster stopped");

    let ws_count = ws_manager.connection_count().await;
    tracing::info!(ws_count, "Closing remaining WebSocket connections");
    ws_manager.shutdown_all().await;

    heartbeat_handle.abort();
    tracing::info!("Heartbeat task stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the default filter; `LOG_FORMAT=json` switches to
/// one JSON object per line.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "prdforge_api=debug,prdforge_pipeline=debug,tower_http=debug".into()
    });

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Pick the generator for the configured provider.
///
/// Without a language model the service still runs end to end on
/// placeholder documents. Panics when a provider is selected but cannot be
/// built (e.g. missing key) so misconfiguration fails at startup.
fn build_generator(llm: &LlmConfig, config: &ServerConfig) -> Arc<dyn Generator> {
    if llm.provider == ProviderKind::Template {
        tracing::warn!("No language model configured, generating placeholder artifacts");
        return Arc::new(TemplateGenerator::new());
    }

    let provider = create_provider(llm)
        .unwrap_or_else(|e| panic!("Failed to configure LLM provider '{}': {e}", llm.provider));

    let settings = PipelineSettings {
        temperature: llm.temperature,
        max_tokens: llm.max_tokens,
        max_review_rounds: config.max_review_rounds,
    };
    Arc::new(AgentPipeline::new(provider, settings))
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
