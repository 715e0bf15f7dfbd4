//! HTTP server implementation using Axum.

use axum::{
    Router,
    http::HeaderValue,
    routing::{delete, get, post},
};
use ruleta_core::RuletaConfig;
use ruleta_core::error::Result;
use ruleta_engine::DrawEngine;
use ruleta_store::{HistoryStore, ParticipantStore};
use std::path::Path;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared state for the gateway server.
pub struct AppState {
    pub config: Arc<RuletaConfig>,
    pub participants: Arc<ParticipantStore>,
    pub history: Arc<HistoryStore>,
    pub engine: DrawEngine,
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Open the stores under the configured data directory, creating it if needed.
    pub fn new(config: Arc<RuletaConfig>) -> Result<Self> {
        std::fs::create_dir_all(&config.storage.data_dir)?;

        let participants = Arc::new(ParticipantStore::new(config.storage.participants_path()));
        let history = Arc::new(HistoryStore::new(config.storage.history_path()));
        let engine = DrawEngine::new(participants.clone(), history.clone());

        Ok(Self {
            config,
            participants,
            history,
            engine,
            start_time: std::time::Instant::now(),
        })
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    if origins.is_empty() {
        // Frontend and backend deployed together; allow everything.
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|s| {
            s.trim()
                .parse::<HeaderValue>()
                .map_err(|e| tracing::warn!("Ignoring invalid CORS origin {s:?}: {e}"))
                .ok()
        })
        .collect();
    cors.allow_origin(origins)
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    build_router_from_arc(Arc::new(state))
}

pub fn build_router_from_arc(shared: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/health", get(super::routes::health_check))
        .route(
            "/api/participants",
            get(super::routes::list_participants).post(super::routes::add_participant),
        )
        .route(
            "/api/participants/{name}",
            delete(super::routes::delete_participant),
        )
        .route(
            "/api/history",
            get(super::routes::list_history).delete(super::routes::clear_history),
        )
        .route("/api/spin", post(super::routes::spin));

    // SPA fallback: every other GET path gets index.html for client-side routing.
    let frontend_dir = Path::new(&shared.config.gateway.frontend_dir);
    let app = super::spa::with_assets(api, frontend_dir).fallback(get(super::spa::serve_index));

    app.layer(cors_layer(&shared.config.gateway.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}

/// Start the HTTP server and run until Ctrl+C or SIGTERM.
pub async fn start(config: Arc<RuletaConfig>) -> anyhow::Result<()> {
    let state = AppState::new(config.clone())?;
    tracing::info!(
        "🎡 Roster: {} participant(s), history: {} entr(ies)",
        state.participants.list().len(),
        state.history.list().len()
    );

    let app = build_router(state);

    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("🌐 Ruleta listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::warn!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
