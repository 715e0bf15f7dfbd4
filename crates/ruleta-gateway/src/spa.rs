//! Prebuilt frontend serving with client-side routing fallback.

use axum::{
    Json, Router,
    extract::State,
    response::{Html, IntoResponse, Response},
};
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;

use super::server::AppState;

const FRONTEND_NOT_FOUND: &str =
    "Frontend build not found. Please run 'npm run build' in the frontend folder.";

/// Mount `<frontend_dir>/assets` at `/assets` when the directory exists.
pub fn with_assets(router: Router<Arc<AppState>>, frontend_dir: &Path) -> Router<Arc<AppState>> {
    let assets = frontend_dir.join("assets");
    if assets.is_dir() {
        tracing::info!("📦 Serving assets from {}", assets.display());
        router.nest_service("/assets", ServeDir::new(assets))
    } else {
        tracing::info!("No assets directory at {}", assets.display());
        router
    }
}

/// Serve `index.html` for any non-API path, or a JSON error if the build is missing.
pub async fn serve_index(State(state): State<Arc<AppState>>) -> Response {
    let index = Path::new(&state.config.gateway.frontend_dir).join("index.html");
    match tokio::fs::read_to_string(&index).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::debug!("index.html unavailable at {}: {e}", index.display());
            Json(serde_json::json!({ "error": FRONTEND_NOT_FOUND })).into_response()
        }
    }
}
