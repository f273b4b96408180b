pub mod icons;
pub mod server;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::state::AppState;

/// API routes (without middleware layers) / API 路由
pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(server::health_check))
        .route("/api/icons/search", get(icons::search_icons))
        .route("/api/icons/import-selfhst", post(icons::import_selfhst))
        .route("/api/icons/import-iconify", post(icons::import_iconify))
        .with_state(state)
}
