//! HTTP route definitions

pub mod files;
pub mod health;
pub mod split;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health::health_check))
        .route("/health", get(health::health_check))
        .merge(split::router())
        .nest("/files", files::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
