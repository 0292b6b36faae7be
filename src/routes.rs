//! Top-level router configuration combining page and API routes.
//!
//! # Route Structure
//!
//! - `GET  /`              - Submission form
//! - `POST /`              - Submit a long URL
//! - `GET  /display/{key}` - Show a short key
//! - `GET  /health`        - Health check: storage, cache
//! - `POST /api/shorten`   - JSON shortening
//! - `GET  /{short_url}`   - Short key redirect
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use crate::web;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the router with all routes and the tracing layer.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(web::routes::routes())
        .route("/health", get(health_handler))
        .nest("/api", api::routes::routes())
        .route("/{short_url}", get(redirect_handler))
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application service: [`router`] wrapped in trailing-slash
/// normalization, so `/aZbQk/` resolves like `/aZbQk`.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
