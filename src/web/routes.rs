//! Page route configuration.

use crate::state::AppState;
use crate::web::handlers::{display_handler, home_handler, submit_handler};
use axum::{Router, routing::get};

/// HTML page routes.
///
/// # Endpoints
///
/// - `GET  /`              - Submission form
/// - `POST /`              - Submit a long URL (form field `name`)
/// - `GET  /display/{key}` - Show a short key
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home_handler).post(submit_handler))
        .route("/display/{key}", get(display_handler))
}
