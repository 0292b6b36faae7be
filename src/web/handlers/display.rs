//! Short key display page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use crate::state::AppState;

/// Template showing a short key and its public URL.
#[derive(Template, WebTemplate)]
#[template(path = "display.html")]
struct DisplayTemplate {
    short_key: String,
    short_url: String,
}

/// Renders the page for a short key.
///
/// # Endpoint
///
/// `GET /display/{key}`
///
/// Pure templating: the key is not looked up.
pub async fn display_handler(
    Path(key): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    DisplayTemplate {
        short_url: state.short_url(&key),
        short_key: key,
    }
}
