//! "URL does not exist" page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
struct NotFoundTemplate {
    short_url: String,
}

/// Renders the page shown for an unknown short key, with status 404.
pub fn not_found_page(short_url: String) -> Response {
    (StatusCode::NOT_FOUND, NotFoundTemplate { short_url }).into_response()
}
