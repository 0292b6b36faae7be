//! Handler for the JSON shortening endpoint.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates (or returns the existing) short key for a long URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/a" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "long_url": "https://example.com/a",
///   "short": "aZbQk",
///   "short_url": "https://s.example.com/aZbQk"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if `url` is empty.
/// Returns 500 if no unused short key could be found.
/// Returns 503 if the store is unavailable.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    payload.validate()?;

    let mapping = state.mapping_service.submit(&payload.url).await?;
    let short_url = state.short_url(&mapping.short);

    Ok(Json(ShortenResponse {
        long_url: mapping.long,
        short: mapping.short,
        short_url,
    }))
}
