//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::short_key::ShortKey;
use crate::error::AppError;
use crate::state::AppState;
use crate::web::handlers::not_found_page;

/// Redirects a short key to its long URL.
///
/// # Endpoint
///
/// `GET /{short_url}`
///
/// # Request Flow
///
/// 1. Anything that is not 5 ASCII letters cannot be a key: 404
/// 2. Check the cache
/// 3. On cache miss or cache error, query the store
/// 4. On a store hit, asynchronously populate the cache
/// 5. Return 307 Temporary Redirect
///
/// # Errors
///
/// Unknown keys render the "URL does not exist" page with 404; that is a
/// normal outcome, not an error. Returns 503 if the store is unavailable.
pub async fn redirect_handler(
    Path(short_url): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let Ok(key) = short_url.parse::<ShortKey>() else {
        debug!("Malformed short key {:?}", short_url);
        return Ok(not_found_page(short_url));
    };

    match state.cache.get_url(key.as_str()).await {
        Ok(Some(long_url)) => return temporary_redirect(&long_url),
        Ok(None) => {}
        Err(e) => warn!("Cache lookup failed, falling back to store: {}", e),
    }

    let Some(mapping) = state.mapping_service.resolve(key.as_str()).await? else {
        return Ok(not_found_page(short_url));
    };

    // Asynchronously update cache (fire-and-forget)
    let cache = state.cache.clone();
    let long_url = mapping.long.clone();
    tokio::spawn(async move {
        if let Err(e) = cache.set_url(key.as_str(), &long_url).await {
            warn!("Failed to cache URL: {}", e);
        }
    });

    temporary_redirect(&mapping.long)
}

/// Builds a 307 response pointing at `long_url`.
///
/// Long URLs are stored verbatim, so one containing control characters cannot
/// be sent as a header.
fn temporary_redirect(long_url: &str) -> Result<Response, AppError> {
    let location = HeaderValue::from_str(long_url).map_err(|_| {
        AppError::internal(
            "Stored URL cannot be used as a redirect target",
            json!({ "long_url": long_url }),
        )
    })?;

    Ok((StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, location)]).into_response())
}
