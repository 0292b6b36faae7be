//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Storage reachable
/// - **503 Service Unavailable**: Storage unreachable
///
/// The cache is reported but never fails the check: redirects fall back to
/// the store when it is down.
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "storage": { "status": "ok", "message": "Reachable, 42 mappings" },
///     "cache": { "status": "ok", "message": "redis" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let storage_check = check_storage(&state).await;
    let cache_check = check_cache(&state).await;

    let healthy = storage_check.is_ok();
    let status = if !healthy {
        "unhealthy"
    } else if cache_check.is_ok() {
        "healthy"
    } else {
        "degraded"
    };

    let response = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            storage: storage_check,
            cache: cache_check,
        },
    };

    if healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Checks storage connectivity and reports the mapping count.
async fn check_storage(state: &AppState) -> CheckStatus {
    if let Err(e) = state.mapping_service.check_storage().await {
        return CheckStatus::error(format!("Storage error: {}", e));
    }

    match state.mapping_service.count().await {
        Ok(count) => CheckStatus::ok(format!("Reachable, {} mappings", count)),
        Err(e) => CheckStatus::error(format!("Storage error: {}", e)),
    }
}

/// Checks cache connectivity.
async fn check_cache(state: &AppState) -> CheckStatus {
    let backend = state.cache.backend();
    if state.cache.health_check().await {
        CheckStatus::ok(backend)
    } else {
        CheckStatus::error(format!("{} unreachable", backend))
    }
}
