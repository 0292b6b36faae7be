//! DTOs for the JSON shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::validation::no_nul_bytes;

/// Request to shorten a single URL.
///
/// The URL is stored exactly as given; only emptiness is rejected.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[validate(
        length(min = 1, message = "URL must not be empty"),
        custom(function = "no_nul_bytes")
    )]
    pub url: String,
}

/// Result of a shortening request.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub long_url: String,
    pub short: String,
    pub short_url: String,
}
