//! Submission form page and its POST handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use validator::Validate;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::validation::no_nul_bytes;

/// Template for the submission form.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
struct HomeTemplate {}

/// Form body posted by `templates/home.html`.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitForm {
    /// The long URL, taken verbatim.
    #[validate(
        length(min = 1, message = "URL must not be empty"),
        custom(function = "no_nul_bytes")
    )]
    pub name: String,
}

/// Renders the submission form.
///
/// # Endpoint
///
/// `GET /`
pub async fn home_handler() -> impl IntoResponse {
    HomeTemplate {}
}

/// Shortens the submitted URL and redirects to its display page.
///
/// # Endpoint
///
/// `POST /` with form field `name`
///
/// Resubmitting a known URL redirects to the existing key.
///
/// # Errors
///
/// Returns 400 Bad Request if `name` is empty.
/// Returns 500 if no unused short key could be found.
/// Returns 503 if the store is unavailable.
pub async fn submit_handler(
    State(state): State<AppState>,
    Form(form): Form<SubmitForm>,
) -> Result<Redirect, AppError> {
    form.validate()?;

    let mapping = state.mapping_service.submit(&form.name).await?;

    Ok(Redirect::to(&format!("/display/{}", mapping.short)))
}
