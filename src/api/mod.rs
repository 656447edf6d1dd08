//! Axum handlers and router.

pub mod health;
pub mod history;
pub mod search;

use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::state::AppState;

/// Build the router with every endpoint, permissive CORS and request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/search", get(search::search))
        .route("/save-search", post(history::save_search))
        .route("/selected-repo", post(history::save_selected_repo))
        .route("/search-history", get(history::search_history))
        .route("/selected-repo-history", get(history::selected_repo_history))
        .route("/health", get(health::health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Unwrap query parameters, reporting parse failures as a JSON 400.
pub(crate) fn params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query
        .map(|Query(params)| params)
        .map_err(|e| ApiError::Validation(format!("Invalid query string: {}", e.body_text())))
}

/// Value of a required field, untouched; blank counts as missing.
pub(crate) fn required_raw(value: Option<String>, what: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::missing(what)),
    }
}

/// Trimmed value of a required field; empty counts as missing.
pub(crate) fn required(value: Option<String>, what: &str) -> Result<String, ApiError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ApiError::missing(what)),
    }
}
