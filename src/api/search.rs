use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;

use crate::api::{params, required_raw};
use crate::error::ApiError;
use crate::models::{SearchParams, SearchResponse};
use crate::state::AppState;

/// GET /search?q= - Proxy a repository search to GitHub. `q` is forwarded as given.
pub async fn search(
    State(state): State<AppState>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let q = required_raw(params(query)?.q, "Search query")?;

    let results = state
        .github
        .search(&q)
        .await
        .map_err(ApiError::Upstream)?;

    tracing::info!("Search '{q}' returned {} results", results.len());

    Ok(Json(SearchResponse { results }))
}
