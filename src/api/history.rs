use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;

use crate::api::{params, required};
use crate::error::ApiError;
use crate::models::{
    HistoryParams, HistoryResponse, MessageResponse, RepoSummary, SaveSearchRequest,
    SearchQueryRecord, SelectedRepoRecord, SelectedRepoRequest, SelectedRepoResponse,
};
use crate::state::AppState;

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| ApiError::Validation(format!("Invalid request body: {}", e.body_text())))
}

/// POST /save-search - Remember a search query for an email
pub async fn save_search(
    State(state): State<AppState>,
    payload: Result<Json<SaveSearchRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let req = body(payload)?;
    let email = required(req.email, "email")?;
    let query = required(req.query, "query")?;

    state.store.save_search(&email, &query).await?;
    tracing::info!("Saved search '{query}' for {email}");

    Ok(Json(MessageResponse {
        message: "Search query saved".to_string(),
    }))
}

/// POST /selected-repo - Remember a repo picked from the results
pub async fn save_selected_repo(
    State(state): State<AppState>,
    payload: Result<Json<SelectedRepoRequest>, JsonRejection>,
) -> Result<Json<SelectedRepoResponse>, ApiError> {
    let req = body(payload)?;
    let email = required(req.email, "email")?;
    let repo = RepoSummary {
        name: required(req.name, "name")?,
        url: required(req.url, "url")?,
        description: req.description,
        star_count: req.stars,
    };

    state.store.save_selected_repo(&email, &repo).await?;
    tracing::info!("Saved selected repo {} for {email}", repo.url);

    Ok(Json(SelectedRepoResponse {
        message: "Repo successfully received".to_string(),
        repo,
    }))
}

/// GET /search-history?email= - Most recent searches, newest first
pub async fn search_history(
    State(state): State<AppState>,
    query: Result<Query<HistoryParams>, QueryRejection>,
) -> Result<Json<HistoryResponse<SearchQueryRecord>>, ApiError> {
    let email = required(params(query)?.email, "email")?;
    let history = state
        .store
        .recent_searches(&email, state.store.limit())
        .await?;
    Ok(Json(HistoryResponse { history }))
}

/// GET /selected-repo-history?email= - Most recent selected repos, newest first
pub async fn selected_repo_history(
    State(state): State<AppState>,
    query: Result<Query<HistoryParams>, QueryRejection>,
) -> Result<Json<HistoryResponse<SelectedRepoRecord>>, ApiError> {
    let email = required(params(query)?.email, "email")?;
    let history = state
        .store
        .recent_selected_repos(&email, state.store.limit())
        .await?;
    Ok(Json(HistoryResponse { history }))
}
