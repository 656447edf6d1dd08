use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reduced view of an upstream repository search hit.
///
/// Absent `description` / `stars` serialize as explicit `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoSummary {
    pub name: String,
    pub url: String,
    pub description: Option<String>,
    #[serde(rename = "stars")]
    pub star_count: Option<i64>,
}

/// A saved search query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQueryRecord {
    pub id: i64,
    pub email: String,
    pub query: String,
    pub timestamp: DateTime<Utc>,
}

/// A repository the user picked from the search results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedRepoRecord {
    pub id: i64,
    pub email: String,
    pub repo: RepoSummary,
    pub timestamp: DateTime<Utc>,
}

/// Query parameters for GET /search
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Query parameters for the history endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryParams {
    pub email: Option<String>,
}

/// Save-search request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveSearchRequest {
    pub email: Option<String>,
    pub query: Option<String>,
}

/// Selected-repo request. Accepts `stars` or `starCount`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectedRepoRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "starCount")]
    pub stars: Option<i64>,
}

/// Search response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<RepoSummary>,
}

/// Plain acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Acknowledgement of a selected repo, echoing what was stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedRepoResponse {
    pub message: String,
    pub repo: RepoSummary,
}

/// History listing, most recent first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse<T> {
    pub history: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_summary_uses_stars_on_the_wire() {
        let repo = RepoSummary {
            name: "tokio".to_string(),
            url: "https://github.com/tokio-rs/tokio".to_string(),
            description: None,
            star_count: Some(42),
        };
        let json = serde_json::to_value(&repo).unwrap();
        assert_eq!(json["stars"], 42);
        assert!(json["description"].is_null());
        assert!(json.get("star_count").is_none());
    }

    #[test]
    fn test_selected_repo_request_accepts_star_count_alias() {
        let req: SelectedRepoRequest = serde_json::from_str(
            r#"{"email":"a@x.com","name":"r","url":"http://x/r","starCount":7}"#,
        )
        .unwrap();
        assert_eq!(req.stars, Some(7));
        assert!(req.description.is_none());
    }
}
