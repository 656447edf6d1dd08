use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Errors surfaced by the HTTP handlers.
///
/// Every variant is terminal for the request that produced it.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed client input.
    #[error("{0}")]
    Validation(String),

    /// The upstream search API failed (transport, status, or body).
    #[error("upstream search failed: {0:#}")]
    Upstream(anyhow::Error),

    /// The history store failed.
    #[error("storage failure: {0}")]
    Storage(#[from] sqlx::Error),
}

impl ApiError {
    pub fn missing(what: &str) -> Self {
        Self::Validation(format!("{what} is required"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) | Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message returned to the client. Internal causes stay in the logs.
    fn public_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::Upstream(_) => "Failed to fetch results from GitHub".to_string(),
            Self::Storage(_) => "Failed to access search history".to_string(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Validation(msg) => tracing::debug!("Rejected request: {msg}"),
            Self::Upstream(e) => tracing::error!("Error fetching from GitHub: {e:#}"),
            Self::Storage(e) => tracing::error!("History store error: {e}"),
        }
        let body = ErrorBody {
            error: self.public_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}
