//! HTTP error handling and response types.
//!
//! Every failing request produces the same envelope, `{"error": "<message>"}`,
//! with a status of 400 or 404. Handlers only construct an [`AppError`]; the
//! `IntoResponse` impl below is the single point that formats the envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::repository::RepositoryError;

/// JSON body of any failed request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable error message
    #[schema(example = "title is required")]
    pub error: String,
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// A required field is missing or empty (400)
    Validation(String),
    /// No live record at the given id (404)
    NotFound(String),
    /// Storage layer failure, surfaced with the underlying message (400,
    /// or 404 when the repository itself reports not-found)
    Repository(RepositoryError),
}

impl AppError {
    /// Classify a repository error from a primary-key lookup, substituting
    /// the endpoint's fixed not-found message.
    pub fn lookup(err: RepositoryError, not_found_message: &str) -> Self {
        if matches!(err, RepositoryError::NotFound { .. }) {
            AppError::NotFound(not_found_message.to_string())
        } else {
            AppError::Repository(err)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Repository(err) => {
                // No transient/permanent distinction at this layer: anything
                // the storage collaborator rejects is a client-visible 400.
                let status = if matches!(err, RepositoryError::NotFound { .. }) {
                    StatusCode::NOT_FOUND
                } else {
                    StatusCode::BAD_REQUEST
                };
                (status, err.to_string())
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}
