use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::StoreError;

/// An error reported to an HTTP client.
///
/// Every variant renders as a JSON body of the form `{"detail": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested recipe, or any recipe matching a search, doesn't exist.
    #[error("{0}")]
    NotFound(String),

    /// A recipe with the submitted name already exists.
    #[error("{0}")]
    Conflict(String),

    /// The request lacked a valid API key.
    #[error("{0}")]
    Forbidden(&'static str),

    /// The request could not be understood.
    #[error("{detail}")]
    Invalid {
        /// The status reported to the client.
        status: StatusCode,
        /// What was wrong with the request.
        detail: String,
    },

    /// Anything else, such as an unreadable recipe file.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Converts a store error, prefixing unexpected failures with `context`.
    #[must_use]
    pub fn from_store(error: StoreError, context: &str) -> Self {
        match error {
            StoreError::NotFound(_) | StoreError::NoMatches(_) => Self::NotFound(error.to_string()),
            StoreError::Conflict(_) => Self::Conflict(error.to_string()),
            StoreError::InvalidName(_) | StoreError::EmptyQuery(_) => Self::Invalid {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                detail: error.to_string(),
            },
            StoreError::Directory { .. } | StoreError::Load { .. } | StoreError::Save { .. } => {
                Self::internal(context, error)
            }
        }
    }

    /// An internal error described as `"{context}: {error}"`.
    #[must_use]
    pub fn internal(context: &str, error: impl std::fmt::Display) -> Self {
        Self::Internal(format!("{context}: {error}"))
    }

    /// Returns the HTTP status code for this error.
    ///
    /// - Not found: 404
    /// - Conflict: 409
    /// - Forbidden: 403
    /// - Invalid: whatever the rejection called for, usually 422
    /// - Internal: 500
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Invalid { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Invalid {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Invalid {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{self}");
        }
        let body = ErrorBody {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use axum::body::to_bytes;

    use super::*;
    use crate::{
        Term,
        storage::{Criterion, LoadError},
    };

    #[test]
    fn store_errors_map_to_status_codes() {
        let cases = [
            (
                StoreError::NotFound("Zombie".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                StoreError::NoMatches(Criterion::Glass(Term::new("tiki").unwrap())),
                StatusCode::NOT_FOUND,
            ),
            (
                StoreError::Conflict("Mojito".to_string()),
                StatusCode::CONFLICT,
            ),
            (
                StoreError::EmptyQuery(crate::domain::EmptyQuery),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                StoreError::Load {
                    path: PathBuf::from("data/Broken.json"),
                    source: LoadError::NotFound,
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(ApiError::from_store(error, "context").status_code(), expected);
        }
    }

    #[test]
    fn internal_errors_carry_context() {
        let error = ApiError::from_store(
            StoreError::Load {
                path: PathBuf::from("data/Broken.json"),
                source: LoadError::NotFound,
            },
            "Error listing cocktails",
        );
        assert_eq!(
            error.to_string(),
            "Error listing cocktails: failed to load data/Broken.json: file not found"
        );
    }

    #[test]
    fn not_found_keeps_the_store_message() {
        let error = ApiError::from_store(StoreError::NotFound("Zombie".to_string()), "ignored");
        assert_eq!(error.to_string(), "Cocktail Zombie not found");
    }

    #[tokio::test]
    async fn responses_carry_a_detail_field() {
        let response = ApiError::Conflict("Cocktail Mojito already exists".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"detail": "Cocktail Mojito already exists"})
        );
    }
}
