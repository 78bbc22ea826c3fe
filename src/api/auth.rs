use axum::{extract::FromRequestParts, http::request::Parts};

use crate::api::{AppState, error::ApiError};

/// The header carrying the add-recipe secret.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Proof that the request carried the configured API key.
///
/// Extracting this rejects the request with `403 Forbidden` when the header is
/// missing, differs from the configured secret, or no secret is configured.
#[derive(Debug, Clone, Copy)]
pub struct ApiKey;

impl FromRequestParts<AppState> for ApiKey {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(provided) = parts.headers.get(API_KEY_HEADER) else {
            tracing::debug!("Rejected request without an API key");
            return Err(ApiError::Forbidden("API Key missing"));
        };

        match state.api_key() {
            Some(expected) if provided.as_bytes() == expected.as_bytes() => Ok(Self),
            Some(_) => {
                tracing::warn!("Rejected request with an invalid API key");
                Err(ApiError::Forbidden("Invalid API Key"))
            }
            None => {
                tracing::warn!("Rejected request: no API key is configured");
                Err(ApiError::Forbidden("Invalid API Key"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{Request, StatusCode};
    use tempfile::TempDir;

    use super::*;
    use crate::Directory;

    fn state(api_key: Option<&str>) -> (TempDir, AppState) {
        let tmp = TempDir::new().unwrap();
        let store = Directory::open(tmp.path().to_path_buf()).unwrap();
        (tmp, AppState::new(store, api_key.map(str::to_string)))
    }

    async fn extract(state: &AppState, key: Option<&str>) -> Result<ApiKey, ApiError> {
        let mut builder = Request::builder().uri("/cocktails/");
        if let Some(key) = key {
            builder = builder.header("X-API-Key", key);
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();
        ApiKey::from_request_parts(&mut parts, state).await
    }

    #[tokio::test]
    async fn matching_key_is_accepted() {
        let (_tmp, state) = state(Some("s3cret"));
        assert!(extract(&state, Some("s3cret")).await.is_ok());
    }

    #[tokio::test]
    async fn missing_key_is_forbidden() {
        let (_tmp, state) = state(Some("s3cret"));
        let error = extract(&state, None).await.unwrap_err();
        assert_eq!(error.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(error.to_string(), "API Key missing");
    }

    #[tokio::test]
    async fn comparison_is_exact() {
        let (_tmp, state) = state(Some("s3cret"));
        for wrong in ["S3CRET", "s3cret ", "s3cre", ""] {
            let error = extract(&state, Some(wrong)).await.unwrap_err();
            assert_eq!(error.to_string(), "Invalid API Key", "key {wrong:?}");
        }
    }

    #[tokio::test]
    async fn unconfigured_key_rejects_everything() {
        let (_tmp, state) = state(None);
        let error = extract(&state, Some("anything")).await.unwrap_err();
        assert_eq!(error.status_code(), StatusCode::FORBIDDEN);
    }
}
