use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::dto::ErrorResponse;
use crate::storage::StorageError;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    InternalError(String),
    StoreError(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not Found", Some(msg)),
            ApiError::InternalError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                Some(msg),
            ),
            ApiError::StoreError(err) => {
                // Damaged documents need an operator, not a retry.
                if let Some(StorageError::Corrupt { path, .. }) = err.downcast_ref::<StorageError>()
                {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Corrupt Model State",
                        Some(format!("Stored document {path} could not be read")),
                    )
                } else {
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "Store Unavailable",
                        Some(err.to_string()),
                    )
                }
            }
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            details,
        });

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::StoreError(err)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_api_error_not_found() {
        let error = ApiError::NotFound("Relation 3 not found".to_string());
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        let error_response: ErrorResponse = serde_json::from_slice(&body).unwrap();

        assert_eq!(error_response.error, "Not Found");
        assert_eq!(
            error_response.details,
            Some("Relation 3 not found".to_string())
        );
    }

    #[tokio::test]
    async fn test_api_error_internal() {
        let error = ApiError::InternalError("bundled payload broken".to_string());
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_store_error_is_retryable() {
        let error = ApiError::StoreError(anyhow::anyhow!("connection reset"));
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        let error_response: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error_response.error, "Store Unavailable");
    }

    #[tokio::test]
    async fn test_corrupt_store_error_conversion() {
        let storage_err = StorageError::Corrupt {
            path: "state/stored.json".to_string(),
            reason: "expected value".to_string(),
        };
        let error = ApiError::StoreError(anyhow::Error::new(storage_err));
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        let error_response: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error_response.error, "Corrupt Model State");
    }

    #[test]
    fn test_from_anyhow_error() {
        let anyhow_err = anyhow::anyhow!("Some error");
        let api_err: ApiError = anyhow_err.into();

        match api_err {
            ApiError::StoreError(_) => {} // Expected
            _ => panic!("Expected StoreError variant"),
        }
    }
}
