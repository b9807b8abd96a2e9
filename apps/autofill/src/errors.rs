use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::backend_client::BackendError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "A bearer token is required when no profile is supplied".to_string(),
            ),
            AppError::Backend(BackendError::Api { status, message }) if *status == 401 => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message.clone())
            }
            AppError::Backend(e) => {
                tracing::error!("Backend error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "BACKEND_ERROR",
                    "The profile backend could not be reached".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let response = AppError::Validation("html is required".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_backend_unauthorized_passes_through() {
        let err = AppError::Backend(BackendError::Api {
            status: 401,
            message: "Unauthorized".to_string(),
        });
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_unauthorized_and_not_found_statuses() {
        assert_eq!(
            AppError::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::NotFound("/nope".to_string()).into_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_backend_failure_maps_to_bad_gateway() {
        let err = AppError::Backend(BackendError::Api {
            status: 503,
            message: "down".to_string(),
        });
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
