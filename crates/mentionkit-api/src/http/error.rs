//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use mentionkit_types::error::{ChatError, RepositoryError};

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// No entity registered under the id.
    EntityNotFound(String),
    /// Thread storage errors.
    Repository(RepositoryError),
    /// Validation error.
    Validation(String),
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        AppError::Repository(e)
    }
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::EmptyMessage => AppError::Validation(e.to_string()),
            ChatError::Repository(e) => AppError::Repository(e),
        }
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::EntityNotFound(id) => (
                StatusCode::NOT_FOUND,
                "ENTITY_NOT_FOUND",
                format!("Entity '{id}' not found"),
            ),
            AppError::Repository(RepositoryError::NotFound) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Thread not found".to_string(),
            ),
            AppError::Repository(RepositoryError::Conflict(msg)) => {
                (StatusCode::CONFLICT, "CONFLICT", msg.clone())
            }
            AppError::Repository(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                e.to_string(),
            ),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            tracing::error!(code, "{message}");
        }

        let mut response = ApiResponse::<()>::failure(code, message).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::EntityNotFound("x".into()).parts().0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(RepositoryError::NotFound).parts().0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(RepositoryError::Conflict("taken".into())).parts().0,
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(RepositoryError::Query("boom".into())).parts().1,
            "STORAGE_ERROR"
        );
        assert_eq!(
            AppError::Validation("bad".into()).parts().0,
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_chat_error_mapping() {
        let (status, code, _) = AppError::from(ChatError::EmptyMessage).parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "VALIDATION_ERROR");
        assert_eq!(
            AppError::from(ChatError::Repository(RepositoryError::NotFound)).parts().0,
            StatusCode::NOT_FOUND
        );
    }
}
