//! Application error type mapping to HTTP status codes.

use axum::extract::rejection::{FormRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use hashstat_types::error::RepositoryError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Entry store errors.
    Repository(RepositoryError),
    /// Malformed request input.
    Validation(String),
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        AppError::Repository(e)
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Repository(RepositoryError::NotFound(id)) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", format!("Entry {id} not found"))
            }
            AppError::Repository(RepositoryError::AlreadyFinalized(id)) => (
                StatusCode::CONFLICT,
                "ALREADY_FINALIZED",
                format!("Entry {id} is already finalized"),
            ),
            AppError::Repository(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", e.to_string())
            }
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
            tracing::error!(code, error = %message, "request failed");
        }

        let body = json!({
            "errors": [{
                "code": code,
                "message": message,
            }],
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashstat_types::entry::EntryId;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::from(RepositoryError::NotFound(EntryId(1))), StatusCode::NOT_FOUND),
            (
                AppError::from(RepositoryError::AlreadyFinalized(EntryId(1))),
                StatusCode::CONFLICT,
            ),
            (
                AppError::from(RepositoryError::Storage("locked".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (AppError::Validation("bad".to_string()), StatusCode::BAD_REQUEST),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
