//! Error types for the PDF split server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
///
/// Every failure in the request flow is mapped to one of these variants at
/// the handler boundary and rendered as a JSON error response.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to fetch source PDF: {0}")]
    UpstreamFetch(String),

    #[error("Failed to split PDF: {0}")]
    Split(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::InvalidInput(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_input", msg.clone())
            }
            AppError::UpstreamFetch(msg) => {
                (StatusCode::BAD_REQUEST, "upstream_fetch_failed", msg.clone())
            }
            AppError::Split(msg) => (StatusCode::BAD_REQUEST, "split_failed", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::Io(e) => {
                tracing::error!("IO error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "io_error",
                    "Storage error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                AppError::InvalidInput("bad".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::UpstreamFetch("down".into()),
                StatusCode::BAD_REQUEST,
            ),
            (AppError::Split("garbled".into()), StatusCode::BAD_REQUEST),
            (AppError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (
                AppError::Io(std::io::Error::other("disk")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
