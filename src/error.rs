//! Error types for the pagination engine
//!
//! Provides unified error handling using thiserror. Cache and windowing
//! operations are total and never produce these; they originate from the
//! collaborators (file access, parser) and from host-facing lookups.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Parse Error ==
/// Failure reported by a workbook parser, carrying a human-readable cause.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{cause}")]
pub struct ParseError {
    pub cause: String,
}

impl ParseError {
    pub fn new(cause: impl Into<String>) -> Self {
        Self {
            cause: cause.into(),
        }
    }
}

// == Viewer Error Enum ==
/// Unified error type for document loading and page serving.
///
/// `Clone` so that one load outcome can be handed to every caller that
/// joined the same in-flight load.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewerError {
    /// The parser rejected the document; not retried automatically
    #[error("Failed to parse workbook: {0}")]
    ParseFailure(String),

    /// Reading or stating the document failed
    #[error("I/O error: {0}")]
    Io(String),

    /// The workbook was parsed but contains no sheets
    #[error("No sheets or tables found in {0}")]
    NoSheets(String),

    /// Requested sheet does not exist in the workbook
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// Page requested for a document that was never opened (or was closed)
    #[error("Document not open: {0}")]
    DocumentNotOpen(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal error (background task failure)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ParseError> for ViewerError {
    fn from(err: ParseError) -> Self {
        ViewerError::ParseFailure(err.cause)
    }
}

impl From<std::io::Error> for ViewerError {
    fn from(err: std::io::Error) -> Self {
        ViewerError::Io(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ViewerError {
    fn from(err: tokio::task::JoinError) -> Self {
        ViewerError::Internal(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ViewerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ViewerError::ParseFailure(_) | ViewerError::NoSheets(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ViewerError::SheetNotFound(_) | ViewerError::DocumentNotOpen(_) => {
                StatusCode::NOT_FOUND
            }
            ViewerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ViewerError::Io(_) | ViewerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the pagination engine.
pub type Result<T> = std::result::Result<T, ViewerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_converts_verbatim() {
        let err: ViewerError = ParseError::new("truncated zip archive").into();
        assert_eq!(
            err,
            ViewerError::ParseFailure("truncated zip archive".to_string())
        );
        assert!(err.to_string().contains("truncated zip archive"));
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (ViewerError::ParseFailure("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (ViewerError::NoSheets("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (ViewerError::SheetNotFound("x".into()), StatusCode::NOT_FOUND),
            (ViewerError::DocumentNotOpen("x".into()), StatusCode::NOT_FOUND),
            (ViewerError::InvalidRequest("x".into()), StatusCode::BAD_REQUEST),
            (ViewerError::Io("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
