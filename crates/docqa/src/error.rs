//! Error types for the document Q&A system

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Result type alias for document Q&A operations
pub type Result<T> = std::result::Result<T, Error>;

/// Document Q&A errors
///
/// Empty retrieval and ungrounded answers are not errors: they resolve to
/// fixed answer texts inside the question pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Question refused before reaching the router (safety or empty question)
    #[error("{0}")]
    InputRejected(String),

    /// Question submitted while the session has no active document
    #[error("Please upload a PDF file first before asking questions.")]
    NoDocumentLoaded,

    /// Neither primary extraction nor OCR produced usable text
    #[error("Could not read document: {0}")]
    DocumentUnreadable(String),

    /// Unsupported file type
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Language model transport, auth or timeout failure
    #[error("Language model call failed: {0}")]
    ModelCall(String),

    /// Embedding error
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Vector index error
    #[error("Vector index error: {0}")]
    VectorDb(String),

    /// Unknown session id
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an input rejection
    pub fn input_rejected(message: impl Into<String>) -> Self {
        Self::InputRejected(message.into())
    }

    /// Create an unreadable document error
    pub fn unreadable(message: impl Into<String>) -> Self {
        Self::DocumentUnreadable(message.into())
    }

    /// Create a model call error
    pub fn model_call(message: impl Into<String>) -> Self {
        Self::ModelCall(message.into())
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Whether the user can retry the same request later
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ModelCall(_) | Self::Http(_))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Config(msg) => (StatusCode::BAD_REQUEST, "config_error", msg.clone()),
            Error::InputRejected(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "input_rejected", msg.clone())
            }
            Error::NoDocumentLoaded => (
                StatusCode::CONFLICT,
                "no_document_loaded",
                self.to_string(),
            ),
            Error::DocumentUnreadable(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "document_unreadable",
                msg.clone(),
            ),
            Error::UnsupportedFileType(ext) => (
                StatusCode::BAD_REQUEST,
                "unsupported_type",
                format!("Unsupported file type: {}", ext),
            ),
            Error::ModelCall(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "model_call_failed",
                format!(
                    "I encountered an error while processing your question: {}. \
                     Please try rephrasing your question or upload a new document.",
                    msg
                ),
            ),
            Error::Embedding(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "embedding_error", msg.clone())
            }
            Error::VectorDb(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "vector_db_error", msg.clone())
            }
            Error::SessionNotFound(id) => (
                StatusCode::NOT_FOUND,
                "session_not_found",
                format!("Session not found: {}", id),
            ),
            Error::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                err.to_string(),
            ),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "json_error", err.to_string()),
            Error::Http(err) => (StatusCode::BAD_GATEWAY, "http_error", err.to_string()),
            Error::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
                "recoverable": self.is_recoverable(),
            }
        }));

        (status, body).into_response()
    }
}
