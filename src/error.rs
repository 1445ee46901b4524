//! Error types for the site cache service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == App Error Enum ==
/// Error type for the cache and draft HTTP surface.
#[derive(Error, Debug)]
pub enum AppError {
    /// Requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Persist Error Enum ==
/// Failure of a draft save, recorded by the persister rather than thrown.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistError {
    /// Form data could not be serialized
    #[error("Failed to serialize draft: {0}")]
    Serialize(String),

    /// The save operation itself failed (storage, validation)
    #[error("Draft save failed: {0}")]
    Save(String),

    /// The remote endpoint could not be reached
    #[error("Transport error: {0}")]
    Transport(String),

    /// The remote endpoint answered with a non-success status
    #[error("Draft save rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The remote endpoint answered 2xx with a body that is not a save receipt
    #[error("Invalid save response: {0}")]
    InvalidResponse(String),
}

impl From<AppError> for PersistError {
    fn from(err: AppError) -> Self {
        PersistError::Save(err.to_string())
    }
}

impl From<reqwest::Error> for PersistError {
    fn from(err: reqwest::Error) -> Self {
        PersistError::Transport(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the service.
pub type Result<T> = std::result::Result<T, AppError>;
