//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Failure reported by a store backend. The message is the backend's own text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Connectivity(String),
    #[error("{0}")]
    Unknown(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => StoreError::NotFound(e.to_string()),
            sqlx::Error::Database(db) => match db.code().as_deref() {
                // unique_violation, foreign_key_violation
                Some("23505") | Some("23503") => StoreError::Conflict(db.message().to_string()),
                _ => StoreError::Unknown(db.message().to_string()),
            },
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::Connectivity(e.to_string()),
            _ => StoreError::Unknown(e.to_string()),
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() || e.is_request() {
            StoreError::Connectivity(e.to_string())
        } else {
            StoreError::Unknown(e.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    PayloadTooLarge(String),
}

impl AppError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Store(StoreError::NotFound(_)) | AppError::NotFound(_) => {
                (StatusCode::NOT_FOUND, "not_found")
            }
            AppError::Store(StoreError::Conflict(_)) => (StatusCode::CONFLICT, "conflict"),
            AppError::Store(StoreError::Connectivity(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "store_unavailable")
            }
            AppError::Store(StoreError::Unknown(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "store_error")
            }
            AppError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large"),
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let mut message = self.to_string();
        if message.trim().is_empty() {
            message = status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string();
        }
        if status.is_server_error() {
            tracing::error!(code, error = %message, "request failed");
        } else {
            tracing::warn!(code, error = %message, "request rejected");
        }
        (status, Json(ErrorBody { error: message, code })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_distinct_codes() {
        let cases = [
            (StoreError::NotFound("x".into()), StatusCode::NOT_FOUND, "not_found"),
            (StoreError::Conflict("x".into()), StatusCode::CONFLICT, "conflict"),
            (
                StoreError::Connectivity("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_unavailable",
            ),
            (
                StoreError::Unknown("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_error",
            ),
        ];
        for (err, status, code) in cases {
            assert_eq!(AppError::Store(err).status_and_code(), (status, code));
        }
    }

    #[test]
    fn oversized_body_maps_to_413() {
        assert_eq!(
            AppError::PayloadTooLarge("length limit exceeded".into()).status_and_code(),
            (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large")
        );
    }

    #[test]
    fn empty_message_falls_back_to_reason() {
        let resp = AppError::Store(StoreError::Unknown(String::new())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn pool_timeout_is_connectivity() {
        assert!(matches!(
            StoreError::from(sqlx::Error::PoolTimedOut),
            StoreError::Connectivity(_)
        ));
    }
}
