use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use pulseboard_core::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `pulseboard-core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // The cascade-failure variant carries structured payload the
        // caller needs for cleanup, so it builds its own body.
        if let AppError::Core(CoreError::PartialCascadeFailure {
            project_id,
            failed_task_ids,
        }) = &self
        {
            let body = json!({
                "error": self.to_string(),
                "code": "PARTIAL_CASCADE_FAILURE",
                "project_id": project_id,
                "failed_task_ids": failed_task_ids,
            });
            return (StatusCode::MULTI_STATUS, axum::Json(body)).into_response();
        }

        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotAuthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "NOT_AUTHORIZED", msg.clone())
                }
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::StoreUnavailable(msg) => {
                    tracing::error!(error = %msg, "store unavailable");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "STORE_UNAVAILABLE",
                        "The data store is temporarily unavailable".to_string(),
                    )
                }
                CoreError::PartialCascadeFailure { .. } => unreachable!("handled above"),
            },

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
