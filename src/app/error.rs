use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::Error as SqlxError;

/// Application error type for unified error handling across the app.
///
/// Each variant maps 1:1 to a response status; the authorization guard
/// produces these and handlers propagate them with `?`.
#[derive(Debug)]
pub enum AppError {
    /// Validation errors (400 Bad Request) - malformed input or role/permission symbol
    Validation(String),

    /// No or invalid identity reference (401 Unauthorized)
    Unauthenticated,

    /// Identity valid but scope/rank insufficient, or a protection rule fired (403 Forbidden)
    Unauthorized(String),

    /// Missing resource or cross-tenant mismatch (404 Not Found)
    NotFound,

    /// Concurrent mutation lost the optimistic check (409 Conflict)
    Conflict(String),

    /// Database errors (500 Internal Server Error)
    Database(SqlxError),

    /// Generic internal errors (500 Internal Server Error)
    Internal,
}

impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl AppError {
    /// Machine-readable reason code carried on every denial response.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::Unauthenticated => "unauthenticated",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::NotFound => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::Database(_) | AppError::Internal => "internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthenticated => (StatusCode::UNAUTHORIZED, "Unauthenticated".to_string()),
            AppError::Unauthorized(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Database(err) => {
                // Driver detail stays in the log, keyed by a correlation id.
                let correlation_id = ulid::Ulid::new().to_string();
                tracing::error!(%correlation_id, %err, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Internal server error ({})", correlation_id),
                )
            }
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": message,
            "code": code
        }));

        (status, body).into_response()
    }
}
