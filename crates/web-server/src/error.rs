use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use core_types::CoreError;
use database::DbError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or missing caller input. Always a 400.
    #[error("Invalid request: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Converts our custom `AppError` into an HTTP response.
///
/// Store failures are logged here and replaced by a generic message so no
/// SQL or connection detail reaches the client.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(message) => {
                tracing::debug!(%message, "Rejected request.");
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::Database(DbError::NotFound) => {
                (StatusCode::NOT_FOUND, "Resource not found".to_string())
            }
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal database error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
