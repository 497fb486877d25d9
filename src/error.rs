use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
};
use serde_json::json;
use axum::Json;
use polars::error::PolarsError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),
    #[error("File processing error: {0}")]
    FileProcessingError(String),
    #[error("DataFrame error: {0}")]
    DataFrameError(String),
    #[error("Page '{}' requires missing columns: {}", .page, .columns.join(", "))]
    MissingColumns { page: String, columns: Vec<String> },
    #[error("Session not found: {0}")]
    SessionNotFound(String),
    #[error("Unknown page: {0}")]
    UnknownPage(String),
    #[error("Page '{0}' has no download")]
    DownloadUnavailable(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<PolarsError> for AppError {
    fn from(err: PolarsError) -> Self {
        AppError::DataFrameError(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::FileProcessingError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::DataFrameError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::MissingColumns { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            AppError::UnknownPage(_) => StatusCode::NOT_FOUND,
            AppError::DownloadUnavailable(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("{}", self);
        }

        let body = match &self {
            AppError::MissingColumns { page, columns } => Json(json!({
                "error": self.to_string(),
                "page": page,
                "missing_columns": columns,
            })),
            _ => Json(json!({
                "error": self.to_string()
            })),
        };

        (status, body).into_response()
    }
}
