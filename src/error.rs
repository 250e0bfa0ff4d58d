use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate webhook id: {0}")]
    DuplicateId(uuid::Uuid),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(sqlx::Error),

    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    #[error("No webhooks selected")]
    EmptySelection,

    #[error("None of the selected webhooks exist")]
    NoMatchingRecords,

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Stable machine-readable name sent alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Config(_) => "config",
            Error::BadRequest(_) | Error::Json(_) => "bad_request",
            Error::NotFound(_) => "not_found",
            Error::DuplicateId(_) => "duplicate_id",
            Error::StoreUnavailable(_) => "store_unavailable",
            Error::CaptureFailed(_) => "capture_failed",
            Error::EmptySelection => "empty_selection",
            Error::NoMatchingRecords => "no_matching_records",
            Error::GenerationFailed(_) => "generation_failed",
            Error::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let code = self.code();
        let (status, error_message) = match &self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Error::DuplicateId(_) => (StatusCode::CONFLICT, self.to_string()),
            Error::StoreUnavailable(err) => {
                tracing::error!(error = ?err, "store unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Webhook store is unavailable".to_string(),
                )
            }
            Error::CaptureFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            Error::EmptySelection => (StatusCode::BAD_REQUEST, self.to_string()),
            Error::NoMatchingRecords => (StatusCode::NOT_FOUND, self.to_string()),
            Error::GenerationFailed(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            Error::Json(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Config(_) | Error::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
            ),
        };

        let body = Json(json!({ "error": error_message, "code": code }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Webhook not found".to_string()),
            other => Error::StoreUnavailable(other),
        }
    }
}
