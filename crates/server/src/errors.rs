use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::debug;

/// A custom error type for the server application.
///
/// Parsing is best-effort and store failures are reported as submission
/// outcomes, so only lookups of missing board items surface here.
#[derive(Debug)]
pub enum AppError {
    /// The request referred to something that does not exist.
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::NotFound(message) => {
                debug!("Not found: {}", message);
                (StatusCode::NOT_FOUND, message)
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
