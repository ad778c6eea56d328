use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use streetlight_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Only malformed trigger input ends up here. Push failures never do: they
/// are part of the dispatch result and still answer `200`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `streetlight_core`.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
