//! Application error type mapping to HTTP status codes.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Application-level error that maps to HTTP responses.
///
/// Bodies use the `{"detail": "..."}` shape webhook senders expect.
#[derive(Debug)]
pub enum AppError {
    /// `X-Notion-Signature` missing or wrong.
    InvalidSignature,
    /// Body could not be decoded.
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::InvalidSignature => (StatusCode::UNAUTHORIZED, "Invalid signature".to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
