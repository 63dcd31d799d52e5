//! HTTP handlers. Each one degrades to a fixed JSON shape instead of surfacing internal errors.

pub mod chat;
pub mod report;
pub mod speak;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// `{"error": msg}` with the given status.
pub(crate) fn error_response(status: StatusCode, msg: &str) -> Response {
    (status, Json(serde_json::json!({ "error": msg }))).into_response()
}
