//! Session report handler: summarize a chat transcript as a Cognitive Journey Report.

use super::error_response;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cogniflux_core::{report_prompt, ChatTurn, GenerationRequest};
use serde::Deserialize;

pub const EMPTY_HISTORY_REPORT: &str = "No conversation history to analyze.";

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub messages: Option<Vec<ChatTurn>>,
}

/// POST /api/report
pub async fn report(State(state): State<AppState>, body: Bytes) -> Response {
    let req: ReportRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(target: "cogniflux::report", "Malformed report request: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate report");
        }
    };

    let messages = match req.messages {
        Some(m) if !m.is_empty() => m,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "report": EMPTY_HISTORY_REPORT })),
            )
                .into_response()
        }
    };

    tracing::info!(target: "cogniflux::report", turns = messages.len(), "Generating session report");
    let request = GenerationRequest::text(state.config.report_model.as_str(), report_prompt(&messages));
    match state.llm.generate(request).await {
        Ok(report) => Json(serde_json::json!({ "report": report })).into_response(),
        Err(e) => {
            tracing::error!(target: "cogniflux::report", "Report generation error: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate report")
        }
    }
}
