//! Speech handler: persona voice + cognitive-state voice settings, audio returned as base64.

use super::error_response;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cogniflux_core::Persona;
use cogniflux_voice::{encode_audio, SpeechRequest, SpokenState, VoiceError, VoiceSettings};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SpeakRequest {
    #[serde(default)]
    pub text: Option<String>,
    /// Cognitive state from the last chat reply. Each field is read on its own.
    #[serde(default)]
    pub memory: Option<serde_json::Value>,
    #[serde(default)]
    pub persona: Option<String>,
}

/// POST /api/speak
pub async fn speak(State(state): State<AppState>, body: Bytes) -> Response {
    let req: SpeakRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(target: "cogniflux::voice", "Malformed speak request: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
        }
    };

    let text = match req.text {
        Some(t) if !t.is_empty() => t,
        _ => return error_response(StatusCode::BAD_REQUEST, "Text is required"),
    };

    let Some(tts) = state.tts.as_ref() else {
        tracing::warn!(target: "cogniflux::voice", "ELEVENLABS_API_KEY not found in environment variables");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "API Key missing");
    };

    let memory = req.memory.as_ref().map(SpokenState::from_value);
    let persona = Persona::from_optional(req.persona.as_deref());
    let request = SpeechRequest {
        text,
        voice_id: persona.voice_id().to_string(),
        settings: VoiceSettings::for_state(memory.as_ref()),
    };

    match tts.synthesize(&request).await {
        Ok(audio) => Json(serde_json::json!({ "audio": encode_audio(&audio) })).into_response(),
        Err(VoiceError::Upstream { status, body }) => {
            tracing::error!(target: "cogniflux::voice", status, "TTS API error: {}", body);
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            error_response(status, "Failed to generate speech")
        }
        Err(e) => {
            tracing::error!(target: "cogniflux::voice", backend = tts.name(), "TTS error: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
    }
}
