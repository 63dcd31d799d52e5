//! Chat handler: classify signals, call the model, publish telemetry.
//!
//! The cognitive state is computed before the model call and returned with the reply so
//! the client can render it. Any failure (bad body, model error) still answers 200 with
//! a fallback reply and the neutral state.

use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use cogniflux_core::{
    chat_prompt, compute_live_memory, CognitiveEvent, GenerationRequest, InlineImage, LiveMemoryState, Persona,
    Signal,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;

pub const FALLBACK_REPLY: &str =
    "I'm having trouble responding right now, but I'm still adapting to your needs.";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub signals: Option<Vec<Signal>>,
    /// Base64 JPEG (or data URL) attached to the message.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub persona: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub memory: LiveMemoryState,
}

impl ChatResponse {
    fn fallback() -> Self {
        Self {
            reply: FALLBACK_REPLY.to_string(),
            memory: LiveMemoryState::fallback(),
        }
    }
}

/// POST /api/chat
pub async fn chat(State(state): State<AppState>, body: Bytes) -> Json<ChatResponse> {
    let started = Instant::now();

    let req: ChatRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(target: "cogniflux::chat", "Malformed chat request: {}", e);
            return Json(ChatResponse::fallback());
        }
    };

    let memory = compute_live_memory(req.signals.unwrap_or_default());
    let persona = Persona::from_optional(req.persona.as_deref());
    tracing::info!(
        target: "cogniflux::chat",
        chars = req.message.chars().count(),
        persona = persona.key(),
        confusion = %memory.confusion_score,
        level = %memory.user_level,
        "Chat request received"
    );

    let event = CognitiveEvent::classified(memory.clone(), req.message.as_str());
    state.telemetry.spawn_publish(event.clone());

    let generation = GenerationRequest::text(
        state.config.chat_model.as_str(),
        chat_prompt(persona, &memory, &req.message),
    )
    .with_image(req.image.as_deref().filter(|s| !s.is_empty()).map(InlineImage::from_client));

    match state.llm.generate(generation).await {
        Ok(reply) => {
            let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            state.telemetry.spawn_publish(event.completed(elapsed_ms));
            Json(ChatResponse { reply, memory })
        }
        Err(e) => {
            tracing::error!(target: "cogniflux::chat", backend = state.llm.name(), "Model error: {}", e);
            Json(ChatResponse::fallback())
        }
    }
}
