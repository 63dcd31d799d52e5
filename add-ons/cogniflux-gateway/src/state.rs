//! Shared gateway state. Clients are built once at startup and injected into handlers.

use cogniflux_core::{CoreConfig, GeminiClient, LlmBackend, LlmMode, MockLlm, Telemetry};
use cogniflux_voice::{ElevenLabsTts, TtsBackend};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<CoreConfig>,
    pub llm: Arc<dyn LlmBackend>,
    /// None when no TTS key is configured; `/api/speak` then answers 500.
    pub tts: Option<Arc<dyn TtsBackend>>,
    pub telemetry: Telemetry,
}

impl AppState {
    /// Wire real clients from the environment, falling back where credentials are missing.
    pub fn from_env(config: CoreConfig) -> Self {
        let llm: Arc<dyn LlmBackend> = match config.llm_mode() {
            LlmMode::Mock => {
                info!(target: "cogniflux::llm", "LLM mode: mock");
                Arc::new(MockLlm)
            }
            LlmMode::Live => match GeminiClient::from_env() {
                Ok(client) => {
                    info!(target: "cogniflux::llm", model = %config.chat_model, "LLM mode: live (Gemini)");
                    Arc::new(client)
                }
                Err(e) => {
                    warn!(target: "cogniflux::llm", "Gemini unavailable ({}); using mock LLM", e);
                    Arc::new(MockLlm)
                }
            },
        };

        let tts: Option<Arc<dyn TtsBackend>> = match ElevenLabsTts::from_env() {
            Ok(t) => {
                info!(target: "cogniflux::voice", model_id = %t.model_id, "TTS: [ElevenLabs]");
                Some(Arc::new(t))
            }
            Err(e) => {
                warn!(target: "cogniflux::voice", "TTS disabled: {}", e);
                None
            }
        };

        let telemetry = Telemetry::from_env(&config);
        info!(target: "cogniflux::telemetry", sinks = ?telemetry.sink_names(), "Telemetry sinks");

        Self {
            config: Arc::new(config),
            llm,
            tts,
            telemetry,
        }
    }
}
