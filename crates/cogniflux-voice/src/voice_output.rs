//! **VoiceOutput**: text-to-speech backends.
//!
//! The gateway holds one `Arc<dyn TtsBackend>` and calls it per `/api/speak` request.
//! Audio bytes go back to the browser base64-encoded ([`encode_audio`]).

use crate::error::{VoiceError, VoiceResult};
use crate::voice_settings::VoiceSettings;
use base64::Engine;
use cogniflux_core::env_opt_string;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

const ENV_API_KEY: &str = "ELEVENLABS_API_KEY";
const ENV_API_BASE: &str = "ELEVENLABS_API_BASE";
const ENV_MODEL_ID: &str = "ELEVENLABS_MODEL_ID";
const DEFAULT_API_BASE: &str = "https://api.elevenlabs.io";
const DEFAULT_MODEL_ID: &str = "eleven_monolingual_v1";

/// One synthesis call.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    pub text: String,
    pub voice_id: String,
    pub settings: VoiceSettings,
}

/// Backend that turns text into audio bytes (MP3). Implement for ElevenLabs or local TTS.
#[async_trait::async_trait]
pub trait TtsBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Synthesize text to audio bytes. Return empty vec to skip playback.
    async fn synthesize(&self, request: &SpeechRequest) -> VoiceResult<Vec<u8>>;
}

/// Placeholder TTS: returns empty audio so nothing plays.
#[derive(Debug, Default)]
pub struct PlaceholderTts;

#[async_trait::async_trait]
impl TtsBackend for PlaceholderTts {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    async fn synthesize(&self, _request: &SpeechRequest) -> VoiceResult<Vec<u8>> {
        Ok(Vec::new())
    }
}

#[derive(Serialize)]
struct ElevenLabsBody<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

/// Production TTS backend: ElevenLabs `text-to-speech/{voice_id}`.
#[derive(Debug, Clone)]
pub struct ElevenLabsTts {
    /// Base URL without trailing slash.
    pub base_url: String,
    api_key: String,
    /// e.g. `eleven_monolingual_v1`, `eleven_multilingual_v2`.
    pub model_id: String,
    client: reqwest::Client,
}

impl ElevenLabsTts {
    /// Build from environment: ELEVENLABS_API_KEY, optional ELEVENLABS_MODEL_ID and ELEVENLABS_API_BASE.
    pub fn from_env() -> VoiceResult<Self> {
        let api_key = env_opt_string(ENV_API_KEY).ok_or(VoiceError::MissingApiKey(ENV_API_KEY))?;
        let model_id = env_opt_string(ENV_MODEL_ID).unwrap_or_else(|| DEFAULT_MODEL_ID.to_string());
        let base_url = env_opt_string(ENV_API_BASE).unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Self::new(base_url, api_key, model_id)
    }

    /// Create with explicit config (e.g. for tests or non-env wiring).
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model_id: impl Into<String>,
    ) -> VoiceResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model_id: model_id.into(),
            client,
        })
    }

    fn endpoint(&self, voice_id: &str) -> String {
        format!("{}/v1/text-to-speech/{}", self.base_url, voice_id)
    }
}

#[async_trait::async_trait]
impl TtsBackend for ElevenLabsTts {
    fn name(&self) -> &'static str {
        "elevenlabs"
    }

    async fn synthesize(&self, request: &SpeechRequest) -> VoiceResult<Vec<u8>> {
        if request.text.is_empty() {
            return Ok(Vec::new());
        }
        let body = ElevenLabsBody {
            text: &request.text,
            model_id: &self.model_id,
            voice_settings: request.settings,
        };
        debug!(target: "cogniflux::voice", voice_id = %request.voice_id, "ElevenLabs synthesize");
        let res = self
            .client
            .post(self.endpoint(&request.voice_id))
            .header("xi-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(VoiceError::Upstream {
                status: status.as_u16(),
                body,
            });
        }
        let bytes = res.bytes().await?;
        Ok(bytes.to_vec())
    }
}

/// Standard base64 of the audio, as the browser expects it.
pub fn encode_audio(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}
