//! Error types for Cogniflux voice synthesis

use thiserror::Error;

/// Result type alias for voice operations
pub type VoiceResult<T> = Result<T, VoiceError>;

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("Missing API key: set {0}")]
    MissingApiKey(&'static str),

    #[error("TTS error: {0}")]
    Tts(String),

    #[error("TTS API error {status}: {body}")]
    Upstream { status: u16, body: String },
}

impl From<reqwest::Error> for VoiceError {
    fn from(err: reqwest::Error) -> Self {
        VoiceError::Tts(err.to_string())
    }
}
