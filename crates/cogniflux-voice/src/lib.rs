//! # Cogniflux Voice
//!
//! Speaks replies back to the user. Voice *settings* follow the live cognitive state
//! (calmer when the user struggles, livelier for experts); the voice itself follows the
//! persona. Synthesis goes through a [`TtsBackend`] so the gateway can swap ElevenLabs
//! for a placeholder in tests.

pub mod error;
pub mod voice_output;
pub mod voice_settings;

pub use error::{VoiceError, VoiceResult};
pub use voice_output::{encode_audio, ElevenLabsTts, PlaceholderTts, SpeechRequest, TtsBackend};
pub use voice_settings::{SpokenState, VoiceSettings};
