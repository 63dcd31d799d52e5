//! Voice settings chosen from the cognitive state.
//!
//! A struggling user gets a steadier, calmer delivery; an expert gets a faster, more
//! expressive one. Everyone else gets the ElevenLabs defaults.

use cogniflux_core::{ConfusionScore, LiveMemoryState, Signal, UserLevel};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Cognitive state as echoed back by the client, read field by field.
///
/// The browser sends whatever it last received from chat, possibly partial or from an
/// older build, so a bad field only loses that field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpokenState {
    pub confusion_score: Option<String>,
    pub user_level: Option<String>,
    pub detected_signals: Vec<String>,
}

impl SpokenState {
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            confusion_score: text("confusionScore"),
            user_level: text("userLevel"),
            detected_signals: value
                .get("detectedSignals")
                .and_then(Value::as_array)
                .map(|tags| tags.iter().filter_map(Value::as_str).map(str::to_string).collect())
                .unwrap_or_default(),
        }
    }
}

impl From<&LiveMemoryState> for SpokenState {
    fn from(memory: &LiveMemoryState) -> Self {
        Self {
            confusion_score: Some(memory.confusion_score.as_str().to_string()),
            user_level: Some(memory.user_level.as_str().to_string()),
            detected_signals: memory.detected_signals.iter().map(|s| s.as_str().to_string()).collect(),
        }
    }
}

/// ElevenLabs `voice_settings` block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.75,
            style: 0.0,
            use_speaker_boost: true,
        }
    }
}

impl VoiceSettings {
    /// Stable and consistent.
    pub const CALMING: VoiceSettings = VoiceSettings {
        stability: 0.85,
        similarity_boost: 0.8,
        style: 0.0,
        use_speaker_boost: true,
    };

    /// Faster, more dynamic.
    pub const EXPRESSIVE: VoiceSettings = VoiceSettings {
        stability: 0.4,
        similarity_boost: 0.7,
        style: 0.2,
        use_speaker_boost: true,
    };

    /// High confusion or frustration wins over an expert level.
    pub fn for_memory(memory: Option<&LiveMemoryState>) -> Self {
        Self::for_state(memory.map(SpokenState::from).as_ref())
    }

    /// Same rules as [`VoiceSettings::for_memory`] over a client-supplied state.
    pub fn for_state(state: Option<&SpokenState>) -> Self {
        let Some(state) = state else {
            return Self::default();
        };
        let confused = state.confusion_score.as_deref() == Some(ConfusionScore::High.as_str());
        let frustrated = state.detected_signals.iter().any(|s| s == Signal::FRUSTRATION);
        if confused || frustrated {
            Self::CALMING
        } else if state.user_level.as_deref() == Some(UserLevel::Expert.as_str()) {
            Self::EXPRESSIVE
        } else {
            Self::default()
        }
    }
}
