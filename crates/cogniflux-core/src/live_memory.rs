//! Live Memory: maps client-reported interaction signals to a cognitive state.
//!
//! The classifier is a pure function over the signal history of the current exchange.
//! It counts `rephrase` and `frustration` tags to derive a confusion score and a user
//! level, then lets `quick_reply` force the level to `expert`. Unknown tags are echoed
//! back in `detected_signals` but never influence the derived fields.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single interaction signal reported by the client (e.g. `"rephrase"`).
///
/// The vocabulary is open: any string is a valid signal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signal(String);

impl Signal {
    /// User asked the same question again in different words.
    pub const REPHRASE: &'static str = "rephrase";
    /// User showed frustration (e.g. negative wording, repeated complaints).
    pub const FRUSTRATION: &'static str = "frustration";
    /// User answered quickly, suggesting familiarity with the topic.
    pub const QUICK_REPLY: &'static str = "quick_reply";

    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact, case-sensitive match against a tag.
    pub fn is(&self, tag: &str) -> bool {
        self.0 == tag
    }
}

impl From<&str> for Signal {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Signal {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Heuristic cognitive load of the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfusionScore {
    #[default]
    Low,
    Medium,
    High,
}

impl ConfusionScore {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfusionScore::Low => "low",
            ConfusionScore::Medium => "medium",
            ConfusionScore::High => "high",
        }
    }
}

impl fmt::Display for ConfusionScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Heuristic skill level of the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserLevel {
    Beginner,
    #[default]
    Intermediate,
    Expert,
}

impl UserLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserLevel::Beginner => "beginner",
            UserLevel::Intermediate => "intermediate",
            UserLevel::Expert => "expert",
        }
    }
}

impl fmt::Display for UserLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cognitive state for one exchange. Built fresh on every call; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveMemoryState {
    pub confusion_score: ConfusionScore,
    pub user_level: UserLevel,
    /// The input signals, unmodified (order and duplicates preserved).
    pub detected_signals: Vec<Signal>,
}

impl LiveMemoryState {
    /// Neutral state returned by the gateway when it has to degrade gracefully.
    pub fn fallback() -> Self {
        Self {
            confusion_score: ConfusionScore::Medium,
            user_level: UserLevel::Intermediate,
            detected_signals: Vec::new(),
        }
    }

    /// True if any detected signal is exactly `tag`.
    pub fn has_signal(&self, tag: &str) -> bool {
        self.detected_signals.iter().any(|s| s.is(tag))
    }

    /// Comma-joined signal tags, or `"none"` when the history is empty.
    pub fn signals_summary(&self) -> String {
        if self.detected_signals.is_empty() {
            return "none".to_string();
        }
        self.detected_signals
            .iter()
            .map(Signal::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Classify a signal history into a [`LiveMemoryState`].
///
/// Two or more rephrases, or any frustration, mean high confusion and a beginner user.
/// A single rephrase means medium confusion. `quick_reply` anywhere forces `expert`,
/// even when frustration in the same history already marked the user a beginner.
pub fn compute_live_memory(signals: Vec<Signal>) -> LiveMemoryState {
    let count = |tag: &str| signals.iter().filter(|s| s.is(tag)).count();
    let rephrase_count = count(Signal::REPHRASE);
    let frustration_count = count(Signal::FRUSTRATION);

    let mut confusion_score = ConfusionScore::Low;
    let mut user_level = UserLevel::Intermediate;

    if rephrase_count >= 2 || frustration_count >= 1 {
        confusion_score = ConfusionScore::High;
        user_level = UserLevel::Beginner;
    } else if rephrase_count == 1 {
        confusion_score = ConfusionScore::Medium;
    }

    if signals.iter().any(|s| s.is(Signal::QUICK_REPLY)) {
        user_level = UserLevel::Expert;
    }

    LiveMemoryState {
        confusion_score,
        user_level,
        detected_signals: signals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(tags: &[&str]) -> LiveMemoryState {
        compute_live_memory(tags.iter().map(|t| Signal::from(*t)).collect())
    }

    #[test]
    fn empty_history_is_low_intermediate() {
        let state = classify(&[]);
        assert_eq!(state.confusion_score, ConfusionScore::Low);
        assert_eq!(state.user_level, UserLevel::Intermediate);
        assert!(state.detected_signals.is_empty());
    }

    #[test]
    fn single_rephrase_is_medium() {
        let state = classify(&["rephrase"]);
        assert_eq!(state.confusion_score, ConfusionScore::Medium);
        assert_eq!(state.user_level, UserLevel::Intermediate);
    }

    #[test]
    fn matching_is_case_sensitive_and_untrimmed() {
        let state = classify(&["Rephrase", " frustration", "QUICK_REPLY"]);
        assert_eq!(state.confusion_score, ConfusionScore::Low);
        assert_eq!(state.user_level, UserLevel::Intermediate);
    }

    #[test]
    fn serializes_with_camel_case_fields_and_lowercase_values() {
        let state = classify(&["frustration", "quick_reply"]);
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "confusionScore": "high",
                "userLevel": "expert",
                "detectedSignals": ["frustration", "quick_reply"],
            })
        );
    }

    #[test]
    fn fallback_is_neutral() {
        let state = LiveMemoryState::fallback();
        assert_eq!(state.confusion_score, ConfusionScore::Medium);
        assert_eq!(state.user_level, UserLevel::Intermediate);
        assert!(state.detected_signals.is_empty());
    }

    #[test]
    fn signals_summary_joins_or_says_none() {
        assert_eq!(classify(&[]).signals_summary(), "none");
        assert_eq!(
            classify(&["rephrase", "quick_reply"]).signals_summary(),
            "rephrase, quick_reply"
        );
    }
}
