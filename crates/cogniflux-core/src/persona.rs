//! Personas: named prompt-behavior profiles chosen by the client.
//!
//! The persona only changes tone and voice. Adaptation to the user's cognitive state
//! comes from the live memory block in the prompt.

use serde::{Deserialize, Serialize};

/// Prompt persona. Unknown keys fall back to [`Persona::Atlas`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    /// Balanced, helpful, adaptable. Default mode.
    #[default]
    Atlas,
    /// Socratic tutor: guiding questions instead of direct answers.
    Sage,
    /// Technical specialist: precise, fast, jargon-friendly.
    Cipher,
}

impl Persona {
    pub const ALL: [Persona; 3] = [Persona::Atlas, Persona::Sage, Persona::Cipher];

    pub fn key(&self) -> &'static str {
        match self {
            Persona::Atlas => "atlas",
            Persona::Sage => "sage",
            Persona::Cipher => "cipher",
        }
    }

    /// Resolve a client-supplied key. Empty or unknown => Atlas.
    pub fn from_key(s: &str) -> Self {
        match s.trim() {
            s if s.eq_ignore_ascii_case("sage") => Persona::Sage,
            s if s.eq_ignore_ascii_case("cipher") => Persona::Cipher,
            _ => Persona::Atlas,
        }
    }

    /// Same as [`Persona::from_key`] for an optional key.
    pub fn from_optional(s: Option<&str>) -> Self {
        s.map(Self::from_key).unwrap_or_default()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Persona::Atlas => "Atlas",
            Persona::Sage => "Sage",
            Persona::Cipher => "Cipher",
        }
    }

    pub fn role(&self) -> &'static str {
        match self {
            Persona::Atlas => "Balanced Guide",
            Persona::Sage => "Socratic Tutor",
            Persona::Cipher => "Technical Specialist",
        }
    }

    pub fn instructions(&self) -> &'static str {
        match self {
            Persona::Atlas => "You are Atlas. Balanced, helpful, and adaptable. Default mode.",
            Persona::Sage => "You are Sage. You rarely give direct answers. \
                Instead, you ask guiding questions to help the user discover the answer. \
                You are patient, wise, and speak in a calm, scholarly tone.",
            Persona::Cipher => "You are Cipher. You are precise, fast, and technical. \
                You value efficiency. You assume the user is smart. \
                You use code blocks and technical jargon freely. No small talk.",
        }
    }

    /// ElevenLabs voice used when speaking as this persona.
    pub fn voice_id(&self) -> &'static str {
        match self {
            // Rachel
            Persona::Atlas => "21m00Tcm4TlvDq8ikWAM",
            // Antoni
            Persona::Sage => "ErXwobaYiN019PkySvjV",
            // Josh
            Persona::Cipher => "TxGEqnHWrfWFTfGW9XjX",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_key_is_case_insensitive_and_defaults_to_atlas() {
        assert_eq!(Persona::from_key("SAGE"), Persona::Sage);
        assert_eq!(Persona::from_key(" cipher "), Persona::Cipher);
        assert_eq!(Persona::from_key("atlas"), Persona::Atlas);
        assert_eq!(Persona::from_key(""), Persona::Atlas);
        assert_eq!(Persona::from_key("oracle"), Persona::Atlas);
        assert_eq!(Persona::from_optional(None), Persona::Atlas);
    }

    #[test]
    fn key_round_trips_through_from_key() {
        for p in Persona::ALL {
            assert_eq!(Persona::from_key(p.key()), p);
        }
    }

    #[test]
    fn each_persona_has_its_own_voice() {
        assert_eq!(Persona::Atlas.voice_id(), "21m00Tcm4TlvDq8ikWAM");
        assert_eq!(Persona::Sage.voice_id(), "ErXwobaYiN019PkySvjV");
        assert_eq!(Persona::Cipher.voice_id(), "TxGEqnHWrfWFTfGW9XjX");
    }
}
