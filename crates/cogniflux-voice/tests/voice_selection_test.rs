//! Voice selection: persona picks the voice, cognitive state picks the settings.
//!
//! Uses an in-process recording backend; no network.

use cogniflux_core::{compute_live_memory, Persona, Signal};
use cogniflux_voice::{encode_audio, SpeechRequest, TtsBackend, VoiceResult, VoiceSettings};
use std::sync::Mutex;

#[derive(Default)]
struct RecordingTts {
    seen: Mutex<Vec<SpeechRequest>>,
}

#[async_trait::async_trait]
impl TtsBackend for RecordingTts {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn synthesize(&self, request: &SpeechRequest) -> VoiceResult<Vec<u8>> {
        self.seen.lock().unwrap().push(request.clone());
        Ok(request.text.as_bytes().to_vec())
    }
}

#[tokio::test]
async fn test_sage_frustrated_user_gets_calm_antoni() {
    let tts = RecordingTts::default();
    let memory = compute_live_memory(vec![Signal::from("frustration")]);
    let request = SpeechRequest {
        text: "Let's slow down.".to_string(),
        voice_id: Persona::from_key("sage").voice_id().to_string(),
        settings: VoiceSettings::for_memory(Some(&memory)),
    };

    let audio = tts.synthesize(&request).await.expect("synthesize");
    assert_eq!(encode_audio(&audio), encode_audio(b"Let's slow down."));

    let seen = tts.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].voice_id, "ErXwobaYiN019PkySvjV");
    assert_eq!(seen[0].settings, VoiceSettings::CALMING);
}

#[tokio::test]
async fn test_unknown_persona_expert_gets_expressive_rachel() {
    let tts = RecordingTts::default();
    let memory = compute_live_memory(vec![Signal::from("quick_reply")]);
    let request = SpeechRequest {
        text: "Short answer.".to_string(),
        voice_id: Persona::from_key("narrator").voice_id().to_string(),
        settings: VoiceSettings::for_memory(Some(&memory)),
    };
    tts.synthesize(&request).await.expect("synthesize");

    let seen = tts.seen.lock().unwrap();
    assert_eq!(seen[0].voice_id, "21m00Tcm4TlvDq8ikWAM");
    assert_eq!(seen[0].settings, VoiceSettings::EXPRESSIVE);
}
