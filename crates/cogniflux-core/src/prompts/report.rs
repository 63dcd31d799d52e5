//! Session report prompt: turn a chat transcript into a "Cognitive Journey Report".

use serde::{Deserialize, Serialize};

/// One message of a chat transcript as sent by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// `user` or `ai` (free-form; uppercased in the transcript).
    pub role: String,
    pub text: String,
}

pub const REPORT_PROMPT_TEMPLATE: &str = r#"Analyze the following conversation between a User and Cogniflux (AI).

Goal: Generate a "Cognitive Journey Report" for the user.

Output Format: Markdown.

Sections:
1. **Summary**: What did the user want to achieve?
2. **Cognitive Analysis**:
   - Did the user seem confused at any point?
   - How did the AI adapt? (Did it simplify? Did it go deeper?)
3. **Key Learnings**: 3 bullet points of what was discussed.
4. **Next Steps**: What should the user explore next based on this chat?

Keep it concise, encouraging, and professional.

Conversation:
{conversation}
"#;

/// Transcript as `ROLE: text` lines.
pub fn format_transcript(turns: &[ChatTurn]) -> String {
    turns
        .iter()
        .map(|t| format!("{}: {}", t.role.to_uppercase(), t.text))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn report_prompt(turns: &[ChatTurn]) -> String {
    REPORT_PROMPT_TEMPLATE.replace("{conversation}", &format_transcript(turns))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_uppercases_roles() {
        let turns = vec![
            ChatTurn { role: "user".into(), text: "hi".into() },
            ChatTurn { role: "ai".into(), text: "hello".into() },
        ];
        assert_eq!(format_transcript(&turns), "USER: hi\nAI: hello");
        let prompt = report_prompt(&turns);
        assert!(prompt.contains("Cognitive Journey Report"));
        assert!(prompt.ends_with("Conversation:\nUSER: hi\nAI: hello\n"));
    }
}
