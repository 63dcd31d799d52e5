//! Prompt templates for chat replies and session reports.

pub mod chat;
pub mod report;

pub use chat::chat_prompt;
pub use report::{format_transcript, report_prompt, ChatTurn, REPORT_PROMPT_TEMPLATE};
