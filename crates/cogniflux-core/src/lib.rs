//! cogniflux-core: live memory classifier, personas, prompt templates, LLM backends,
//! telemetry publishers and gateway configuration.
//!
//! The classifier ([`compute_live_memory`]) is pure and synchronous. Everything else is
//! thin async plumbing around vendor APIs, injected into the gateway as trait objects.

mod config;
mod error;
pub mod live_memory;
pub mod llm;
pub mod persona;
pub mod prompts;
pub mod telemetry;

pub use config::{env_opt_string, env_or, CoreConfig, LlmMode, ENV_CONFIG_PATH};
pub use error::{CoreError, CoreResult};
pub use live_memory::{compute_live_memory, ConfusionScore, LiveMemoryState, Signal, UserLevel};
pub use llm::{GeminiClient, GenerationRequest, InlineImage, LlmBackend, MockLlm};
pub use persona::Persona;
pub use prompts::{chat_prompt, report_prompt, ChatTurn};
pub use telemetry::{CognitiveEvent, ExchangeStage, Telemetry, TelemetrySink};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
