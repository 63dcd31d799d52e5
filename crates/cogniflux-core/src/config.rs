//! Gateway configuration and environment helpers.
//!
//! `CoreConfig` is layered with the `config` crate: built-in defaults, then an optional
//! TOML file, then `COGNIFLUX__*` environment variables. Vendor credentials are not part
//! of `CoreConfig`; each client reads its own conventional env names (`GEMINI_API_KEY`,
//! `DATADOG_API_KEY`, ...) through [`env_opt_string`].

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Env var naming the config file (without extension is fine). Default: `config/cogniflux`.
pub const ENV_CONFIG_PATH: &str = "COGNIFLUX_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/cogniflux";
const ENV_PREFIX: &str = "COGNIFLUX";

/// How the gateway produces replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmMode {
    /// Call the configured model API.
    #[default]
    Live,
    /// Deterministic offline replies (no API key needed).
    Mock,
}

impl LlmMode {
    pub fn from_str(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("mock") {
            LlmMode::Mock
        } else {
            LlmMode::Live
        }
    }
}

/// Global gateway configuration.
///
/// | Key | Default | Description |
/// |-----|---------|-------------|
/// | app_name | Cogniflux | Service name in logs and `/health`. |
/// | host / port | 127.0.0.1 / 8000 | Bind address. |
/// | llm_mode | live | `live` or `mock`. |
/// | chat_model | gemini-1.5-flash | Model for chat replies. |
/// | report_model | gemini-1.5-flash | Model for session reports. |
/// | environment | hackathon | `env:` tag on telemetry. |
/// | allowed_origins | [] | CORS origins; empty allows any origin. |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    pub app_name: String,
    pub host: String,
    pub port: u16,
    pub llm_mode: String,
    pub chat_model: String,
    pub report_model: String,
    pub environment: String,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            app_name: "Cogniflux".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8000,
            llm_mode: "live".to_string(),
            chat_model: "gemini-1.5-flash".to_string(),
            report_model: "gemini-1.5-flash".to_string(),
            environment: "hackathon".to_string(),
            allowed_origins: Vec::new(),
        }
    }
}

impl CoreConfig {
    /// Load config. Precedence: env `COGNIFLUX__*` > file (`COGNIFLUX_CONFIG` or `config/cogniflux`) > defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Some(Path::new(&path)))
    }

    /// Load with an explicit optional config file. A missing file is not an error.
    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let defaults = CoreConfig::default();
        let builder = config::Config::builder()
            .set_default("app_name", defaults.app_name)?
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("llm_mode", defaults.llm_mode)?
            .set_default("chat_model", defaults.chat_model)?
            .set_default("report_model", defaults.report_model)?
            .set_default("environment", defaults.environment)?
            .set_default("allowed_origins", Vec::<String>::new())?;

        let builder = match path.and_then(Path::to_str) {
            Some(p) => builder.add_source(config::File::with_name(p).required(false)),
            None => builder,
        };

        builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("allowed_origins")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn llm_mode(&self) -> LlmMode {
        LlmMode::from_str(&self.llm_mode)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Trimmed env value; unset or blank => None.
pub fn env_opt_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Env value with a default for unset or blank.
pub fn env_or(name: &str, default: &str) -> String {
    env_opt_string(name).unwrap_or_else(|| default.to_string())
}
