//! LLM backends: Gemini (Google Generative Language REST API) and a deterministic mock.
//!
//! Handlers depend on [`LlmBackend`] only; the concrete client is chosen once at startup
//! and injected through the gateway state.

use crate::config::env_opt_string;
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
const ENV_GEMINI_API_BASE: &str = "GEMINI_API_BASE";
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Image attached to a chat message (base64 payload, no data-URL prefix).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub data_base64: String,
    pub mime_type: String,
}

impl InlineImage {
    /// JPEG image. Accepts `data:<mime>;base64,<payload>` URLs as well and keeps their mime type.
    pub fn from_client(raw: &str) -> Self {
        if let Some(rest) = raw.strip_prefix("data:") {
            if let Some((mime, data)) = rest.split_once(";base64,") {
                return Self {
                    data_base64: data.to_string(),
                    mime_type: mime.to_string(),
                };
            }
        }
        Self {
            data_base64: raw.to_string(),
            mime_type: DEFAULT_IMAGE_MIME.to_string(),
        }
    }
}

/// One generation call.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub image: Option<InlineImage>,
}

impl GenerationRequest {
    pub fn text(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: Option<InlineImage>) -> Self {
        self.image = image;
        self
    }
}

/// Text generation backend.
#[async_trait::async_trait]
pub trait LlmBackend: Send + Sync {
    /// Short name for logs (e.g. "gemini", "mock").
    fn name(&self) -> &'static str;

    async fn generate(&self, request: GenerationRequest) -> CoreResult<String>;
}

// Gemini generateContent request/response
#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Gemini client over plain REST (`models/{model}:generateContent`).
#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Build from `GEMINI_API_KEY` (and optional `GEMINI_API_BASE`).
    pub fn from_env() -> CoreResult<Self> {
        let api_key = env_opt_string(ENV_GEMINI_API_KEY).ok_or(CoreError::MissingApiKey(ENV_GEMINI_API_KEY))?;
        let client = Self::new(api_key)?;
        Ok(match env_opt_string(ENV_GEMINI_API_BASE) {
            Some(base) => client.with_base_url(base),
            None => client,
        })
    }

    pub fn new(api_key: impl Into<String>) -> CoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            api_key: api_key.into().trim().to_string(),
            base_url: DEFAULT_API_BASE.to_string(),
            client,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait::async_trait]
impl LlmBackend for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, request: GenerationRequest) -> CoreResult<String> {
        let mut parts = vec![Part::Text { text: request.prompt }];
        if let Some(image) = request.image {
            parts.push(Part::InlineData {
                inline_data: InlineData {
                    mime_type: image.mime_type,
                    data: image.data_base64,
                },
            });
        }
        let body = GenerateContentRequest {
            contents: vec![Content { parts }],
        };

        tracing::debug!(target: "cogniflux::llm", model = %request.model, "Gemini generateContent");
        let res = self
            .client
            .post(self.endpoint(&request.model))
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(CoreError::Upstream {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)?;
        let reply: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if reply.trim().is_empty() {
            return Err(CoreError::EmptyResponse);
        }
        Ok(reply)
    }
}

/// Offline backend: deterministic reply that reflects the cognitive load line of the prompt.
#[derive(Debug, Clone, Default)]
pub struct MockLlm;

impl MockLlm {
    fn mock_generate(prompt: &str) -> String {
        let load = prompt
            .lines()
            .find_map(|l| l.strip_prefix("Cognitive Load: "))
            .unwrap_or("unknown");
        format!(
            "[Generated – Mock LLM]\n\nCognitive load is {}. Here is an answer adapted to that state.",
            load.trim()
        )
    }
}

#[async_trait::async_trait]
impl LlmBackend for MockLlm {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn generate(&self, request: GenerationRequest) -> CoreResult<String> {
        Ok(Self::mock_generate(&request.prompt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_image_accepts_raw_base64_and_data_urls() {
        let raw = InlineImage::from_client("QUJD");
        assert_eq!(raw.mime_type, "image/jpeg");
        assert_eq!(raw.data_base64, "QUJD");

        let url = InlineImage::from_client("data:image/png;base64,QUJD");
        assert_eq!(url.mime_type, "image/png");
        assert_eq!(url.data_base64, "QUJD");
    }

    #[test]
    fn request_body_uses_snake_case_inline_data() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text { text: "hi".into() },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: "image/jpeg".into(),
                            data: "QUJD".into(),
                        },
                    },
                ],
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(json["contents"][0]["parts"][1]["inline_data"]["mime_type"], "image/jpeg");
    }

    #[test]
    fn endpoint_includes_model() {
        let client = GeminiClient::new("k").unwrap().with_base_url("http://localhost:9/");
        assert_eq!(
            client.endpoint("gemini-1.5-flash"),
            "http://localhost:9/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn mock_reflects_cognitive_load() {
        let reply = MockLlm
            .generate(GenerationRequest::text("m", "x\nCognitive Load: high\ny"))
            .await
            .unwrap();
        assert!(reply.contains("Cognitive load is high"));
    }
}
