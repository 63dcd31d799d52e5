//! Kafka producer for cognitive events, via the Confluent Cloud REST API (v3).
//!
//! Records are keyed by user level so one partition sees one cohort. The value holds
//! the classified state and a 50-character snippet of the message, never the full text.

use super::{CognitiveEvent, ExchangeStage, PublishReceipt, TelemetrySink, TARGET};
use crate::config::{env_opt_string, env_or};
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ENV_REST_ENDPOINT: &str = "CONFLUENT_REST_ENDPOINT";
const ENV_CLUSTER_ID: &str = "CONFLUENT_CLUSTER_ID";
const ENV_API_KEY: &str = "CONFLUENT_API_KEY";
const ENV_API_SECRET: &str = "CONFLUENT_API_SECRET";
const ENV_TOPIC: &str = "CONFLUENT_TOPIC";
pub const DEFAULT_TOPIC: &str = "cognitive-events";
/// Characters of the user message kept in the record.
pub const CONTEXT_SNIPPET_CHARS: usize = 50;

#[derive(Debug, Clone)]
pub struct ConfluentConfig {
    /// e.g. `https://pkc-xxxxx.us-east-1.aws.confluent.cloud:443`
    pub rest_endpoint: String,
    pub cluster_id: String,
    pub api_key: String,
    pub api_secret: String,
    pub topic: String,
}

impl ConfluentConfig {
    /// None unless endpoint, cluster id, key and secret are all set.
    pub fn from_env() -> Option<Self> {
        Some(Self {
            rest_endpoint: env_opt_string(ENV_REST_ENDPOINT)?,
            cluster_id: env_opt_string(ENV_CLUSTER_ID)?,
            api_key: env_opt_string(ENV_API_KEY)?,
            api_secret: env_opt_string(ENV_API_SECRET)?,
            topic: env_or(ENV_TOPIC, DEFAULT_TOPIC),
        })
    }

    fn records_url(&self) -> String {
        format!(
            "{}/kafka/v3/clusters/{}/topics/{}/records",
            self.rest_endpoint.trim_end_matches('/'),
            self.cluster_id,
            self.topic
        )
    }
}

/// Record value, shared with the log fallback so both emit the same shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CognitiveRecord {
    /// RFC 3339
    pub timestamp: String,
    pub confusion_score: &'static str,
    pub user_level: &'static str,
    pub signals: Vec<String>,
    pub context: String,
}

impl CognitiveRecord {
    pub fn from_event(event: &CognitiveEvent) -> Self {
        Self {
            timestamp: event.timestamp.to_rfc3339(),
            confusion_score: event.memory.confusion_score.as_str(),
            user_level: event.memory.user_level.as_str(),
            signals: event
                .memory
                .detected_signals
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
            context: event.message_snippet(CONTEXT_SNIPPET_CHARS),
        }
    }
}

#[derive(Serialize)]
struct ProduceRequest<'a> {
    key: ProduceData<&'a str>,
    value: ProduceData<&'a CognitiveRecord>,
}

#[derive(Serialize)]
struct ProduceData<T> {
    #[serde(rename = "type")]
    kind: &'static str,
    data: T,
}

#[derive(Debug, Deserialize)]
struct ProduceResponse {
    error_code: u16,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    partition_id: i32,
    #[serde(default)]
    offset: i64,
}

pub struct ConfluentSink {
    config: ConfluentConfig,
    client: reqwest::Client,
}

impl ConfluentSink {
    pub fn new(config: ConfluentConfig) -> CoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        tracing::info!(target: TARGET, topic = %config.topic, "Confluent producer ready");
        Ok(Self { config, client })
    }

    /// Produce one record and return where it landed.
    pub async fn produce(&self, event: &CognitiveEvent) -> CoreResult<PublishReceipt> {
        let record = CognitiveRecord::from_event(event);
        let body = ProduceRequest {
            key: ProduceData {
                kind: "STRING",
                data: record.user_level,
            },
            value: ProduceData {
                kind: "JSON",
                data: &record,
            },
        };

        let res = self
            .client
            .post(self.config.records_url())
            .basic_auth(&self.config.api_key, Some(&self.config.api_secret))
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

        let parsed: ProduceResponse = serde_json::from_str(&text)?;
        if parsed.error_code >= 300 {
            return Err(CoreError::Upstream {
                status: parsed.error_code,
                body: parsed.message.unwrap_or_default(),
            });
        }

        Ok(PublishReceipt {
            topic: self.config.topic.clone(),
            partition: parsed.partition_id,
            offset: parsed.offset,
            record,
        })
    }
}

#[async_trait::async_trait]
impl TelemetrySink for ConfluentSink {
    fn name(&self) -> &'static str {
        "confluent"
    }

    async fn record_exchange(&self, event: &CognitiveEvent) -> CoreResult<()> {
        if event.stage != ExchangeStage::Classified {
            return Ok(());
        }
        let receipt = self.produce(event).await?;
        tracing::info!(
            target: TARGET,
            topic = %receipt.topic,
            partition = receipt.partition,
            offset = receipt.offset,
            "Event sent to Confluent"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live_memory::{compute_live_memory, Signal};

    #[test]
    fn records_url_trims_trailing_slash() {
        let cfg = ConfluentConfig {
            rest_endpoint: "https://pkc-1.confluent.cloud:443/".into(),
            cluster_id: "lkc-abc".into(),
            api_key: "k".into(),
            api_secret: "s".into(),
            topic: DEFAULT_TOPIC.into(),
        };
        assert_eq!(
            cfg.records_url(),
            "https://pkc-1.confluent.cloud:443/kafka/v3/clusters/lkc-abc/topics/cognitive-events/records"
        );
    }

    #[test]
    fn produce_body_keys_by_user_level_and_truncates_context() {
        let memory = compute_live_memory(vec![Signal::from("quick_reply")]);
        let message = "x".repeat(80);
        let record = CognitiveRecord::from_event(&CognitiveEvent::classified(memory, message));
        let body = ProduceRequest {
            key: ProduceData { kind: "STRING", data: record.user_level },
            value: ProduceData { kind: "JSON", data: &record },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["key"], serde_json::json!({"type": "STRING", "data": "expert"}));
        assert_eq!(json["value"]["type"], "JSON");
        assert_eq!(json["value"]["data"]["confusionScore"], "low");
        assert_eq!(json["value"]["data"]["userLevel"], "expert");
        assert_eq!(json["value"]["data"]["signals"], serde_json::json!(["quick_reply"]));
        assert_eq!(json["value"]["data"]["context"].as_str().unwrap().len(), CONTEXT_SNIPPET_CHARS);
    }

    fn unreachable_sink() -> ConfluentSink {
        ConfluentSink::new(ConfluentConfig {
            rest_endpoint: "http://127.0.0.1:9".into(),
            cluster_id: "lkc-abc".into(),
            api_key: "k".into(),
            api_secret: "s".into(),
            topic: DEFAULT_TOPIC.into(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn only_classified_events_are_produced() {
        let sink = unreachable_sink();
        let event = CognitiveEvent::classified(compute_live_memory(vec![Signal::from("rephrase")]), "hi");

        // nothing listens on port 9, so any produce attempt fails
        assert!(sink.record_exchange(&event.clone().completed(250)).await.is_ok());
        assert!(sink.record_exchange(&event).await.is_err());
    }
}

