//! Datadog: custom gauges for every exchange, warning logs for significant ones.
//!
//! Metrics: `cogniflux.cognitive_load` (0/1/2) and `cogniflux.response_time` (ms).
//! Logs are sent only for high confusion or frustration so they can drive monitors.

use super::{confusion_gauge, is_significant, CognitiveEvent, ExchangeStage, TelemetrySink, TARGET};
use crate::config::{env_opt_string, env_or, CoreConfig};
use crate::error::{CoreError, CoreResult};
use serde::Serialize;
use std::time::Duration;

const ENV_API_KEY: &str = "DATADOG_API_KEY";
const ENV_SITE: &str = "DATADOG_SITE";
const ENV_HOSTNAME: &str = "DATADOG_HOSTNAME";
const DEFAULT_SITE: &str = "datadoghq.com";
const DEFAULT_HOSTNAME: &str = "cogniflux-gateway";

pub const METRIC_COGNITIVE_LOAD: &str = "cogniflux.cognitive_load";
pub const METRIC_RESPONSE_TIME: &str = "cogniflux.response_time";

#[derive(Debug, Clone)]
pub struct DatadogConfig {
    pub api_key: String,
    /// Datadog site (e.g. `datadoghq.com`, `datadoghq.eu`).
    pub site: String,
    pub hostname: String,
    /// Value of the `env:` tag.
    pub environment: String,
    /// Value of the `model:` tag on response time.
    pub model: String,
}

impl DatadogConfig {
    /// None when `DATADOG_API_KEY` is unset.
    pub fn from_env(config: &CoreConfig) -> Option<Self> {
        let api_key = env_opt_string(ENV_API_KEY)?;
        Some(Self {
            api_key,
            site: env_or(ENV_SITE, DEFAULT_SITE),
            hostname: env_or(ENV_HOSTNAME, DEFAULT_HOSTNAME),
            environment: config.environment.clone(),
            model: config.chat_model.clone(),
        })
    }

    fn series_url(&self) -> String {
        format!("https://api.{}/api/v1/series", self.site)
    }

    fn logs_url(&self) -> String {
        format!("https://http-intake.logs.{}/api/v2/logs", self.site)
    }
}

#[derive(Debug, Serialize)]
struct SeriesPayload {
    series: Vec<Series>,
}

#[derive(Debug, Serialize)]
struct Series {
    metric: &'static str,
    points: Vec<(i64, f64)>,
    #[serde(rename = "type")]
    kind: &'static str,
    tags: Vec<String>,
}

#[derive(Debug, Serialize)]
struct LogEntry {
    ddsource: &'static str,
    ddtags: String,
    hostname: String,
    message: String,
    service: &'static str,
    status: &'static str,
    structured_data: LogData,
}

#[derive(Debug, Serialize)]
struct LogData {
    user_message: String,
    signals: Vec<String>,
    confusion_score: &'static str,
}

pub struct DatadogSink {
    config: DatadogConfig,
    client: reqwest::Client,
}

impl DatadogSink {
    pub fn new(config: DatadogConfig) -> CoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { config, client })
    }

    fn series(&self, event: &CognitiveEvent) -> SeriesPayload {
        let ts = event.timestamp.timestamp();
        let mut series = vec![Series {
            metric: METRIC_COGNITIVE_LOAD,
            points: vec![(ts, f64::from(confusion_gauge(event.memory.confusion_score)))],
            kind: "gauge",
            tags: vec![
                format!("user_level:{}", event.memory.user_level),
                format!("env:{}", self.config.environment),
            ],
        }];
        if let Some(ms) = event.response_time_ms() {
            series.push(Series {
                metric: METRIC_RESPONSE_TIME,
                points: vec![(ts, ms as f64)],
                kind: "gauge",
                tags: vec![format!("model:{}", self.config.model)],
            });
        }
        SeriesPayload { series }
    }

    fn warning_log(&self, event: &CognitiveEvent) -> LogEntry {
        LogEntry {
            ddsource: "cogniflux-ai",
            ddtags: format!("env:{}", self.config.environment),
            hostname: self.config.hostname.clone(),
            message: format!("High Cognitive Load Detected: User is {}", event.memory.user_level),
            service: "cognitive-engine",
            status: "warn",
            structured_data: LogData {
                user_message: event.message.clone(),
                signals: event
                    .memory
                    .detected_signals
                    .iter()
                    .map(|s| s.as_str().to_string())
                    .collect(),
                confusion_score: event.memory.confusion_score.as_str(),
            },
        }
    }

    async fn post<T: Serialize + ?Sized>(&self, url: String, key_param: &str, body: &T) -> CoreResult<()> {
        let res = self
            .client
            .post(url)
            .query(&[(key_param, self.config.api_key.as_str())])
            .json(body)
            .send()
            .await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(CoreError::Upstream {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl TelemetrySink for DatadogSink {
    fn name(&self) -> &'static str {
        "datadog"
    }

    async fn record_exchange(&self, event: &CognitiveEvent) -> CoreResult<()> {
        if event.stage == ExchangeStage::Classified {
            return Ok(());
        }
        self.post(self.config.series_url(), "api_key", &self.series(event)).await?;

        if is_significant(&event.memory) {
            let logs = [self.warning_log(event)];
            self.post(self.config.logs_url(), "dd-api-key", &logs[..]).await?;
            tracing::info!(target: TARGET, "Datadog alert sent");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live_memory::{compute_live_memory, Signal};

    fn sink() -> DatadogSink {
        DatadogSink::new(DatadogConfig {
            api_key: "k".into(),
            site: "datadoghq.eu".into(),
            hostname: "test-host".into(),
            environment: "test".into(),
            model: "gemini-1.5-flash".into(),
        })
        .unwrap()
    }

    #[test]
    fn urls_follow_site() {
        let s = sink();
        assert_eq!(s.config.series_url(), "https://api.datadoghq.eu/api/v1/series");
        assert_eq!(s.config.logs_url(), "https://http-intake.logs.datadoghq.eu/api/v2/logs");
    }

    #[test]
    fn series_carries_gauge_and_response_time() {
        let memory = compute_live_memory(vec![Signal::from("rephrase")]);
        let event = CognitiveEvent::classified(memory, "hi").completed(420);
        let json = serde_json::to_value(sink().series(&event)).unwrap();

        let load = &json["series"][0];
        assert_eq!(load["metric"], METRIC_COGNITIVE_LOAD);
        assert_eq!(load["type"], "gauge");
        assert_eq!(load["points"][0][1], 1.0);
        assert_eq!(load["tags"], serde_json::json!(["user_level:intermediate", "env:test"]));

        let rt = &json["series"][1];
        assert_eq!(rt["metric"], METRIC_RESPONSE_TIME);
        assert_eq!(rt["points"][0][1], 420.0);
        assert_eq!(rt["tags"], serde_json::json!(["model:gemini-1.5-flash"]));
    }

    #[test]
    fn warning_log_describes_user_level() {
        let memory = compute_live_memory(vec![Signal::from("frustration")]);
        let event = CognitiveEvent::classified(memory, "this is broken").completed(900);
        let json = serde_json::to_value(sink().warning_log(&event)).unwrap();
        assert_eq!(json["message"], "High Cognitive Load Detected: User is beginner");
        assert_eq!(json["status"], "warn");
        assert_eq!(json["ddtags"], "env:test");
        assert_eq!(json["structured_data"]["signals"], serde_json::json!(["frustration"]));
        assert_eq!(json["structured_data"]["confusion_score"], "high");
    }

    #[tokio::test]
    async fn classified_events_are_not_sent() {
        let sink = DatadogSink::new(DatadogConfig {
            site: "invalid".into(),
            ..sink().config
        })
        .unwrap();
        let event = CognitiveEvent::classified(compute_live_memory(vec![Signal::from("frustration")]), "ugh");
        // api.invalid never resolves, so a send would surface as an error
        assert!(sink.record_exchange(&event).await.is_ok());
    }
}

