//! Telemetry: fire-and-forget publishing of cognitive events.
//!
//! Every chat exchange produces a [`CognitiveEvent`] twice: once when the signals are
//! classified and once when the reply is ready. Kafka (via Confluent's REST API) takes the
//! first, Datadog (metrics + warning logs) the second. When a vendor is not
//! configured the [`LogSink`] records the event through `tracing` instead.
//!
//! Publishing never fails the caller: sink errors are logged at `warn` and dropped.

pub mod confluent;
pub mod datadog;
pub mod log_sink;

pub use confluent::{CognitiveRecord, ConfluentConfig, ConfluentSink};
pub use datadog::{DatadogConfig, DatadogSink};
pub use log_sink::{LogSink, PublishReceipt};

use crate::config::CoreConfig;
use crate::error::CoreResult;
use crate::live_memory::{ConfusionScore, LiveMemoryState, Signal};
use chrono::{DateTime, Utc};
use std::sync::Arc;

const TARGET: &str = "cogniflux::telemetry";

/// Where in the chat pipeline an event was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeStage {
    /// Signals classified, reply not generated yet.
    Classified,
    /// Reply generated; carries the end-to-end latency.
    Completed { response_time_ms: u64 },
}

/// One classified exchange, as seen by telemetry sinks.
#[derive(Debug, Clone)]
pub struct CognitiveEvent {
    pub memory: LiveMemoryState,
    pub message: String,
    pub stage: ExchangeStage,
    pub timestamp: DateTime<Utc>,
}

impl CognitiveEvent {
    pub fn classified(memory: LiveMemoryState, message: impl Into<String>) -> Self {
        Self {
            memory,
            message: message.into(),
            stage: ExchangeStage::Classified,
            timestamp: Utc::now(),
        }
    }

    /// Same exchange after the reply, stamped with `ms` latency.
    pub fn completed(mut self, response_time_ms: u64) -> Self {
        self.stage = ExchangeStage::Completed { response_time_ms };
        self.timestamp = Utc::now();
        self
    }

    pub fn response_time_ms(&self) -> Option<u64> {
        match self.stage {
            ExchangeStage::Completed { response_time_ms } => Some(response_time_ms),
            ExchangeStage::Classified => None,
        }
    }

    /// Leading `max_chars` characters of the message (char boundary safe).
    pub fn message_snippet(&self, max_chars: usize) -> String {
        self.message.chars().take(max_chars).collect()
    }
}

/// Numeric value of the confusion score for graphing: low 0, medium 1, high 2.
pub fn confusion_gauge(score: ConfusionScore) -> u8 {
    match score {
        ConfusionScore::Low => 0,
        ConfusionScore::Medium => 1,
        ConfusionScore::High => 2,
    }
}

/// High confusion or any frustration signal. Only these events raise warning logs.
pub fn is_significant(memory: &LiveMemoryState) -> bool {
    memory.confusion_score == ConfusionScore::High || memory.has_signal(Signal::FRUSTRATION)
}

/// Destination for cognitive events.
#[async_trait::async_trait]
pub trait TelemetrySink: Send + Sync {
    fn name(&self) -> &'static str;

    async fn record_exchange(&self, event: &CognitiveEvent) -> CoreResult<()>;
}

/// Fan-out over the configured sinks. Cheap to clone.
#[derive(Clone, Default)]
pub struct Telemetry {
    sinks: Vec<Arc<dyn TelemetrySink>>,
}

impl Telemetry {
    pub fn new(sinks: Vec<Arc<dyn TelemetrySink>>) -> Self {
        Self { sinks }
    }

    /// No sinks at all (tests, or telemetry fully disabled).
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Sinks for the credentials present in the environment.
    ///
    /// Kafka events go to Confluent when configured, else to the log sink. Datadog is
    /// added only when `DATADOG_API_KEY` is set.
    pub fn from_env(config: &CoreConfig) -> Self {
        let mut sinks: Vec<Arc<dyn TelemetrySink>> = Vec::new();

        match ConfluentConfig::from_env().map(ConfluentSink::new) {
            Some(Ok(sink)) => sinks.push(Arc::new(sink)),
            Some(Err(e)) => {
                tracing::warn!(target: TARGET, "Confluent sink init failed: {}; logging events instead", e);
                sinks.push(Arc::new(LogSink::default()));
            }
            None => {
                tracing::warn!(target: TARGET, "Confluent credentials missing. Cognitive events will be logged only.");
                sinks.push(Arc::new(LogSink::default()));
            }
        }

        match DatadogConfig::from_env(config).map(DatadogSink::new) {
            Some(Ok(sink)) => sinks.push(Arc::new(sink)),
            Some(Err(e)) => tracing::warn!(target: TARGET, "Datadog sink init failed: {}", e),
            None => tracing::info!(target: TARGET, "Datadog telemetry skipped (no DATADOG_API_KEY)"),
        }

        Self { sinks }
    }

    pub fn sink_names(&self) -> Vec<&'static str> {
        self.sinks.iter().map(|s| s.name()).collect()
    }

    /// Deliver to every sink and wait. Errors are logged and swallowed.
    pub async fn publish(&self, event: &CognitiveEvent) {
        for sink in &self.sinks {
            if let Err(e) = sink.record_exchange(event).await {
                tracing::warn!(target: TARGET, sink = sink.name(), "Telemetry publish failed: {}", e);
            }
        }
    }

    /// Deliver in the background; one detached task per sink.
    pub fn spawn_publish(&self, event: CognitiveEvent) {
        let event = Arc::new(event);
        for sink in &self.sinks {
            let sink = Arc::clone(sink);
            let event = Arc::clone(&event);
            tokio::spawn(async move {
                if let Err(e) = sink.record_exchange(&event).await {
                    tracing::warn!(target: TARGET, sink = sink.name(), "Background telemetry publish failed: {}", e);
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::live_memory::compute_live_memory;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSink {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl TelemetrySink for CountingSink {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn record_exchange(&self, _event: &CognitiveEvent) -> CoreResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(CoreError::EmptyResponse);
            }
            Ok(())
        }
    }

    fn memory(tags: &[&str]) -> LiveMemoryState {
        compute_live_memory(tags.iter().map(|t| Signal::from(*t)).collect())
    }

    #[test]
    fn gauge_maps_scores() {
        assert_eq!(confusion_gauge(ConfusionScore::Low), 0);
        assert_eq!(confusion_gauge(ConfusionScore::Medium), 1);
        assert_eq!(confusion_gauge(ConfusionScore::High), 2);
    }

    #[test]
    fn significance_needs_high_confusion_or_frustration() {
        assert!(!is_significant(&memory(&[])));
        assert!(!is_significant(&memory(&["rephrase"])));
        assert!(is_significant(&memory(&["rephrase", "rephrase"])));
        assert!(is_significant(&memory(&["frustration", "quick_reply"])));
        let mut hand_built = LiveMemoryState::fallback();
        hand_built.detected_signals.push(Signal::from("frustration"));
        assert!(is_significant(&hand_built));
    }

    #[test]
    fn snippet_respects_char_boundaries() {
        let event = CognitiveEvent::classified(memory(&[]), "héllo wörld");
        assert_eq!(event.message_snippet(4), "héll");
        assert_eq!(event.message_snippet(50), "héllo wörld");
    }

    #[tokio::test]
    async fn publish_reaches_every_sink_and_swallows_errors() {
        let ok = Arc::new(CountingSink { calls: AtomicUsize::new(0), fail: false });
        let bad = Arc::new(CountingSink { calls: AtomicUsize::new(0), fail: true });
        let telemetry = Telemetry::new(vec![bad.clone() as Arc<dyn TelemetrySink>, ok.clone()]);

        telemetry.publish(&CognitiveEvent::classified(memory(&["rephrase"]), "hi")).await;

        assert_eq!(bad.calls.load(Ordering::SeqCst), 1);
        assert_eq!(ok.calls.load(Ordering::SeqCst), 1);
    }
}
