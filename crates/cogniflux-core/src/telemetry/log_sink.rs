//! Log-only producer used when no Kafka credentials are configured.
//!
//! Emits the same record shape as the Confluent producer through `tracing` and hands back
//! a synthetic receipt (partition 0, offset = epoch millis).

use super::confluent::CognitiveRecord;
use super::{CognitiveEvent, ExchangeStage, TelemetrySink, TARGET};
use crate::error::CoreResult;

pub const MOCK_TOPIC: &str = "cognitive-signals";

/// Where a record was (or would have been) written.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishReceipt {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    pub record: CognitiveRecord,
}

#[derive(Debug, Clone)]
pub struct LogSink {
    topic: String,
}

impl Default for LogSink {
    fn default() -> Self {
        Self {
            topic: MOCK_TOPIC.to_string(),
        }
    }
}

impl LogSink {
    pub fn publish_signal(&self, event: &CognitiveEvent) -> PublishReceipt {
        let record = CognitiveRecord::from_event(event);
        tracing::info!(
            target: TARGET,
            topic = %self.topic,
            confusion_score = record.confusion_score,
            user_level = record.user_level,
            signals = ?record.signals,
            context = %record.context,
            "[MOCK KAFKA] Cognitive event"
        );
        PublishReceipt {
            topic: self.topic.clone(),
            partition: 0,
            offset: event.timestamp.timestamp_millis(),
            record,
        }
    }

    /// Publish classified events only; completed ones carry nothing new for the stream.
    pub fn record(&self, event: &CognitiveEvent) -> Option<PublishReceipt> {
        match event.stage {
            ExchangeStage::Classified => Some(self.publish_signal(event)),
            ExchangeStage::Completed { .. } => None,
        }
    }
}

#[async_trait::async_trait]
impl TelemetrySink for LogSink {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn record_exchange(&self, event: &CognitiveEvent) -> CoreResult<()> {
        self.record(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live_memory::{compute_live_memory, Signal};

    #[test]
    fn receipt_uses_mock_topic_and_timestamp_offset() {
        let memory = compute_live_memory(vec![Signal::from("rephrase")]);
        let event = CognitiveEvent::classified(memory, "how do lifetimes work?");
        let receipt = LogSink::default().publish_signal(&event);
        assert_eq!(receipt.topic, MOCK_TOPIC);
        assert_eq!(receipt.partition, 0);
        assert_eq!(receipt.offset, event.timestamp.timestamp_millis());
        assert_eq!(receipt.record.confusion_score, "medium");
        assert_eq!(receipt.record.context, "how do lifetimes work?");
    }

    #[test]
    fn completed_events_are_not_published() {
        let sink = LogSink::default();
        let event = CognitiveEvent::classified(compute_live_memory(vec![Signal::from("frustration")]), "ugh");
        assert!(sink.record(&event).is_some());
        assert_eq!(sink.record(&event.completed(120)), None);
    }
}
