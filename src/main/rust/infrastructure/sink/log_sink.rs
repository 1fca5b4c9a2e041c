use crate::domain::entities::BridgeEvent;
use crate::domain::ports::MessageSink;

/// Writes every event to the log as JSON
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl MessageSink for LogSink {
    fn deliver(&self, bridge: &str, event: BridgeEvent) {
        let json = match serde_json::to_string(&event) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(bridge, "Failed to serialize event: {}", e);
                return;
            }
        };

        match event {
            BridgeEvent::Message(_) => tracing::info!(bridge, message = %json, "Message received"),
            BridgeEvent::Failure(_) => tracing::debug!(bridge, failure = %json, "Line skipped"),
        }
    }
}
