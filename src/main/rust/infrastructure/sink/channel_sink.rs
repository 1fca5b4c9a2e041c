use tokio::sync::mpsc;

use crate::domain::entities::BridgeEvent;
use crate::domain::ports::MessageSink;

/// Event tagged with the bridge that produced it
#[derive(Debug, Clone)]
pub struct SinkEnvelope {
    pub bridge: String,
    pub event: BridgeEvent,
}

/// Forwards events into an unbounded channel, preserving arrival order
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<SinkEnvelope>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SinkEnvelope>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl MessageSink for ChannelSink {
    fn deliver(&self, bridge: &str, event: BridgeEvent) {
        let envelope = SinkEnvelope {
            bridge: bridge.to_string(),
            event,
        };
        if self.sender.send(envelope).is_err() {
            tracing::debug!(bridge, "Sink receiver dropped, discarding event");
        }
    }
}
