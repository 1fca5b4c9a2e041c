use crate::domain::entities::BridgeEvent;

/// Port receiving decoded messages and per-line failures, in arrival order
pub trait MessageSink: Send + Sync {
    fn deliver(&self, bridge: &str, event: BridgeEvent);
}
