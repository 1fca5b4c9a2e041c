mod bridge_event;
mod bridge_lifecycle;
mod classified_line;
mod message;

pub use bridge_event::{BridgeEvent, FailureKind, FailureRecord};
pub use bridge_lifecycle::{BridgeLifecycle, StateTransition};
pub use classified_line::ClassifiedLine;
pub use message::{AlarmMessage, Message, StatusMessage};
