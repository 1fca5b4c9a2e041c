mod alarm_type;
mod bridge_config;
mod bridge_state;
mod device_type;
pub mod message_tag;
mod reconnect_policy;

pub use alarm_type::AlarmType;
pub use bridge_config::{BridgeConfig, DEFAULT_BAUD_RATE, DEFAULT_BRIDGE_NAME, DEFAULT_TIMEOUT};
pub use bridge_state::{BridgeState, StopReason};
pub use device_type::DeviceType;
pub use reconnect_policy::{ReconnectPolicy, DEFAULT_RECONNECT_INTERVAL_SECS};
