pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-exports for convenience
pub use application::services::BridgeService;
pub use config::Config;
pub use domain::entities::{
    AlarmMessage, BridgeEvent, BridgeLifecycle, ClassifiedLine, FailureKind, FailureRecord,
    Message, StateTransition, StatusMessage,
};
pub use domain::errors::{DomainError, Result};
pub use domain::ports::{LineConnection, LineTransport, MessageSink, MetricsReporter};
pub use domain::services::{Classifier, DecoderRegistry};
pub use domain::value_objects::{
    AlarmType, BridgeConfig, BridgeState, DeviceType, ReconnectPolicy, StopReason,
};
pub use infrastructure::metrics::{serve_metrics, PrometheusReporter};
pub use infrastructure::serial::{LineReaderConnection, SerialLineTransport};
pub use infrastructure::sink::{ChannelSink, LogSink, SinkEnvelope};
