mod channel_sink;
mod log_sink;

pub use channel_sink::{ChannelSink, SinkEnvelope};
pub use log_sink::LogSink;
