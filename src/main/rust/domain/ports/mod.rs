mod line_transport;
mod message_sink;
mod metrics_reporter;

pub use line_transport::{LineConnection, LineTransport};
pub use message_sink::MessageSink;
pub use metrics_reporter::MetricsReporter;
