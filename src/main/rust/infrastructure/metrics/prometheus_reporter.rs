use lazy_static::lazy_static;
use prometheus::{Encoder, GaugeVec, IntCounterVec, Opts, Registry, TextEncoder};

use crate::domain::entities::FailureKind;
use crate::domain::ports::MetricsReporter;
use crate::domain::value_objects::BridgeState;

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // Bridge state (0=Disconnected, 1=Connecting, 2=Running, 3=ReconnectBackoff, 4=Stopped, 5=Stopped with error)
    pub static ref BRIDGE_STATE: GaugeVec = GaugeVec::new(
        Opts::new("uart_bridge_state", "Current supervisor state"),
        &["bridge"]
    ).expect("metric can be created");

    // Failed connection attempts followed by a retry
    pub static ref RECONNECT_ATTEMPTS: IntCounterVec = IntCounterVec::new(
        Opts::new("uart_bridge_reconnect_attempts_total", "Total number of reconnection attempts"),
        &["bridge"]
    ).expect("metric can be created");

    pub static ref MESSAGES_DECODED: IntCounterVec = IntCounterVec::new(
        Opts::new("uart_bridge_messages_decoded_total", "Messages decoded, by type tag"),
        &["bridge", "type"]
    ).expect("metric can be created");

    pub static ref LINES_FAILED: IntCounterVec = IntCounterVec::new(
        Opts::new("uart_bridge_lines_failed_total", "Recognized lines that could not be decoded"),
        &["bridge", "kind"]
    ).expect("metric can be created");

    // Lines matching no supported type tag
    pub static ref LINES_IGNORED: IntCounterVec = IntCounterVec::new(
        Opts::new("uart_bridge_lines_ignored_total", "Unrecognized lines skipped"),
        &["bridge"]
    ).expect("metric can be created");
}

pub struct PrometheusReporter;

impl PrometheusReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn init_metrics() -> Result<(), prometheus::Error> {
        REGISTRY.register(Box::new(BRIDGE_STATE.clone()))?;
        REGISTRY.register(Box::new(RECONNECT_ATTEMPTS.clone()))?;
        REGISTRY.register(Box::new(MESSAGES_DECODED.clone()))?;
        REGISTRY.register(Box::new(LINES_FAILED.clone()))?;
        REGISTRY.register(Box::new(LINES_IGNORED.clone()))?;
        Ok(())
    }

    pub fn gather_metrics() -> Vec<u8> {
        let encoder = TextEncoder::new();
        let metric_families = REGISTRY.gather();
        let mut buffer = vec![];
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            tracing::error!("Failed to encode metrics: {}", e);
            return b"# Error encoding metrics\n".to_vec();
        }
        buffer
    }
}

impl Default for PrometheusReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsReporter for PrometheusReporter {
    fn report_state_change(&self, bridge: &str, state: &BridgeState) {
        BRIDGE_STATE.with_label_values(&[bridge]).set(state.as_metric());
    }

    fn report_reconnect_attempt(&self, bridge: &str) {
        RECONNECT_ATTEMPTS.with_label_values(&[bridge]).inc();
    }

    fn report_message_decoded(&self, bridge: &str, tag: &str) {
        MESSAGES_DECODED.with_label_values(&[bridge, tag]).inc();
    }

    fn report_line_failed(&self, bridge: &str, kind: &FailureKind) {
        LINES_FAILED
            .with_label_values(&[bridge, kind.as_label()])
            .inc();
    }

    fn report_line_ignored(&self, bridge: &str) {
        LINES_IGNORED.with_label_values(&[bridge]).inc();
    }
}
