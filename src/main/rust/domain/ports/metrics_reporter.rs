use crate::domain::entities::FailureKind;
use crate::domain::value_objects::BridgeState;

/// Port for metrics reporting
pub trait MetricsReporter: Send + Sync {
    fn report_state_change(&self, bridge: &str, state: &BridgeState);
    fn report_reconnect_attempt(&self, bridge: &str);
    fn report_message_decoded(&self, bridge: &str, tag: &str);
    fn report_line_failed(&self, bridge: &str, kind: &FailureKind);
    fn report_line_ignored(&self, bridge: &str);
}
