use std::fmt;

/// How a bridge came to a halt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `stop()` was requested
    Clean,
    /// Reconnect budget exhausted
    Failed,
}

/// Supervisor states of a UART bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BridgeState {
    /// Never started, or a dead loop task was reaped
    #[default]
    Disconnected,
    /// Opening the transport
    Connecting,
    /// Read loop is consuming lines
    Running,
    /// Waiting before the next connection attempt
    ReconnectBackoff { attempt: u32 },
    Stopped(StopReason),
}

impl fmt::Display for BridgeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "DISCONNECTED"),
            Self::Connecting => write!(f, "CONNECTING"),
            Self::Running => write!(f, "RUNNING"),
            Self::ReconnectBackoff { attempt } => {
                write!(f, "RECONNECT_BACKOFF (attempt {})", attempt)
            }
            Self::Stopped(StopReason::Clean) => write!(f, "STOPPED"),
            Self::Stopped(StopReason::Failed) => write!(f, "STOPPED (error)"),
        }
    }
}

impl BridgeState {
    /// Convert state to numeric value for metrics
    pub fn as_metric(&self) -> f64 {
        match self {
            Self::Disconnected => 0.0,
            Self::Connecting => 1.0,
            Self::Running => 2.0,
            Self::ReconnectBackoff { .. } => 3.0,
            Self::Stopped(StopReason::Clean) => 4.0,
            Self::Stopped(StopReason::Failed) => 5.0,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped(_))
    }

    /// Check if state indicates a problem
    pub fn is_problematic(&self) -> bool {
        matches!(
            self,
            Self::ReconnectBackoff { .. } | Self::Stopped(StopReason::Failed)
        )
    }
}
