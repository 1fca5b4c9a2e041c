use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid bridge name: name cannot be empty")]
    InvalidBridgeName,

    #[error("Invalid serial port: {0}")]
    InvalidSerialPort(String),

    #[error("Invalid baud rate: {0} (must be > 0)")]
    InvalidBaudRate(u32),

    #[error("Invalid reconnect interval: must be at least one second")]
    InvalidReconnectInterval,

    #[error("Serial communication error: {0}")]
    Communication(String),

    #[error("Message is not supported: {0}")]
    UnknownMessageType(String),

    #[error("Can't parse message \"{original_line}\": {cause}")]
    Decode { original_line: String, cause: String },

    #[error("UART bridge {0} is already started")]
    AlreadyStarted(String),

    #[error("Supervisor task ended abnormally: {0}")]
    SupervisorTask(String),
}

impl DomainError {
    pub fn decode(original_line: &str, cause: impl ToString) -> Self {
        Self::Decode {
            original_line: original_line.to_string(),
            cause: cause.to_string(),
        }
    }

    /// Transport-level failures drive the reconnect state machine
    pub fn is_communication(&self) -> bool {
        matches!(self, Self::Communication(_))
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
