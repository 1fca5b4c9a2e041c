use std::time::Duration;

use crate::domain::errors::{DomainError, Result};

pub const DEFAULT_BRIDGE_NAME: &str = "uart_bridge0";
pub const DEFAULT_BAUD_RATE: u32 = 57600;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Connection settings for one UART bridge
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeConfig {
    name: String,
    port: String,
    baud_rate: u32,
    timeout: Duration,
}

impl BridgeConfig {
    pub fn new(name: String, port: String, baud_rate: u32, timeout: Duration) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidBridgeName);
        }
        Self::validate_port(&port)?;
        if baud_rate == 0 {
            return Err(DomainError::InvalidBaudRate(baud_rate));
        }

        Ok(Self {
            name,
            port,
            baud_rate,
            timeout,
        })
    }

    /// Bridge on `port` with every other setting at its default
    pub fn with_defaults(port: impl Into<String>) -> Result<Self> {
        Self::new(
            DEFAULT_BRIDGE_NAME.to_string(),
            port.into(),
            DEFAULT_BAUD_RATE,
            DEFAULT_TIMEOUT,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    /// Read timeout handed to the transport; zero disables it
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn validate_port(port: &str) -> Result<()> {
        if port.trim().is_empty() {
            return Err(DomainError::InvalidSerialPort(port.to_string()));
        }
        Ok(())
    }
}
