use async_trait::async_trait;
use tokio_serial::SerialPortBuilderExt;

use super::LineReaderConnection;
use crate::domain::errors::{DomainError, Result};
use crate::domain::ports::{LineConnection, LineTransport};
use crate::domain::value_objects::BridgeConfig;

/// Transport opening the UART gateway through a local serial device
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialLineTransport;

impl SerialLineTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LineTransport for SerialLineTransport {
    async fn open(&self, config: &BridgeConfig) -> Result<Box<dyn LineConnection>> {
        let stream = tokio_serial::new(config.port(), config.baud_rate())
            .open_native_async()
            .map_err(|e| DomainError::Communication(format!("{}: {}", config.port(), e)))?;

        tracing::debug!(
            port = %config.port(),
            baud_rate = config.baud_rate(),
            "Serial port opened"
        );

        Ok(Box::new(LineReaderConnection::new(stream, config.timeout())))
    }
}
