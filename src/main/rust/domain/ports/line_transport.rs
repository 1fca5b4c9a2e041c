use async_trait::async_trait;

use crate::domain::errors::Result;
use crate::domain::value_objects::BridgeConfig;

/// Port for the byte transport feeding a bridge
#[async_trait]
pub trait LineTransport: Send + Sync {
    /// Open a connection to the configured device.
    /// Failures are `DomainError::Communication`.
    async fn open(&self, config: &BridgeConfig) -> Result<Box<dyn LineConnection>>;
}

/// An open connection yielding one text line at a time
#[async_trait]
pub trait LineConnection: Send {
    /// Wait for the next line; transport faults and read timeouts
    /// are `DomainError::Communication`
    async fn read_line(&mut self) -> Result<String>;

    /// Release the connection. Calling it again is a no-op.
    async fn close(&mut self) -> Result<()>;
}
