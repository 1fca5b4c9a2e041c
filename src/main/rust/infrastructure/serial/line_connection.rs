use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use crate::domain::errors::{DomainError, Result};
use crate::domain::ports::LineConnection;

/// Newline-framed reader over any async byte stream
pub struct LineReaderConnection<R> {
    reader: Option<BufReader<R>>,
    timeout: Duration,
    buffer: Vec<u8>,
}

impl<R> LineReaderConnection<R>
where
    R: AsyncRead + Unpin + Send,
{
    /// A zero `timeout` waits for data indefinitely
    pub fn new(stream: R, timeout: Duration) -> Self {
        Self {
            reader: Some(BufReader::new(stream)),
            timeout,
            buffer: Vec::with_capacity(256),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.reader.is_none()
    }
}

#[async_trait]
impl<R> LineConnection for LineReaderConnection<R>
where
    R: AsyncRead + Unpin + Send,
{
    async fn read_line(&mut self) -> Result<String> {
        let timeout = self.timeout;
        let reader = self
            .reader
            .as_mut()
            .ok_or_else(|| DomainError::Communication("connection is closed".to_string()))?;

        self.buffer.clear();
        let read = reader.read_until(b'\n', &mut self.buffer);
        let outcome = if timeout.is_zero() {
            read.await
        } else {
            tokio::time::timeout(timeout, read).await.map_err(|_| {
                DomainError::Communication(format!("no data received within {:?}", timeout))
            })?
        };

        let count = outcome.map_err(|e| DomainError::Communication(e.to_string()))?;
        if count == 0 {
            return Err(DomainError::Communication(
                "device closed the stream".to_string(),
            ));
        }

        // invalid UTF-8 still yields a line so the read loop can skip it
        Ok(String::from_utf8_lossy(&self.buffer).trim().to_string())
    }

    async fn close(&mut self) -> Result<()> {
        if self.reader.take().is_some() {
            tracing::debug!("Serial connection closed");
        }
        Ok(())
    }
}
