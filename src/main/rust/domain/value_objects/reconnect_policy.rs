use std::time::Duration;

use crate::domain::errors::{DomainError, Result};

pub const DEFAULT_RECONNECT_INTERVAL_SECS: u64 = 4;

/// Reconnection rules for a bridge
///
/// A failed connection attempt waits the full interval before the next one,
/// a connection lost mid-stream waits half of it.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconnectPolicy {
    max_attempts: Option<u32>,
    interval_secs: u64,
}

impl ReconnectPolicy {
    /// `max_attempts` below zero means retry forever
    pub fn new(max_attempts: i64, interval_secs: u64) -> Result<Self> {
        if interval_secs == 0 {
            return Err(DomainError::InvalidReconnectInterval);
        }

        let max_attempts = if max_attempts < 0 {
            None
        } else {
            Some(u32::try_from(max_attempts).unwrap_or(u32::MAX))
        };

        Ok(Self {
            max_attempts,
            interval_secs,
        })
    }

    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    /// Wait after a failed connection attempt
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Wait after the connection dropped while running (whole seconds)
    pub fn recovery_delay(&self) -> Duration {
        Duration::from_secs(self.interval_secs / 2)
    }

    /// Whether another attempt is allowed after `failures` consecutive failed opens
    pub fn allows_retry(&self, failures: u32) -> bool {
        match self.max_attempts {
            Some(max) => failures < max,
            None => true,
        }
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: None,
            interval_secs: DEFAULT_RECONNECT_INTERVAL_SECS,
        }
    }
}
