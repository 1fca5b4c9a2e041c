use std::time::Duration;

use clap::Parser;

use crate::domain::value_objects::{BridgeConfig, ReconnectPolicy};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "ajax-uart-bridge",
    version = "0.1.0",
    about = "Ajax security panel UART bridge with automatic reconnection"
)]
pub struct Config {
    /// Bridge name used in logs and metric labels
    #[arg(long, env = "UART_BRIDGE_NAME", default_value = "uart_bridge0")]
    pub name: String,

    /// Serial device of the UART gateway
    #[arg(long, env = "UART_PORT")]
    pub port: String,

    /// Serial baud rate
    #[arg(long, env = "UART_BAUDRATE", default_value = "57600")]
    pub baudrate: u32,

    /// Read timeout in seconds (0 disables)
    #[arg(long, env = "UART_TIMEOUT", default_value = "3")]
    pub timeout: u64,

    /// Connection attempts before giving up (negative retries forever)
    #[arg(
        long,
        env = "UART_MAX_RECONNECT_ATTEMPTS",
        default_value = "-1",
        allow_negative_numbers = true
    )]
    pub max_reconnect_attempts: i64,

    /// Seconds between connection attempts
    #[arg(long, env = "UART_RECONNECT_INTERVAL", default_value = "4")]
    pub reconnect_interval: u64,

    /// Metrics server port
    #[arg(long, env = "METRICS_PORT", default_value = "9003")]
    pub metrics_port: u16,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Minimum allowed port (ports below 1024 are privileged)
const MIN_USER_PORT: u16 = 1024;

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("Bridge name cannot be empty");
        }

        if self.port.trim().is_empty() {
            anyhow::bail!("Serial port cannot be empty");
        }

        if self.baudrate == 0 {
            anyhow::bail!("Baud rate must be a positive integer");
        }

        if self.reconnect_interval == 0 {
            anyhow::bail!("Reconnect interval cannot be 0");
        }

        Self::validate_port(self.metrics_port, "metrics")?;

        Ok(())
    }

    fn validate_port(port: u16, name: &str) -> anyhow::Result<()> {
        if port == 0 {
            anyhow::bail!("Invalid {} port: port cannot be 0", name);
        }
        if port < MIN_USER_PORT {
            anyhow::bail!(
                "Invalid {} port: {} is a privileged port (< {}). Use a port >= {}",
                name,
                port,
                MIN_USER_PORT,
                MIN_USER_PORT
            );
        }
        Ok(())
    }

    pub fn to_bridge_config(&self) -> crate::domain::errors::Result<BridgeConfig> {
        BridgeConfig::new(
            self.name.clone(),
            self.port.clone(),
            self.baudrate,
            Duration::from_secs(self.timeout),
        )
    }

    pub fn to_reconnect_policy(&self) -> crate::domain::errors::Result<ReconnectPolicy> {
        ReconnectPolicy::new(self.max_reconnect_attempts, self.reconnect_interval)
    }
}
