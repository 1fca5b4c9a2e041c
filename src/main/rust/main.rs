use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::sync::oneshot;
use tracing::{error, info};

use ajax_uart_bridge::{
    serve_metrics, BridgeService, Config, DecoderRegistry, LogSink, PrometheusReporter,
    SerialLineTransport,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse configuration
    let config = Config::parse();
    config.validate()?;

    // Initialize logging
    let filter = if config.verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    // Initialize metrics
    PrometheusReporter::init_metrics()?;

    info!("Starting Ajax UART bridge");
    info!("  Name: {}", config.name);
    info!("  Serial port: {} @ {} baud", config.port, config.baudrate);
    info!("  Metrics port: {}", config.metrics_port);

    // Convert CLI config to domain configs
    let bridge_config = config
        .to_bridge_config()
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    let reconnect_policy = config
        .to_reconnect_policy()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    // Start metrics server
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let metrics_server = tokio::spawn(serve_metrics(config.metrics_port, async move {
        shutdown_rx.await.ok();
    }));

    // Create infrastructure implementations (dependency injection)
    let mut bridge = BridgeService::new(
        bridge_config,
        reconnect_policy,
        Arc::new(SerialLineTransport::new()),
        DecoderRegistry::with_supported_messages(),
        Arc::new(LogSink),
        Arc::new(PrometheusReporter::new()),
    );

    let outcome = tokio::select! {
        started = bridge.start() => started,
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal before the bridge connected");
            Ok(())
        }
    };

    let outcome = match outcome {
        Ok(()) if bridge.is_active() => {
            // Runs until Ctrl+C or the reconnect budget is spent
            tokio::select! {
                finished = bridge.wait() => finished,
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    Ok(())
                }
            }
        }
        other => other,
    };

    bridge.stop().await;

    // Signal shutdown to metrics server
    let _ = shutdown_tx.send(());
    metrics_server.await?;

    if let Err(e) = outcome {
        error!("Bridge stopped: {}", e);
        return Err(e.into());
    }

    info!("Bridge shutdown complete");
    Ok(())
}
