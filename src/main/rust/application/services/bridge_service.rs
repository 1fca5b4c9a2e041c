use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use crate::domain::entities::{BridgeEvent, BridgeLifecycle, FailureRecord, StateTransition};
use crate::domain::errors::{DomainError, Result};
use crate::domain::ports::{LineConnection, LineTransport, MessageSink, MetricsReporter};
use crate::domain::services::{Classifier, DecoderRegistry};
use crate::domain::value_objects::{BridgeConfig, BridgeState, ReconnectPolicy, StopReason};

/// How the read loop ended
enum LoopExit {
    Cancelled,
    Failed(DomainError),
}

/// State shared between the bridge handle and its control task
struct BridgeContext {
    config: BridgeConfig,
    policy: ReconnectPolicy,
    transport: Arc<dyn LineTransport>,
    registry: DecoderRegistry,
    classifier: Classifier,
    sink: Arc<dyn MessageSink>,
    metrics: Arc<dyn MetricsReporter>,
    lifecycle: Mutex<BridgeLifecycle>,
}

/// Application service supervising one UART bridge
///
/// `start` connects (retrying per the reconnect policy) and spawns a control
/// task that owns the connection. The task reads lines, routes them through
/// the classifier and decoders, and reconnects on communication errors.
/// `stop` signals the task, waits for it to close the connection and clears it.
pub struct BridgeService {
    context: Arc<BridgeContext>,
    shutdown: Option<watch::Sender<bool>>,
    task: Option<JoinHandle<Result<()>>>,
}

impl BridgeService {
    pub fn new(
        config: BridgeConfig,
        policy: ReconnectPolicy,
        transport: Arc<dyn LineTransport>,
        registry: DecoderRegistry,
        sink: Arc<dyn MessageSink>,
        metrics: Arc<dyn MetricsReporter>,
    ) -> Self {
        let classifier = Classifier::new(&registry);
        Self {
            context: Arc::new(BridgeContext {
                config,
                policy,
                transport,
                registry,
                classifier,
                sink,
                metrics,
                lifecycle: Mutex::new(BridgeLifecycle::new()),
            }),
            shutdown: None,
            task: None,
        }
    }

    pub fn name(&self) -> &str {
        self.context.config.name()
    }

    pub async fn current_state(&self) -> BridgeState {
        self.context.lifecycle.lock().await.current_state()
    }

    pub async fn history(&self) -> Vec<StateTransition> {
        self.context.lifecycle.lock().await.history().to_vec()
    }

    /// Control task exists and has not finished
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Connect and spawn the read loop.
    ///
    /// Returns once the bridge is running, `AlreadyStarted` if it already is,
    /// or the last communication error once the reconnect budget is spent.
    pub async fn start(&mut self) -> Result<()> {
        if let Some(task) = &self.task {
            if !task.is_finished() {
                return Err(DomainError::AlreadyStarted(self.name().to_string()));
            }

            tracing::warn!(bridge = %self.name(), "Read loop exited unobserved, closing it");
            self.reap().await;
            self.context
                .transition(|lifecycle| {
                    lifecycle.transition_to_disconnected(Some("Read loop exited".to_string()))
                })
                .await;
        }

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let Some(connection) = self.context.connect(&mut shutdown_rx).await? else {
            // sender is alive here, so this only happens if the receiver was closed
            return Ok(());
        };

        let context = Arc::clone(&self.context);
        self.task = Some(tokio::spawn(context.supervise(connection, shutdown_rx)));
        self.shutdown = Some(shutdown_tx);

        tracing::info!(bridge = %self.name(), port = %self.context.config.port(), "UART bridge started");
        Ok(())
    }

    /// Stop the bridge. Safe to call repeatedly.
    pub async fn stop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(true);
        }
        self.reap().await;

        let mut lifecycle = self.context.lifecycle.lock().await;
        if !lifecycle.current_state().is_stopped() {
            lifecycle.transition_to_stopped(StopReason::Clean, Some("Stopped by user".to_string()));
            self.context
                .metrics
                .report_state_change(self.name(), &lifecycle.current_state());
            tracing::info!(bridge = %self.name(), "UART bridge stopped");
        }
    }

    /// Wait for the control task to end and return its outcome.
    ///
    /// Completes only on a fatal error (reconnect budget spent) unless the
    /// bridge is stopped elsewhere. Cancel-safe.
    pub async fn wait(&mut self) -> Result<()> {
        let Some(task) = self.task.as_mut() else {
            return Ok(());
        };

        let outcome = task.await;
        self.task = None;
        self.shutdown = None;

        match outcome {
            Ok(result) => result,
            Err(e) => Err(DomainError::SupervisorTask(e.to_string())),
        }
    }

    async fn reap(&mut self) {
        self.shutdown = None;
        let Some(task) = self.task.take() else {
            return;
        };

        match task.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(bridge = %self.name(), "Bridge had stopped with error: {}", e),
            Err(e) => tracing::error!(bridge = %self.name(), "Bridge task ended abnormally: {}", e),
        }
    }
}

impl BridgeContext {
    fn name(&self) -> &str {
        self.config.name()
    }

    /// Control loop: read until the connection fails, then recover
    async fn supervise(
        self: Arc<Self>,
        mut connection: Box<dyn LineConnection>,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<()> {
        loop {
            let exit = self.read_lines(connection.as_mut(), &mut shutdown).await;
            self.close_connection(connection.as_mut()).await;

            let error = match exit {
                LoopExit::Cancelled => return Ok(()),
                LoopExit::Failed(error) => error,
            };

            let delay = self.policy.recovery_delay();
            tracing::warn!(bridge = %self.name(), "Serial communication error, re-connecting...");
            self.transition(|lifecycle| lifecycle.transition_to_recovery(Some(error.to_string())))
                .await;
            tracing::info!(
                bridge = %self.name(),
                "Closed serial connection, will try to reconnect in {:?}",
                delay
            );

            if !wait_or_stop(delay, &mut shutdown).await {
                return Ok(());
            }

            connection = match self.connect(&mut shutdown).await? {
                Some(connection) => connection,
                None => return Ok(()),
            };
        }
    }

    /// Open the transport, retrying while the policy allows.
    /// `None` means a stop was requested while connecting.
    async fn connect(
        &self,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Result<Option<Box<dyn LineConnection>>> {
        loop {
            self.transition(|lifecycle| lifecycle.transition_to_connecting())
                .await;

            let opened = tokio::select! {
                biased;
                _ = stop_requested(shutdown) => return Ok(None),
                opened = self.transport.open(&self.config) => opened,
            };

            let error = match opened {
                Ok(connection) => {
                    self.transition(|lifecycle| lifecycle.transition_to_running())
                        .await;
                    tracing::info!(bridge = %self.name(), "Connection established");
                    return Ok(Some(connection));
                }
                Err(error) => error,
            };

            if !error.is_communication() {
                self.transition(|lifecycle| {
                    lifecycle.transition_to_stopped(StopReason::Failed, Some(error.to_string()))
                })
                .await;
                return Err(error);
            }

            let (attempt, retry) = {
                let mut lifecycle = self.lifecycle.lock().await;
                let attempt = lifecycle.register_failed_attempt();
                (attempt, lifecycle.should_continue_retrying(&self.policy))
            };

            if !retry {
                tracing::error!(
                    bridge = %self.name(),
                    attempt,
                    "Serial communication error, giving up: {}",
                    error
                );
                self.transition(|lifecycle| {
                    lifecycle.transition_to_stopped(StopReason::Failed, Some(error.to_string()))
                })
                .await;
                return Err(error);
            }

            let delay = self.policy.retry_delay();
            tracing::warn!(
                bridge = %self.name(),
                attempt,
                "Serial communication error: {}. Another attempt will be performed in {:?}",
                error,
                delay
            );
            self.metrics.report_reconnect_attempt(self.name());
            self.transition(|lifecycle| lifecycle.transition_to_backoff(Some(error.to_string())))
                .await;

            if !wait_or_stop(delay, shutdown).await {
                return Ok(None);
            }
            tracing::info!(
                bridge = %self.name(),
                "Starting serial communication session. Attempt #{}",
                attempt + 1
            );
        }
    }

    /// Consume lines until the transport fails or a stop is requested
    async fn read_lines(
        &self,
        connection: &mut dyn LineConnection,
        shutdown: &mut watch::Receiver<bool>,
    ) -> LoopExit {
        loop {
            let line = tokio::select! {
                biased;
                _ = stop_requested(shutdown) => return LoopExit::Cancelled,
                line = connection.read_line() => line,
            };

            match line {
                Ok(line) => self.route_line(&line),
                Err(error) if error.is_communication() => {
                    tracing::error!(bridge = %self.name(), "Serial communication error: {}", error);
                    return LoopExit::Failed(error);
                }
                Err(error) => {
                    tracing::debug!(bridge = %self.name(), "Can't read message: {}", error);
                }
            }
        }
    }

    /// Classify and decode one line; failures never leave this function
    fn route_line(&self, raw: &str) {
        let Some(line) = self.classifier.classify(raw) else {
            if !raw.trim().is_empty() {
                tracing::debug!(bridge = %self.name(), line = raw, "Ignoring unrecognized line");
                self.metrics.report_line_ignored(self.name());
            }
            return;
        };

        match self.registry.decode(line) {
            Ok(message) => {
                tracing::debug!(
                    bridge = %self.name(),
                    tag = message.tag(),
                    device_id = message.device_id(),
                    "Parsed message"
                );
                self.metrics.report_message_decoded(self.name(), message.tag());
                self.sink.deliver(self.name(), BridgeEvent::Message(message));
            }
            Err(error) => match FailureRecord::from_error(&error) {
                Some(record) => {
                    tracing::debug!(bridge = %self.name(), "{}", error);
                    self.metrics.report_line_failed(self.name(), &record.kind);
                    self.sink.deliver(self.name(), BridgeEvent::Failure(record));
                }
                None => {
                    tracing::debug!(bridge = %self.name(), "Can't process message: {}", error);
                }
            },
        }
    }

    async fn close_connection(&self, connection: &mut dyn LineConnection) {
        if let Err(e) = connection.close().await {
            tracing::error!(bridge = %self.name(), "Unable to close serial connection: {}", e);
        }
    }

    async fn transition<F>(&self, apply: F) -> BridgeState
    where
        F: FnOnce(&mut BridgeLifecycle),
    {
        let state = {
            let mut lifecycle = self.lifecycle.lock().await;
            apply(&mut lifecycle);
            lifecycle.current_state()
        };

        self.metrics.report_state_change(self.name(), &state);
        tracing::debug!(bridge = %self.name(), state = %state, "Bridge state changed");
        state
    }
}

/// Resolves once a stop was requested or the bridge handle is gone
async fn stop_requested(shutdown: &mut watch::Receiver<bool>) {
    loop {
        let stopped = *shutdown.borrow_and_update();
        if stopped || shutdown.changed().await.is_err() {
            return;
        }
    }
}

/// Sleep for `delay`; `false` if a stop arrived first
async fn wait_or_stop(delay: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    tokio::select! {
        biased;
        _ = stop_requested(shutdown) => false,
        _ = tokio::time::sleep(delay) => true,
    }
}
