use std::time::Instant;

use crate::domain::value_objects::{BridgeState, ReconnectPolicy, StopReason};

/// State transition record
#[derive(Debug, Clone)]
pub struct StateTransition {
    pub from: BridgeState,
    pub to: BridgeState,
    pub timestamp: Instant,
    pub reason: Option<String>,
}

/// Domain entity tracking the supervisor state of one bridge
#[derive(Debug)]
pub struct BridgeLifecycle {
    current_state: BridgeState,
    state_history: Vec<StateTransition>,
    running_since: Option<Instant>,
    failed_attempts: u32,
}

impl BridgeLifecycle {
    pub fn new() -> Self {
        Self {
            current_state: BridgeState::Disconnected,
            state_history: Vec::new(),
            running_since: None,
            failed_attempts: 0,
        }
    }

    pub fn current_state(&self) -> BridgeState {
        self.current_state
    }

    /// Time since the bridge last entered `Running`
    pub fn uptime(&self) -> Option<std::time::Duration> {
        self.running_since.map(|start| start.elapsed())
    }

    pub fn transition_count(&self) -> usize {
        self.state_history.len()
    }

    pub fn last_transition(&self) -> Option<&StateTransition> {
        self.state_history.last()
    }

    pub fn history(&self) -> &[StateTransition] {
        &self.state_history
    }

    /// Consecutive failed connection attempts since the last successful open
    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    pub fn transition_to_disconnected(&mut self, reason: Option<String>) {
        self.running_since = None;
        self.record_transition(BridgeState::Disconnected, reason);
    }

    pub fn transition_to_connecting(&mut self) {
        self.record_transition(BridgeState::Connecting, None);
    }

    /// Successful open resets the attempt counter
    pub fn transition_to_running(&mut self) {
        self.failed_attempts = 0;
        self.running_since = Some(Instant::now());
        self.record_transition(BridgeState::Running, None);
    }

    /// Count a failed open; returns the number of consecutive failures
    pub fn register_failed_attempt(&mut self) -> u32 {
        self.failed_attempts = self.failed_attempts.saturating_add(1);
        self.failed_attempts
    }

    pub fn transition_to_backoff(&mut self, reason: Option<String>) {
        let attempt = self.failed_attempts;
        self.record_transition(BridgeState::ReconnectBackoff { attempt }, reason);
    }

    /// Connection lost while running; no attempt has failed yet
    pub fn transition_to_recovery(&mut self, reason: Option<String>) {
        self.running_since = None;
        self.failed_attempts = 0;
        self.record_transition(BridgeState::ReconnectBackoff { attempt: 0 }, reason);
    }

    pub fn transition_to_stopped(&mut self, stop: StopReason, reason: Option<String>) {
        self.running_since = None;
        self.record_transition(BridgeState::Stopped(stop), reason);
    }

    fn record_transition(&mut self, new_state: BridgeState, reason: Option<String>) {
        let transition = StateTransition {
            from: self.current_state,
            to: new_state,
            timestamp: Instant::now(),
            reason,
        };

        self.state_history.push(transition);
        self.current_state = new_state;
    }

    /// Pure business rule: may another connection attempt follow the failure just recorded?
    pub fn should_continue_retrying(&self, policy: &ReconnectPolicy) -> bool {
        policy.allows_retry(self.failed_attempts)
    }
}

impl Default for BridgeLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
