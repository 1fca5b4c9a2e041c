use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedReceiver;

use ajax_uart_bridge::{
    AlarmType, BridgeConfig, BridgeEvent, BridgeService, BridgeState, ChannelSink, Classifier,
    DecoderRegistry, DeviceType, DomainError, FailureKind, LineConnection, LineTransport, Message,
    MetricsReporter, ReconnectPolicy, SinkEnvelope, StopReason,
};

enum ReadStep {
    Line(&'static str),
    Fail(&'static str),
}

enum OpenStep {
    Connect(Vec<ReadStep>),
    Fail(&'static str),
}

/// Transport replaying a fixed script of open and read outcomes
#[derive(Default)]
struct ScriptedTransport {
    script: Mutex<VecDeque<OpenStep>>,
    opens: AtomicUsize,
    closes: Arc<AtomicUsize>,
}

impl ScriptedTransport {
    fn new(script: Vec<OpenStep>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            ..Default::default()
        })
    }

    fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LineTransport for ScriptedTransport {
    async fn open(&self, _config: &BridgeConfig) -> ajax_uart_bridge::Result<Box<dyn LineConnection>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        let step = self.script.lock().unwrap().pop_front();
        match step {
            Some(OpenStep::Connect(reads)) => Ok(Box::new(ScriptedConnection {
                reads: reads.into(),
                closes: self.closes.clone(),
                closed: false,
            })),
            Some(OpenStep::Fail(reason)) => Err(DomainError::Communication(reason.to_string())),
            None => Err(DomainError::Communication("no such device".to_string())),
        }
    }
}

struct ScriptedConnection {
    reads: VecDeque<ReadStep>,
    closes: Arc<AtomicUsize>,
    closed: bool,
}

#[async_trait]
impl LineConnection for ScriptedConnection {
    async fn read_line(&mut self) -> ajax_uart_bridge::Result<String> {
        match self.reads.pop_front() {
            Some(ReadStep::Line(line)) => Ok(line.to_string()),
            Some(ReadStep::Fail(reason)) => Err(DomainError::Communication(reason.to_string())),
            // Quiet line: wait until cancelled
            None => std::future::pending().await,
        }
    }

    async fn close(&mut self) -> ajax_uart_bridge::Result<()> {
        if !self.closed {
            self.closed = true;
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

struct NoopMetrics;

impl MetricsReporter for NoopMetrics {
    fn report_state_change(&self, _bridge: &str, _state: &BridgeState) {}
    fn report_reconnect_attempt(&self, _bridge: &str) {}
    fn report_message_decoded(&self, _bridge: &str, _tag: &str) {}
    fn report_line_failed(&self, _bridge: &str, _kind: &FailureKind) {}
    fn report_line_ignored(&self, _bridge: &str) {}
}

fn create_bridge(
    name: &str,
    transport: Arc<ScriptedTransport>,
    max_attempts: i64,
) -> (BridgeService, UnboundedReceiver<SinkEnvelope>) {
    let config = BridgeConfig::new(
        name.to_string(),
        "/dev/ttyUSB0".to_string(),
        57600,
        Duration::from_secs(3),
    )
    .unwrap();
    let policy = ReconnectPolicy::new(max_attempts, 4).unwrap();
    let (sink, events) = ChannelSink::new();

    let bridge = BridgeService::new(
        config,
        policy,
        transport,
        DecoderRegistry::with_supported_messages(),
        Arc::new(sink),
        Arc::new(NoopMetrics),
    );
    (bridge, events)
}

async fn next_event(events: &mut UnboundedReceiver<SinkEnvelope>) -> BridgeEvent {
    events.recv().await.expect("sink closed").event
}

async fn wait_until_inactive(bridge: &BridgeService) {
    while bridge.is_active() {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}

#[test]
fn test_classifier_skips_unregistered_tags() {
    let classifier = Classifier::new(&DecoderRegistry::with_supported_messages());
    assert!(classifier.classify("FOO;1;2;3").is_none());
    assert!(classifier.classify("").is_none());
    assert!(classifier.classify("SYNC;1;2").is_none());
}

#[test]
fn test_short_lines_fail_with_original_text() {
    let registry = DecoderRegistry::with_supported_messages();
    let classifier = Classifier::new(&registry);

    for raw in ["ALARM;3;DEV9", "ALARM;3", "STATUS;2"] {
        let line = classifier.classify(raw).unwrap();
        match registry.decode(line) {
            Err(DomainError::Decode { original_line, .. }) => assert_eq!(original_line, raw),
            other => panic!("expected decode error for {}, got {:?}", raw, other),
        }
    }
}

#[test]
fn test_alarm_fields_match_input() {
    let registry = DecoderRegistry::with_supported_messages();
    let classifier = Classifier::new(&registry);

    for (raw, device, id, alarm) in [
        ("ALARM;3;DEV9;22", DeviceType::FireProtect, "DEV9", AlarmType::MotionDetected),
        ("ALARM;0;a b;1", DeviceType::Unknown, "a b", AlarmType::TamperAlarm),
        ("ALARM;14;1F2E;44", DeviceType::MotionProtectPlus, "1F2E", AlarmType::SensorLostAlarmRestored),
    ] {
        let message = registry.decode(classifier.classify(raw).unwrap()).unwrap();
        let Message::Alarm(decoded) = message else {
            panic!("expected alarm for {}", raw);
        };
        assert_eq!(decoded.device_type, device);
        assert_eq!(decoded.device_id, id);
        assert_eq!(decoded.alarm_type, alarm);
    }
}

#[tokio::test(start_paused = true)]
async fn test_read_loop_isolates_bad_lines() {
    let transport = ScriptedTransport::new(vec![OpenStep::Connect(vec![
        ReadStep::Line("ALARM;3;DEV9;22"),
        ReadStep::Line("FOO;1;2;3"),
        ReadStep::Line(""),
        ReadStep::Line("STATUS;2;DEV123;x;x;x;x;PING;37;-62;1"),
        ReadStep::Line("ALARM;3;DEV9"),
        ReadStep::Line("ALARM;3;DEV9;99"),
        ReadStep::Line("STATUS;2;DEV123;idle"),
    ])]);
    let (mut bridge, mut events) = create_bridge("isolation", transport.clone(), -1);

    bridge.start().await.unwrap();
    assert_eq!(bridge.current_state().await, BridgeState::Running);

    match next_event(&mut events).await {
        BridgeEvent::Message(Message::Alarm(alarm)) => {
            assert_eq!(alarm.device_type, DeviceType::FireProtect);
            assert_eq!(alarm.device_id, "DEV9");
            assert_eq!(alarm.alarm_type, AlarmType::MotionDetected);
        }
        other => panic!("unexpected event {:?}", other),
    }

    match next_event(&mut events).await {
        BridgeEvent::Message(Message::Status(status)) => {
            assert_eq!(status.device_type, DeviceType::MotionProtect);
            assert_eq!(status.device_id, "DEV123");
            assert_eq!(status.noise.as_deref(), Some("37"));
            assert_eq!(status.rssi.as_deref(), Some("-62"));
            assert_eq!(status.low_battery, Some(true));
        }
        other => panic!("unexpected event {:?}", other),
    }

    for expected in ["ALARM;3;DEV9", "ALARM;3;DEV9;99"] {
        let event = next_event(&mut events).await;
        let failure = event.failure().expect("failure record");
        assert_eq!(failure.original_line, expected);
        assert!(matches!(failure.kind, FailureKind::Decode { .. }));
    }

    match next_event(&mut events).await {
        BridgeEvent::Message(Message::Status(status)) => {
            assert_eq!(status.device_id, "DEV123");
            assert!(status.noise.is_none());
            assert!(status.rssi.is_none());
            assert!(status.low_battery.is_none());
        }
        other => panic!("unexpected event {:?}", other),
    }

    // FOO and the blank line produced nothing
    assert!(events.try_recv().is_err());
    assert!(bridge.is_active());

    bridge.stop().await;
    assert_eq!(
        bridge.current_state().await,
        BridgeState::Stopped(StopReason::Clean)
    );
    assert_eq!(transport.closes(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_start_twice_is_rejected() {
    let transport = ScriptedTransport::new(vec![OpenStep::Connect(vec![])]);
    let (mut bridge, _events) = create_bridge("twice", transport.clone(), -1);

    bridge.start().await.unwrap();
    let err = bridge.start().await.unwrap_err();

    assert!(matches!(err, DomainError::AlreadyStarted(ref name) if name == "twice"));
    assert!(bridge.is_active());
    assert_eq!(bridge.current_state().await, BridgeState::Running);
    assert_eq!(transport.opens(), 1);

    bridge.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_stop_is_idempotent() {
    let transport = ScriptedTransport::new(vec![OpenStep::Connect(vec![])]);
    let (mut bridge, _events) = create_bridge("idempotent", transport.clone(), -1);

    bridge.start().await.unwrap();
    bridge.stop().await;
    bridge.stop().await;

    assert!(!bridge.is_active());
    assert_eq!(
        bridge.current_state().await,
        BridgeState::Stopped(StopReason::Clean)
    );
    assert_eq!(transport.closes(), 1);
}

#[tokio::test]
async fn test_stop_without_start() {
    let transport = ScriptedTransport::new(vec![]);
    let (mut bridge, _events) = create_bridge("idle", transport.clone(), -1);

    bridge.stop().await;

    assert_eq!(
        bridge.current_state().await,
        BridgeState::Stopped(StopReason::Clean)
    );
    assert_eq!(transport.opens(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_mid_stream_failure_exhausts_budget() {
    let transport = ScriptedTransport::new(vec![
        OpenStep::Connect(vec![
            ReadStep::Line("ALARM;3;DEV9;22"),
            ReadStep::Fail("device unplugged"),
        ]),
        OpenStep::Fail("reconnect failed once"),
        OpenStep::Fail("reconnect failed twice"),
        OpenStep::Connect(vec![]),
    ]);
    let (mut bridge, mut events) = create_bridge("budget", transport.clone(), 2);
    let started_at = tokio::time::Instant::now();

    bridge.start().await.unwrap();
    assert!(next_event(&mut events).await.message().is_some());

    let err = bridge.wait().await.unwrap_err();
    assert!(matches!(err, DomainError::Communication(ref reason) if reason == "reconnect failed twice"));

    assert_eq!(
        bridge.current_state().await,
        BridgeState::Stopped(StopReason::Failed)
    );
    assert_eq!(transport.opens(), 3);
    assert_eq!(transport.closes(), 1);

    // half interval after the drop, full interval after the first failed attempt
    let elapsed = started_at.elapsed();
    assert!(elapsed >= Duration::from_secs(6) && elapsed < Duration::from_secs(7));
}

#[tokio::test(start_paused = true)]
async fn test_initial_connect_failure_is_returned() {
    let transport = ScriptedTransport::new(vec![
        OpenStep::Fail("no device"),
        OpenStep::Fail("still no device"),
    ]);
    let (mut bridge, _events) = create_bridge("initial", transport.clone(), 2);

    let err = bridge.start().await.unwrap_err();

    assert!(err.is_communication());
    assert!(!bridge.is_active());
    assert_eq!(
        bridge.current_state().await,
        BridgeState::Stopped(StopReason::Failed)
    );
    assert_eq!(transport.opens(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_initial_connect_retries_with_full_interval() {
    let transport = ScriptedTransport::new(vec![
        OpenStep::Fail("no device"),
        OpenStep::Fail("no device"),
        OpenStep::Connect(vec![]),
    ]);
    let (mut bridge, _events) = create_bridge("retry", transport.clone(), -1);
    let started_at = tokio::time::Instant::now();

    bridge.start().await.unwrap();

    let elapsed = started_at.elapsed();
    assert!(elapsed >= Duration::from_secs(8) && elapsed < Duration::from_secs(9));
    assert_eq!(bridge.current_state().await, BridgeState::Running);

    let states: Vec<BridgeState> = bridge.history().await.iter().map(|t| t.to).collect();
    assert_eq!(
        states,
        vec![
            BridgeState::Connecting,
            BridgeState::ReconnectBackoff { attempt: 1 },
            BridgeState::Connecting,
            BridgeState::ReconnectBackoff { attempt: 2 },
            BridgeState::Connecting,
            BridgeState::Running,
        ]
    );

    bridge.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_recovers_after_transport_failure() {
    let transport = ScriptedTransport::new(vec![
        OpenStep::Connect(vec![
            ReadStep::Line("ALARM;1;DOOR1;7"),
            ReadStep::Fail("read error"),
        ]),
        OpenStep::Connect(vec![ReadStep::Line("ALARM;1;DOOR1;8")]),
    ]);
    let (mut bridge, mut events) = create_bridge("recover", transport.clone(), 2);

    bridge.start().await.unwrap();

    let first = next_event(&mut events).await;
    let second = next_event(&mut events).await;
    let alarm = |event: &BridgeEvent| match event.message() {
        Some(Message::Alarm(alarm)) => alarm.alarm_type,
        other => panic!("unexpected message {:?}", other),
    };
    assert_eq!(alarm(&first), AlarmType::TerminalOpen);
    assert_eq!(alarm(&second), AlarmType::TerminalClosed);

    assert!(bridge.is_active());
    assert_eq!(bridge.current_state().await, BridgeState::Running);
    assert_eq!(transport.opens(), 2);
    assert_eq!(transport.closes(), 1);

    bridge.stop().await;
    assert_eq!(transport.closes(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_stop_during_backoff() {
    let transport = ScriptedTransport::new(vec![OpenStep::Connect(vec![ReadStep::Fail(
        "device unplugged",
    )])]);
    let (mut bridge, _events) = create_bridge("backoff", transport.clone(), -1);

    bridge.start().await.unwrap();
    // 2s recovery wait, then the reopen fails and a 4s backoff begins
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(
        bridge.current_state().await,
        BridgeState::ReconnectBackoff { attempt: 1 }
    );

    bridge.stop().await;

    assert!(!bridge.is_active());
    assert_eq!(
        bridge.current_state().await,
        BridgeState::Stopped(StopReason::Clean)
    );
    assert_eq!(transport.opens(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_restart_after_unobserved_failure() {
    let transport = ScriptedTransport::new(vec![
        OpenStep::Connect(vec![ReadStep::Fail("device unplugged")]),
        OpenStep::Fail("no device"),
        OpenStep::Connect(vec![]),
    ]);
    let (mut bridge, _events) = create_bridge("restart", transport.clone(), 1);

    bridge.start().await.unwrap();
    wait_until_inactive(&bridge).await;
    assert_eq!(
        bridge.current_state().await,
        BridgeState::Stopped(StopReason::Failed)
    );

    bridge.start().await.unwrap();

    assert_eq!(bridge.current_state().await, BridgeState::Running);
    assert!(bridge
        .history()
        .await
        .iter()
        .any(|t| t.to == BridgeState::Disconnected));
    assert_eq!(transport.opens(), 3);

    bridge.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_bridges_are_independent() {
    let failing = ScriptedTransport::new(vec![OpenStep::Connect(vec![ReadStep::Fail(
        "device unplugged",
    )])]);
    let healthy = ScriptedTransport::new(vec![OpenStep::Connect(vec![])]);

    let (mut first, _first_events) = create_bridge("first", failing, 0);
    let (mut second, _second_events) = create_bridge("second", healthy, 0);

    first.start().await.unwrap();
    second.start().await.unwrap();

    assert!(first.wait().await.is_err());
    assert_eq!(second.current_state().await, BridgeState::Running);
    assert!(second.is_active());

    second.stop().await;
}
