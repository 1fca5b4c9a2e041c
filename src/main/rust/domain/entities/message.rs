use std::sync::Arc;

use serde::Serialize;

use super::ClassifiedLine;
use crate::domain::value_objects::{AlarmType, DeviceType};

/// Alarm raised by a device
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlarmMessage {
    pub device_type: DeviceType,
    pub device_id: String,
    pub alarm_type: AlarmType,
    #[serde(skip)]
    pub source_line: Arc<ClassifiedLine>,
}

/// Device status report; telemetry is only present on PING frames
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusMessage {
    pub device_type: DeviceType,
    pub device_id: String,
    pub noise: Option<String>,
    pub rssi: Option<String>,
    pub low_battery: Option<bool>,
    #[serde(skip)]
    pub source_line: Arc<ClassifiedLine>,
}

impl StatusMessage {
    pub fn is_ping(&self) -> bool {
        self.low_battery.is_some()
    }
}

/// Decoded frame from the gateway
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    Alarm(AlarmMessage),
    Status(StatusMessage),
}

impl Message {
    pub fn tag(&self) -> &'static str {
        self.source_line().tag()
    }

    pub fn device_type(&self) -> DeviceType {
        match self {
            Self::Alarm(alarm) => alarm.device_type,
            Self::Status(status) => status.device_type,
        }
    }

    pub fn device_id(&self) -> &str {
        match self {
            Self::Alarm(alarm) => &alarm.device_id,
            Self::Status(status) => &status.device_id,
        }
    }

    /// Line this message was decoded from
    pub fn source_line(&self) -> &ClassifiedLine {
        match self {
            Self::Alarm(alarm) => &alarm.source_line,
            Self::Status(status) => &status.source_line,
        }
    }
}
