use std::sync::Arc;

use crate::domain::entities::{AlarmMessage, ClassifiedLine, Message, StatusMessage};
use crate::domain::errors::{DomainError, Result};
use crate::domain::value_objects::{AlarmType, DeviceType};

/// Marker that introduces the telemetry block of a status frame
pub const PING_MARKER: &str = "PING";

/// Raw value flagging a low battery
const LOW_BATTERY_SET: &str = "1";

/// `ALARM;<deviceType>;<deviceId>;<alarmCode>;...`
pub fn decode_alarm(line: Arc<ClassifiedLine>) -> Result<Message> {
    let device_type = device_type_field(&line, 0)?;
    let device_id = text_field(&line, 1)?.to_string();

    let code = int_field(&line, 2)?;
    let alarm_type = AlarmType::from_code(code).ok_or_else(|| {
        DomainError::decode(line.original(), format!("{} is not a valid alarm type", code))
    })?;

    Ok(Message::Alarm(AlarmMessage {
        device_type,
        device_id,
        alarm_type,
        source_line: line,
    }))
}

/// `STATUS;<deviceType>;<deviceId>;...` with an optional trailing
/// `PING;<noise>;<rssi>;<lowBattery>` block
pub fn decode_status(line: Arc<ClassifiedLine>) -> Result<Message> {
    let device_type = device_type_field(&line, 0)?;
    let device_id = text_field(&line, 1)?.to_string();

    let (noise, rssi, low_battery) = match ping_telemetry(line.fields()) {
        Some([noise, rssi, battery]) => (
            Some(noise.clone()),
            Some(rssi.clone()),
            Some(battery == LOW_BATTERY_SET),
        ),
        None => (None, None, None),
    };

    Ok(Message::Status(StatusMessage {
        device_type,
        device_id,
        noise,
        rssi,
        low_battery,
        source_line: line,
    }))
}

/// Trailing noise, rssi and battery fields when the marker sits right before them
fn ping_telemetry(fields: &[String]) -> Option<&[String; 3]> {
    // marker can't overlap the device type and id
    let marker = fields.len().checked_sub(4).filter(|index| *index >= 2)?;
    if fields[marker] != PING_MARKER {
        return None;
    }
    fields[marker + 1..].try_into().ok()
}

fn text_field(line: &ClassifiedLine, index: usize) -> Result<&str> {
    line.field(index).ok_or_else(|| {
        DomainError::decode(line.original(), format!("missing field {}", index))
    })
}

fn int_field(line: &ClassifiedLine, index: usize) -> Result<i64> {
    let raw = text_field(line, index)?;
    raw.trim().parse::<i64>().map_err(|e| {
        DomainError::decode(
            line.original(),
            format!("field {} ({:?}) is not an integer: {}", index, raw, e),
        )
    })
}

fn device_type_field(line: &ClassifiedLine, index: usize) -> Result<DeviceType> {
    let code = int_field(line, index)?;
    DeviceType::from_code(code).ok_or_else(|| {
        DomainError::decode(
            line.original(),
            format!("{} is not a valid device type", code),
        )
    })
}
