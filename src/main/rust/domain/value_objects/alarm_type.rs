use std::fmt;

use serde::Serialize;

/// Alarm condition reported by an `ALARM` frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlarmType {
    TamperAlarm,
    TamperRestored,
    TamperRestoredDual,
    LoopAlarm,
    LoopRestored,
    LoopRestoredDual,
    TerminalOpen,
    TerminalClosed,
    TerminalClosedDual,
    SmokeAlarm,
    SmokeAlarmRestored,
    SmokeAlarmRestoredDual,
    Co2Alarm,
    Co2AlarmRestored,
    Co2AlarmRestoredDual,
    TemperatureAlarm,
    TemperatureAlarmRestored,
    TemperatureAlarmRestoredDual,
    FloodAlarm,
    FloodAlarmRestored,
    FloodAlarmRestoredDual,
    MotionDetected,
    GlassBreakAlarm,
    ExtremeTemperatureAlarm,
    ExtremeTemperatureRestored,
    UnknownAlarm,
    LowBatteryAlarm,
    LowBatteryAlarmRestored,
    SensorLostAlarm,
    SensorLostAlarmRestored,
}

/// Wire code and display name for every alarm kind
static ALARM_TABLE: [(AlarmType, u8, &str); 30] = [
    (AlarmType::TamperAlarm, 1, "TAMPER_ALARM"),
    (AlarmType::TamperRestored, 2, "TAMPER_RESTORED"),
    (AlarmType::TamperRestoredDual, 3, "TAMPER_RESTORED_DUAL"),
    (AlarmType::LoopAlarm, 4, "LOOP_ALARM"),
    (AlarmType::LoopRestored, 5, "LOOP_RESTORED"),
    (AlarmType::LoopRestoredDual, 6, "LOOP_RESTORED_DUAL"),
    (AlarmType::TerminalOpen, 7, "TERMINAL_OPEN"),
    (AlarmType::TerminalClosed, 8, "TERMINAL_CLOSED"),
    (AlarmType::TerminalClosedDual, 9, "TERMINAL_CLOSED_DUAL"),
    (AlarmType::SmokeAlarm, 10, "SMOKE_ALARM"),
    (AlarmType::SmokeAlarmRestored, 11, "SMOKE_ALARM_RESTORED"),
    (AlarmType::SmokeAlarmRestoredDual, 12, "SMOKE_ALARM_RESTORED_DUAL"),
    (AlarmType::Co2Alarm, 13, "CO2_ALARM"),
    (AlarmType::Co2AlarmRestored, 14, "CO2_ALARM_RESTORED"),
    (AlarmType::Co2AlarmRestoredDual, 15, "CO2_ALARM_RESTORED_DUAL"),
    (AlarmType::TemperatureAlarm, 16, "TEMPERATURE_ALARM"),
    (AlarmType::TemperatureAlarmRestored, 17, "TEMPERATURE_ALARM_RESTORED"),
    (AlarmType::TemperatureAlarmRestoredDual, 18, "TEMPERATURE_ALARM_RESTORED_DUAL"),
    (AlarmType::FloodAlarm, 19, "FLOOD_ALARM"),
    (AlarmType::FloodAlarmRestored, 20, "FLOOD_ALARM_RESTORED"),
    (AlarmType::FloodAlarmRestoredDual, 21, "FLOOD_ALARM_RESTORED_DUAL"),
    (AlarmType::MotionDetected, 22, "MOTION_DETECTED"),
    (AlarmType::GlassBreakAlarm, 23, "GLASS_BREAK_ALARM"),
    (AlarmType::ExtremeTemperatureAlarm, 32, "EXTREME_TEMPERATURE_ALARM"),
    (AlarmType::ExtremeTemperatureRestored, 33, "EXTREME_TEMPERATURE_RESTORED"),
    (AlarmType::UnknownAlarm, 39, "UNKNOWN_ALARM"),
    (AlarmType::LowBatteryAlarm, 41, "LOW_BATTERY_ALARM"),
    (AlarmType::LowBatteryAlarmRestored, 42, "LOW_BATTERY_ALARM_RESTORED"),
    (AlarmType::SensorLostAlarm, 43, "SENSOR_LOST_ALARM"),
    (AlarmType::SensorLostAlarmRestored, 44, "SENSOR_LOST_ALARM_RESTORED"),
];

impl AlarmType {
    /// Codes missing from the table have no alarm kind
    pub fn from_code(code: i64) -> Option<Self> {
        ALARM_TABLE
            .iter()
            .find(|(_, c, _)| i64::from(*c) == code)
            .map(|(alarm, _, _)| *alarm)
    }

    pub fn code(&self) -> u8 {
        self.entry().1
    }

    pub fn name(&self) -> &'static str {
        self.entry().2
    }

    fn entry(&self) -> &'static (AlarmType, u8, &'static str) {
        // every variant has exactly one row
        ALARM_TABLE
            .iter()
            .find(|(alarm, _, _)| alarm == self)
            .unwrap_or(&ALARM_TABLE[0])
    }

    pub fn all() -> impl Iterator<Item = AlarmType> {
        ALARM_TABLE.iter().map(|(alarm, _, _)| *alarm)
    }
}

impl fmt::Display for AlarmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
