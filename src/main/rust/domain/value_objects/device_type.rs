use std::fmt;

use serde::Serialize;

/// Kind of Ajax device that produced a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceType {
    Unknown,
    DoorProtect,
    MotionProtect,
    FireProtect,
    GlassProtect,
    LeaksProtect,
    CombiProtect,
    FireProtectPlus,
    SpaceControl,
    MotionProtectPlus,
}

impl DeviceType {
    /// Map a wire code to a device type.
    /// Returns `None` for codes outside the table; only 0 means `Unknown`.
    pub fn from_code(code: i64) -> Option<Self> {
        let device = match code {
            0 => Self::Unknown,
            1 => Self::DoorProtect,
            2 => Self::MotionProtect,
            3 => Self::FireProtect,
            4 => Self::GlassProtect,
            5 => Self::LeaksProtect,
            8 => Self::CombiProtect,
            9 => Self::FireProtectPlus,
            11 => Self::SpaceControl,
            14 => Self::MotionProtectPlus,
            _ => return None,
        };
        Some(device)
    }

    pub fn code(&self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::DoorProtect => 1,
            Self::MotionProtect => 2,
            Self::FireProtect => 3,
            Self::GlassProtect => 4,
            Self::LeaksProtect => 5,
            Self::CombiProtect => 8,
            Self::FireProtectPlus => 9,
            Self::SpaceControl => 11,
            Self::MotionProtectPlus => 14,
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "UNKNOWN",
            Self::DoorProtect => "DOOR_PROTECT",
            Self::MotionProtect => "MOTION_PROTECT",
            Self::FireProtect => "FIRE_PROTECT",
            Self::GlassProtect => "GLASS_PROTECT",
            Self::LeaksProtect => "LEAKS_PROTECT",
            Self::CombiProtect => "COMBI_PROTECT",
            Self::FireProtectPlus => "FIRE_PROTECT_PLUS",
            Self::SpaceControl => "SPACE_CONTROL",
            Self::MotionProtectPlus => "MOTION_PROTECT_PLUS",
        };
        write!(f, "{}", name)
    }
}
