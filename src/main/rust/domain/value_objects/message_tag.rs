/// Type tags that open a frame on the wire
pub const TAG_ALARM: &str = "ALARM";
pub const TAG_STATUS: &str = "STATUS";

/// Known to the gateway protocol but not decoded
pub const TAG_EVENT: &str = "EVENT";
pub const TAG_SYNC: &str = "SYNC";
pub const TAG_RSTATE: &str = "RSTATE";

/// Separator between frame fields
pub const FIELD_SEPARATOR: char = ';';
