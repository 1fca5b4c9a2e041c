use std::collections::BTreeMap;
use std::sync::Arc;

use super::decoders::{decode_alarm, decode_status};
use crate::domain::entities::{ClassifiedLine, Message};
use crate::domain::errors::{DomainError, Result};
use crate::domain::value_objects::message_tag::{TAG_ALARM, TAG_STATUS};

/// Turns the fields of a classified line into a message
pub type DecodeFn = fn(Arc<ClassifiedLine>) -> Result<Message>;

/// Mapping from type tag to its decoder.
///
/// Built once per bridge; its keys are exactly the tags the classifier accepts.
#[derive(Debug, Clone, Default)]
pub struct DecoderRegistry {
    decoders: BTreeMap<&'static str, DecodeFn>,
}

impl DecoderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry covering `ALARM` and `STATUS`
    pub fn with_supported_messages() -> Self {
        Self::new()
            .register(TAG_ALARM, decode_alarm)
            .register(TAG_STATUS, decode_status)
    }

    pub fn register(mut self, tag: &'static str, decoder: DecodeFn) -> Self {
        self.decoders.insert(tag, decoder);
        self
    }

    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.decoders.keys().copied()
    }

    pub fn supports(&self, tag: &str) -> bool {
        self.decoders.contains_key(tag)
    }

    /// Look up the decoder for the line's tag and run it
    pub fn decode(&self, line: ClassifiedLine) -> Result<Message> {
        let decoder = self
            .decoders
            .get(line.tag())
            .ok_or_else(|| DomainError::UnknownMessageType(line.original().to_string()))?;
        decoder(Arc::new(line))
    }
}
