use serde::Serialize;

use super::Message;
use crate::domain::errors::DomainError;

/// Why a classified line produced no message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureKind {
    UnknownMessageType,
    Decode { cause: String },
}

impl FailureKind {
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::UnknownMessageType => "unknown_message_type",
            Self::Decode { .. } => "decode",
        }
    }
}

/// A line that was recognized but could not be turned into a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    pub original_line: String,
    #[serde(flatten)]
    pub kind: FailureKind,
}

impl FailureRecord {
    /// Per-line errors only; transport and caller errors have no record
    pub fn from_error(error: &DomainError) -> Option<Self> {
        match error {
            DomainError::UnknownMessageType(line) => Some(Self {
                original_line: line.clone(),
                kind: FailureKind::UnknownMessageType,
            }),
            DomainError::Decode {
                original_line,
                cause,
            } => Some(Self {
                original_line: original_line.clone(),
                kind: FailureKind::Decode {
                    cause: cause.clone(),
                },
            }),
            _ => None,
        }
    }
}

/// What a bridge hands to its sink for every recognized line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BridgeEvent {
    Message(Message),
    Failure(FailureRecord),
}

impl BridgeEvent {
    pub fn message(&self) -> Option<&Message> {
        match self {
            Self::Message(message) => Some(message),
            Self::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&FailureRecord> {
        match self {
            Self::Message(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }
}
