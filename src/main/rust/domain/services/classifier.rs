use crate::domain::entities::ClassifiedLine;
use crate::domain::value_objects::message_tag::FIELD_SEPARATOR;

use super::DecoderRegistry;

/// Recognizes lines that open with one of the registered type tags
#[derive(Debug, Clone)]
pub struct Classifier {
    tags: Vec<&'static str>,
}

impl Classifier {
    /// The registry is the only source of supported tags
    pub fn new(registry: &DecoderRegistry) -> Self {
        Self {
            tags: registry.tags().collect(),
        }
    }

    /// Match `line` against the known tags.
    /// The tag must start the line and be followed by a separator;
    /// surrounding whitespace is stripped first.
    pub fn classify(&self, line: &str) -> Option<ClassifiedLine> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let tag = self.tags.iter().copied().find(|tag| {
            line.strip_prefix(tag)
                .is_some_and(|rest| rest.starts_with(FIELD_SEPARATOR))
        })?;

        let fields = line
            .split(FIELD_SEPARATOR)
            .skip(1)
            .map(str::to_string)
            .collect();

        Some(ClassifiedLine::new(tag, line.to_string(), fields))
    }
}
