use serde::Serialize;

/// A raw line accepted by the classifier, split into its fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedLine {
    tag: &'static str,
    original: String,
    fields: Vec<String>,
}

impl ClassifiedLine {
    pub fn new(tag: &'static str, original: String, fields: Vec<String>) -> Self {
        Self {
            tag,
            original,
            fields,
        }
    }

    /// Registered type tag this line was matched against
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    /// Segments after the tag, empty ones kept in place
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }
}
