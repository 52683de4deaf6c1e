//! Status payloads returned by discovery operations.

use serde::{Deserialize, Serialize};

/// Titled, ordered list of per-subject outcome messages.
///
/// The REST layer renders these verbatim; nothing in here is machine-read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    /// What the report covers, e.g. "Refresh schema".
    pub title: String,
    /// `(subject, message)` pairs in the order they were recorded.
    pub attributes: Vec<(String, String)>,
}

impl StatusReport {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            attributes: Vec::new(),
        }
    }

    /// Record an outcome message for a subject.
    pub fn add_attribute(&mut self, subject: impl Into<String>, message: impl Into<String>) {
        self.attributes.push((subject.into(), message.into()));
    }

    /// The recorded message for `subject`, if any.
    pub fn attribute(&self, subject: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(s, _)| s == subject)
            .map(|(_, message)| message.as_str())
    }
}

/// One row of the per-source status summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStatus {
    /// The bound data source.
    pub source: String,
    /// Id of the stored schema record, when one exists.
    pub schema_id: Option<String>,
    /// Whether a generated schema is stored for the source.
    pub has_schema: bool,
}
