//! Qualified-path parsing.

use thiserror::Error;

/// Result type for path parsing.
pub type SchemaResult<T> = Result<T, SchemaPathError>;

/// Errors raised while parsing a qualified path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaPathError {
    /// A segment had no `=` delimiter. Parsing fails rather than
    /// defaulting, so a malformed path never contributes nodes.
    #[error("path segment '{0}' is missing the key=value delimiter")]
    MissingDelimiter(String),

    /// The path had no segments at all.
    #[error("qualified path is empty")]
    Empty,
}

/// One parsed `key=value` token of a qualified path.
///
/// The key names the object type at that level (`schema`, `table`), the
/// value names the object itself (`public`, `customer`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    /// Object type, the part before the first `=`.
    pub key: String,
    /// Object name, everything after the first `=`.
    pub value: String,
}

impl PathSegment {
    /// Parse a single `key=value` token.
    ///
    /// Splits on the first `=` only, so values may themselves contain `=`.
    pub fn parse(token: &str) -> SchemaResult<Self> {
        match token.split_once('=') {
            Some((key, value)) => Ok(Self {
                key: key.to_string(),
                value: value.to_string(),
            }),
            None => Err(SchemaPathError::MissingDelimiter(token.to_string())),
        }
    }

    /// The original token form, `key=value`.
    pub fn token(&self) -> String {
        format!("{}={}", self.key, self.value)
    }
}

/// Parse a full qualified path into its ordered segments.
///
/// The whole path is parsed before any segment is used, so a malformed
/// segment rejects the path without side effects.
pub fn parse_qualified_path(path: &str) -> SchemaResult<Vec<PathSegment>> {
    if path.is_empty() {
        return Err(SchemaPathError::Empty);
    }
    path.split('/').map(PathSegment::parse).collect()
}

/// Reconstruct the path of the node at `position`: the `/`-join of all
/// segments from the root up to and including that one. Deeper segments
/// are never included, so a container's path is stable no matter how many
/// children are added later.
pub(crate) fn truncated_path(segments: &[PathSegment], position: usize) -> String {
    segments[..=position]
        .iter()
        .map(PathSegment::token)
        .collect::<Vec<_>>()
        .join("/")
}
