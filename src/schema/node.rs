//! Schema tree nodes.

use serde::{Deserialize, Serialize};

/// One node of a discovered-schema tree.
///
/// A node is either a container discovered along a qualified path (a
/// schema, a catalog) or a queryable object (a table, or a single-segment
/// root). Children are exclusively owned and kept in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaNode {
    /// Name of the owning connection/source.
    pub source: String,
    /// Object name, the segment's value.
    pub name: String,
    /// Object type, the segment's key (e.g. "schema", "table").
    #[serde(rename = "type")]
    pub node_type: String,
    /// Reconstructed qualified path up to and including this node.
    pub path: String,
    /// Whether the node denotes a queryable object rather than a
    /// container.
    pub queryable: bool,
    /// Child nodes, in first-discovery order.
    pub children: Vec<SchemaNode>,
}

impl SchemaNode {
    /// Create a non-queryable node with no children.
    pub fn new(
        source: impl Into<String>,
        name: impl Into<String>,
        node_type: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            name: name.into(),
            node_type: node_type.into(),
            path: path.into(),
            queryable: false,
            children: Vec::new(),
        }
    }

    /// Node identity at a tree level: `(source, name, type)`, matched
    /// case-sensitively. Two sources never produce the same node.
    pub fn matches(&self, source: &str, name: &str, node_type: &str) -> bool {
        self.source == source && self.name == name && self.node_type == node_type
    }
}
