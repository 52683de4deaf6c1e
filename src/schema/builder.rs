//! Folding qualified paths into a schema forest.

use super::node::SchemaNode;
use super::path::{
    parse_qualified_path, truncated_path, PathSegment, SchemaPathError, SchemaResult,
};

/// Builds one source's schema forest from its qualified paths.
///
/// Each path is parsed to an immutable segment list first; only a fully
/// parsed path is merged into the forest, so a malformed path cannot
/// corrupt nodes contributed by earlier paths. Merging is on
/// `(source, name, type)` per level: re-adding a path, or adding a sibling
/// under the same containers, reuses the existing chain.
///
/// A builder covers exactly one build pass over one collection of paths;
/// nothing survives into the next refresh, and the forest must not be
/// shared across concurrent refreshes.
///
/// # Example
///
/// ```
/// use strata::schema::SchemaTreeBuilder;
///
/// let mut builder = SchemaTreeBuilder::new("pg_sales");
/// builder.add_path("schema=public/table=customer").unwrap();
/// builder.add_path("schema=public/table=orders").unwrap();
///
/// let forest = builder.build();
/// assert_eq!(forest.len(), 1);
/// assert_eq!(forest[0].children.len(), 2);
/// ```
#[derive(Debug)]
pub struct SchemaTreeBuilder {
    source: String,
    roots: Vec<SchemaNode>,
}

impl SchemaTreeBuilder {
    /// Start an empty forest for `source`.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            roots: Vec::new(),
        }
    }

    /// Merge one qualified path into the forest.
    ///
    /// A single-segment path is both root and leaf: the root node is
    /// created (or found) and marked queryable directly. A multi-segment
    /// path contributes its ancestors as container nodes and its last
    /// segment as a queryable leaf.
    pub fn add_path(&mut self, path: &str) -> SchemaResult<()> {
        let segments = parse_qualified_path(path)?;
        self.merge(&segments);
        Ok(())
    }

    /// Merge many paths, collecting per-path failures instead of aborting.
    ///
    /// Paths are independent: a malformed one is reported and skipped
    /// while the rest still contribute their nodes.
    pub fn add_paths<'a, I>(&mut self, paths: I) -> Vec<(String, SchemaPathError)>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut failures = Vec::new();
        for path in paths {
            if let Err(err) = self.add_path(path) {
                failures.push((path.to_string(), err));
            }
        }
        failures
    }

    /// The forest built so far, in first-discovery order.
    pub fn roots(&self) -> &[SchemaNode] {
        &self.roots
    }

    /// Finish the pass and take the forest.
    pub fn build(self) -> Vec<SchemaNode> {
        self.roots
    }

    fn merge(&mut self, segments: &[PathSegment]) {
        let source = self.source.as_str();
        let last = segments.len() - 1;

        if last == 0 {
            // Root and leaf in one: queryable, no child created under it.
            let root = Self::find_or_insert(
                source,
                &mut self.roots,
                &segments[0],
                truncated_path(segments, 0),
            );
            root.queryable = true;
            return;
        }

        let mut level = &mut self.roots;
        for (position, segment) in segments[..last].iter().enumerate() {
            let node = Self::find_or_insert(
                source,
                level,
                segment,
                truncated_path(segments, position),
            );
            level = &mut node.children;
        }

        let leaf = Self::find_or_insert(
            source,
            level,
            &segments[last],
            truncated_path(segments, last),
        );
        leaf.queryable = true;
    }

    /// Search only the direct children at this level for a matching node;
    /// create and append one if absent.
    fn find_or_insert<'a>(
        source: &str,
        level: &'a mut Vec<SchemaNode>,
        segment: &PathSegment,
        path: String,
    ) -> &'a mut SchemaNode {
        let index = match level
            .iter()
            .position(|node| node.matches(source, &segment.value, &segment.key))
        {
            Some(index) => index,
            None => {
                level.push(SchemaNode::new(source, &segment.value, &segment.key, path));
                level.len() - 1
            }
        };
        &mut level[index]
    }
}
