//! Qualified-path schema trees.
//!
//! A data source describes its tables with qualified paths: `/`-delimited
//! sequences of `key=value` segments, e.g. `schema=public/table=customer`.
//! This module folds a flat collection of those paths into a deduplicated
//! forest of [`SchemaNode`]s that schema-discovery queries answer from:
//!
//! ```text
//! schema=public/table=customer ─┐        schema=public      (container)
//! schema=public/table=orders  ──┼──▶      ├─ customer       (queryable)
//! table=audit_log             ──┘         └─ orders         (queryable)
//!                                        audit_log          (queryable root)
//! ```
//!
//! Node identity for the merge is `(source, name, type)` at a given tree
//! level; two sources never share nodes even when names collide.

mod builder;
mod node;
mod path;

pub use builder::SchemaTreeBuilder;
pub use node::SchemaNode;
pub use path::{parse_qualified_path, PathSegment, SchemaPathError, SchemaResult};
