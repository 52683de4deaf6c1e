//! Metadata types crossing the engine boundary.

use serde::{Deserialize, Serialize};

/// A data source bound in the virtualization engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceInfo {
    /// Source name, unique within the engine.
    pub name: String,
}

impl DataSourceInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A table exposed by a data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTableInfo {
    /// Table name within the source.
    pub name: String,

    /// The table's qualified path within its source hierarchy
    /// (e.g. `schema=public/table=customer`).
    ///
    /// Not every driver reports one; tables without it cannot be placed
    /// in the schema tree and are skipped by discovery.
    pub qualified_path: Option<String>,
}

impl SourceTableInfo {
    pub fn new(name: impl Into<String>, qualified_path: Option<String>) -> Self {
        Self {
            name: name.into(),
            qualified_path,
        }
    }
}
