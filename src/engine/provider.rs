//! MetadataEngine trait definition.

use async_trait::async_trait;
use thiserror::Error;

use super::types::{DataSourceInfo, SourceTableInfo};

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors reported by the virtualization engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The named data source is not bound in the engine.
    #[error("data source not found: {0}")]
    SourceNotFound(String),

    /// Any other engine-side failure, flattened to its message.
    #[error("engine error: {0}")]
    Engine(String),
}

/// Trait for the embedded metadata/virtualization engine.
///
/// Discovery treats the engine as opaque: it asks for bound sources and
/// their tables' qualified paths, and (on refresh) for deployment and the
/// generated DDL. Everything else — drivers, connections, query planning —
/// stays behind this boundary.
#[async_trait]
pub trait MetadataEngine: Send + Sync {
    /// Look up a bound data source by name.
    async fn data_source(&self, name: &str) -> EngineResult<Option<DataSourceInfo>>;

    /// List all bound data sources.
    async fn data_sources(&self) -> EngineResult<Vec<DataSourceInfo>>;

    /// List the tables of a source, with their qualified paths.
    async fn source_tables(&self, source: &str) -> EngineResult<Vec<SourceTableInfo>>;

    /// Deploy (or redeploy) the source's virtual database.
    async fn deploy_source(&self, source: &str) -> EngineResult<()>;

    /// The generated schema DDL for a deployed source, if the engine has
    /// produced one.
    async fn source_ddl(&self, source: &str) -> EngineResult<Option<String>>;
}
