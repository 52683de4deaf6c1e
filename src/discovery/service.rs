//! SchemaDiscoveryService implementation.

use std::sync::Arc;

use thiserror::Error;

use crate::config::Settings;
use crate::engine::{MetadataEngine, SourceTableInfo};
use crate::repository::{Repository, SchemaRecord};
use crate::schema::{SchemaNode, SchemaTreeBuilder};
use crate::txn::{BoxError, TransactionError, TransactionRunner};

use super::status::{SourceStatus, StatusReport};

/// Result type for discovery operations.
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

/// Errors surfaced by schema discovery.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The named data source is not bound in the engine.
    ///
    /// Reported as its own variant so callers can answer "not found"
    /// distinctly from a failed or timed-out transaction.
    #[error("data source '{0}' was not found")]
    SourceNotFound(String),

    /// The underlying transaction failed; see
    /// [`TransactionError::is_outcome_unknown`] to distinguish a timeout
    /// (commit may still land) from a plain failure.
    #[error(transparent)]
    Txn(#[from] TransactionError),
}

/// Orchestrates schema discovery over the repository and the engine.
///
/// Holds no per-request state: each operation opens its own unit of work
/// and builds its own forest, so concurrent requests never share a tree.
pub struct SchemaDiscoveryService {
    runner: TransactionRunner,
    repository: Arc<dyn Repository>,
    engine: Arc<dyn MetadataEngine>,
    parallel_sources: bool,
}

impl SchemaDiscoveryService {
    /// Create a service with the default commit ceiling and parallel
    /// per-source fan-out.
    pub fn new(repository: Arc<dyn Repository>, engine: Arc<dyn MetadataEngine>) -> Self {
        Self {
            runner: TransactionRunner::new(Arc::clone(&repository)),
            repository,
            engine,
            parallel_sources: true,
        }
    }

    /// Create a service configured from [`Settings`].
    pub fn with_settings(
        repository: Arc<dyn Repository>,
        engine: Arc<dyn MetadataEngine>,
        settings: &Settings,
    ) -> Self {
        Self {
            runner: TransactionRunner::with_commit_ceiling(
                Arc::clone(&repository),
                settings.commit_ceiling(),
            ),
            repository,
            engine,
            parallel_sources: settings.discovery.parallel_sources,
        }
    }

    /// The schema forest of one data source.
    ///
    /// Runs rollback-only. Tables without a qualified path are skipped;
    /// a malformed path is logged and skipped without aborting the rest.
    pub async fn source_schema(&self, source_name: &str) -> DiscoveryResult<Vec<SchemaNode>> {
        let engine = Arc::clone(&self.engine);
        let source = source_name.to_string();
        let txn_name = format!("source_schema?source={}", source_name);

        let forest = self
            .runner
            .run_in_transaction(&txn_name, true, move |_uow| async move {
                match engine.data_source(&source).await? {
                    None => {
                        log::debug!("data source '{}' was not found", source);
                        Ok(None)
                    }
                    Some(data_source) => {
                        let tables = engine.source_tables(&data_source.name).await?;
                        Ok(Some(build_source_forest(&data_source.name, &tables)))
                    }
                }
            })
            .await?;

        forest.ok_or_else(|| DiscoveryError::SourceNotFound(source_name.to_string()))
    }

    /// The schema forests of every bound source, each wrapped under a
    /// synthetic root node of type `"root"` named after the source.
    ///
    /// Sources that expose no schema nodes are skipped rather than
    /// contributing empty roots.
    pub async fn all_source_schemas(&self) -> DiscoveryResult<Vec<SchemaNode>> {
        let engine = Arc::clone(&self.engine);
        let parallel = self.parallel_sources;

        let roots = self
            .runner
            .run_in_transaction("all_source_schemas", true, move |_uow| async move {
                let sources = engine.data_sources().await?;

                let forests: Vec<(String, Vec<SchemaNode>)> = if parallel {
                    let fetches: Vec<_> = sources
                        .into_iter()
                        .map(|source| {
                            let engine = Arc::clone(&engine);
                            async move {
                                let tables = engine.source_tables(&source.name).await?;
                                let forest = build_source_forest(&source.name, &tables);
                                Ok::<_, BoxError>((source.name, forest))
                            }
                        })
                        .collect();
                    futures::future::join_all(fetches)
                        .await
                        .into_iter()
                        .collect::<Result<Vec<_>, _>>()?
                } else {
                    let mut collected = Vec::with_capacity(sources.len());
                    for source in sources {
                        let tables = engine.source_tables(&source.name).await?;
                        let forest = build_source_forest(&source.name, &tables);
                        collected.push((source.name, forest));
                    }
                    collected
                };

                let mut roots = Vec::new();
                for (name, forest) in forests {
                    if forest.is_empty() {
                        continue;
                    }
                    let mut root = SchemaNode::new(&name, &name, "root", &name);
                    root.children = forest;
                    roots.push(root);
                }
                Ok(roots)
            })
            .await?;

        Ok(roots)
    }

    /// Regenerate and store the schema of one source.
    ///
    /// Writable transaction: drops the stored schema record (unless
    /// `deploy_only`), redeploys the source, and stores the engine's
    /// regenerated DDL. A source whose DDL is not yet available is
    /// deployed but leaves the store untouched.
    pub async fn refresh_source_schema(
        &self,
        source_name: &str,
        deploy_only: bool,
    ) -> DiscoveryResult<StatusReport> {
        let engine = Arc::clone(&self.engine);
        let repository = Arc::clone(&self.repository);
        let source = source_name.to_string();
        let txn_name = format!(
            "refresh_schema?source={}&deploy_only={}",
            source_name, deploy_only
        );

        let report = self
            .runner
            .run_in_transaction(&txn_name, false, move |uow| async move {
                let data_source = match engine.data_source(&source).await? {
                    None => {
                        log::debug!("data source '{}' was not found", source);
                        return Ok(None);
                    }
                    Some(data_source) => data_source,
                };

                let mut report = StatusReport::new("Refresh schema");

                if !deploy_only {
                    repository.delete_schema(&uow, &data_source.name).await?;
                }

                engine.deploy_source(&data_source.name).await?;

                match engine.source_ddl(&data_source.name).await? {
                    Some(ddl) => {
                        let record =
                            SchemaRecord::new(&data_source.name, &data_source.name, ddl);
                        repository.upsert_schema(&uow, record).await?;
                        report.add_attribute(
                            &data_source.name,
                            "source redeployed, schema regenerated and stored",
                        );
                    }
                    None => {
                        report.add_attribute(
                            &data_source.name,
                            "source deployed, schema not yet generated",
                        );
                    }
                }

                Ok(Some(report))
            })
            .await?;

        report.ok_or_else(|| DiscoveryError::SourceNotFound(source_name.to_string()))
    }

    /// Remove the stored schema record with the given id.
    ///
    /// Returns whether a record was there to remove.
    pub async fn delete_source_schema(&self, schema_id: &str) -> DiscoveryResult<bool> {
        let repository = Arc::clone(&self.repository);
        let id = schema_id.to_string();
        let txn_name = format!("delete_schema?id={}", schema_id);

        let removed = self
            .runner
            .run_in_transaction(&txn_name, false, move |uow| async move {
                Ok(repository.delete_schema(&uow, &id).await?)
            })
            .await?;

        Ok(removed)
    }

    /// A status row per bound source, joining the engine's source list
    /// against the stored schema records.
    pub async fn source_statuses(&self) -> DiscoveryResult<Vec<SourceStatus>> {
        let engine = Arc::clone(&self.engine);
        let repository = Arc::clone(&self.repository);

        let statuses = self
            .runner
            .run_in_transaction("source_statuses", true, move |uow| async move {
                let sources = engine.data_sources().await?;
                let mut statuses = Vec::with_capacity(sources.len());
                for source in sources {
                    let record = repository.find_schema(&uow, &source.name).await?;
                    let schema_id = record.map(|r| r.id);
                    statuses.push(SourceStatus {
                        source: source.name,
                        has_schema: schema_id.is_some(),
                        schema_id,
                    });
                }
                Ok(statuses)
            })
            .await?;

        Ok(statuses)
    }
}

/// Fold one source's tables into its schema forest.
fn build_source_forest(source: &str, tables: &[SourceTableInfo]) -> Vec<SchemaNode> {
    let mut builder = SchemaTreeBuilder::new(source);
    for table in tables {
        let path = match table.qualified_path.as_deref() {
            Some(path) => path,
            None => continue,
        };
        if let Err(err) = builder.add_path(path) {
            log::warn!(
                "skipping malformed qualified path for table '{}' of source '{}': {}",
                table.name,
                source,
                err
            );
        }
    }
    builder.build()
}
