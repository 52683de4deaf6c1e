//! # Strata
//!
//! Coordination core for a metadata-virtualization service.
//!
//! The service around this crate is mostly REST glue over a repository and
//! an embedded virtualization engine. The two pieces that carry actual
//! coordination logic live here:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │              SchemaDiscoveryService                      │
//! │  ("run a transaction that reads table metadata,          │
//! │    then fold the paths into a schema forest")            │
//! └─────────────────────────────────────────────────────────┘
//!           │                                │
//!           ▼ [txn]                          ▼ [schema]
//! ┌──────────────────────────┐   ┌──────────────────────────┐
//! │   TransactionRunner       │   │   SchemaTreeBuilder      │
//! │   - open unit of work     │   │   - parse key=value      │
//! │   - run caller's work     │   │     path segments        │
//! │   - commit, then wait on  │   │   - merge-on-match fold  │
//! │     CommitSignal (30s)    │   │     into a node forest   │
//! └──────────────────────────┘   └──────────────────────────┘
//!           │                                ▲
//!           ▼ [repository]                   │ [engine]
//! ┌──────────────────────────┐   ┌──────────────────────────┐
//! │   Repository trait        │   │   MetadataEngine trait   │
//! │   UnitOfWork lifecycle    │   │   (qualified table paths │
//! │   EmbeddedRepository +    │   │    deploy, schema DDL)   │
//! │   SqliteWorkspace         │   │                          │
//! └──────────────────────────┘   └──────────────────────────┘
//! ```
//!
//! The commit wait is the one deliberate synchronous-over-asynchronous
//! boundary: the repository applies commits on its own worker and signals
//! completion back through a single-fire [`txn::CommitSignal`].

pub mod config;
pub mod discovery;
pub mod engine;
pub mod repository;
pub mod schema;
pub mod txn;

pub use config::{Settings, SettingsError};
pub use discovery::{DiscoveryError, SchemaDiscoveryService, SourceStatus, StatusReport};
pub use engine::{DataSourceInfo, EngineError, MetadataEngine, SourceTableInfo};
pub use repository::{
    EmbeddedRepository, Repository, RepositoryError, SqliteWorkspace, TxState, UnitOfWork,
};
pub use schema::{PathSegment, SchemaNode, SchemaPathError, SchemaTreeBuilder};
pub use txn::{CommitNotifier, CommitSignal, TransactionError, TransactionRunner, WaitOutcome};
