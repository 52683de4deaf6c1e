//! Schema discovery orchestration.
//!
//! Ties the two cores together: every operation here is "run a transaction
//! against the repository, read table metadata from the engine, fold the
//! qualified paths into a schema forest" (or the write-side analogue,
//! refreshing the stored schema DDL). Browsing operations run their
//! transactions rollback-only so nothing they touch can become visible.

mod service;
mod status;

pub use service::{DiscoveryError, DiscoveryResult, SchemaDiscoveryService};
pub use status::{SourceStatus, StatusReport};
