//! SQLite-backed workspace store.
//!
//! Holds the committed schema records of the workspace at
//! `~/.strata/workspace.db`. Versioned: a version mismatch clears the
//! store rather than attempting migration.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

/// Current workspace schema version. Bump this when the stored format
/// changes.
const WORKSPACE_VERSION: i32 = 1;

/// Errors that can occur in the workspace store.
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to determine workspace directory")]
    NoWorkspaceDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

/// A stored schema record: the generated DDL for one data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaRecord {
    /// Record id; discovery uses the source name.
    pub id: String,
    /// Name of the data source the schema was generated from.
    pub source_name: String,
    /// The generated schema DDL.
    pub ddl: String,
}

impl SchemaRecord {
    pub fn new(
        id: impl Into<String>,
        source_name: impl Into<String>,
        ddl: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source_name: source_name.into(),
            ddl: ddl.into(),
        }
    }
}

/// SQLite-backed store of schema records.
pub struct SqliteWorkspace {
    conn: Connection,
}

impl SqliteWorkspace {
    /// Open or create the workspace database at `path`.
    ///
    /// If the stored version doesn't match, the store is cleared.
    pub fn open<P: AsRef<Path>>(path: P) -> WorkspaceResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        let workspace = Self { conn };
        workspace.init()?;

        Ok(workspace)
    }

    /// Open an in-memory workspace (for testing).
    pub fn open_in_memory() -> WorkspaceResult<Self> {
        let conn = Connection::open_in_memory()?;
        let workspace = Self { conn };
        workspace.init()?;
        Ok(workspace)
    }

    /// The default workspace database location.
    pub fn default_path() -> WorkspaceResult<PathBuf> {
        let base = dirs::home_dir().ok_or(WorkspaceError::NoWorkspaceDir)?;
        Ok(base.join(".strata").join("workspace.db"))
    }

    /// Initialize the store and check the version.
    fn init(&self) -> WorkspaceResult<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS schemas (
                id TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )?;

        let stored_version: Option<i32> = self
            .conn
            .query_row("SELECT value FROM meta WHERE key = 'version'", [], |row| {
                let s: String = row.get(0)?;
                Ok(s.parse().unwrap_or(0))
            })
            .optional()?;

        match stored_version {
            Some(v) if v == WORKSPACE_VERSION => {}
            Some(_) => {
                // Version mismatch, clear the store
                self.clear()?;
                self.set_version(WORKSPACE_VERSION)?;
            }
            None => {
                self.set_version(WORKSPACE_VERSION)?;
            }
        }

        Ok(())
    }

    fn set_version(&self, version: i32) -> WorkspaceResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO meta (key, value) VALUES ('version', ?)",
            params![version.to_string()],
        )?;
        Ok(())
    }

    /// Fetch a schema record by id.
    pub fn get(&self, id: &str) -> WorkspaceResult<Option<SchemaRecord>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM schemas WHERE id = ?",
                params![id],
                |row| row.get(0),
            )
            .optional()?;

        match json {
            Some(s) => Ok(Some(serde_json::from_str(&s)?)),
            None => Ok(None),
        }
    }

    /// Insert or replace a schema record.
    pub fn put(&self, record: &SchemaRecord) -> WorkspaceResult<()> {
        let json = serde_json::to_string(record)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO schemas (id, value) VALUES (?, ?)",
            params![record.id, json],
        )?;
        Ok(())
    }

    /// Remove a schema record. Returns whether a row was removed.
    pub fn remove(&self, id: &str) -> WorkspaceResult<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM schemas WHERE id = ?", params![id])?;
        Ok(rows > 0)
    }

    /// List all stored record ids.
    pub fn ids(&self) -> WorkspaceResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT id FROM schemas ORDER BY id")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(ids)
    }

    /// Remove all schema records (metadata is kept).
    pub fn clear(&self) -> WorkspaceResult<()> {
        self.conn.execute("DELETE FROM schemas", [])?;
        Ok(())
    }
}
