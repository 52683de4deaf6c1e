//! TOML-based configuration.
//!
//! Supports a config file (strata.toml) with environment variable
//! expansion.
//!
//! Example configuration:
//! ```toml
//! [transaction]
//! commit_wait_secs = 30
//!
//! [workspace]
//! path = "${STRATA_HOME}/workspace.db"
//!
//! [discovery]
//! parallel_sources = true
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::repository::{SqliteWorkspace, WorkspaceError};

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Failed to determine workspace location: {0}")]
    NoWorkspacePath(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Transaction bridge tunables.
    pub transaction: TransactionSettings,

    /// Workspace store location.
    pub workspace: WorkspaceSettings,

    /// Schema discovery behavior.
    pub discovery: DiscoverySettings,
}

/// Transaction bridge settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransactionSettings {
    /// Ceiling for the post-commit wait, in seconds.
    pub commit_wait_secs: u64,
}

impl Default for TransactionSettings {
    fn default() -> Self {
        Self {
            commit_wait_secs: 30,
        }
    }
}

/// Workspace store settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkspaceSettings {
    /// Workspace database path (supports ${ENV_VAR} expansion).
    ///
    /// Defaults to `~/.strata/workspace.db`.
    pub path: Option<String>,
}

/// Schema discovery settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DiscoverySettings {
    /// Fetch per-source table metadata concurrently.
    pub parallel_sources: bool,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            parallel_sources: true,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse settings from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load `strata.toml` from the working directory, falling back to
    /// defaults when no file exists.
    pub fn load() -> Result<Self, SettingsError> {
        let path = Path::new("strata.toml");
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.transaction.commit_wait_secs == 0 {
            return Err(SettingsError::InvalidConfig(
                "transaction.commit_wait_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// The commit-wait ceiling as a duration.
    pub fn commit_ceiling(&self) -> Duration {
        Duration::from_secs(self.transaction.commit_wait_secs)
    }

    /// The workspace database path, with environment variables expanded.
    pub fn workspace_path(&self) -> Result<PathBuf, SettingsError> {
        match &self.workspace.path {
            Some(path) => Ok(PathBuf::from(expand_env_vars(path)?)),
            None => SqliteWorkspace::default_path()
                .map_err(|err: WorkspaceError| SettingsError::NoWorkspacePath(err.to_string())),
        }
    }
}

/// Expand `${VAR}` and `$VAR` references against the process environment.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }
        if chars.peek() == Some(&'{') {
            chars.next();
            let mut var_name = String::new();
            while let Some(&ch) = chars.peek() {
                chars.next();
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            }
            let value =
                env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
            result.push_str(&value);
        } else {
            let mut var_name = String::new();
            while let Some(&ch) = chars.peek() {
                if ch.is_alphanumeric() || ch == '_' {
                    var_name.push(ch);
                    chars.next();
                } else {
                    break;
                }
            }
            if var_name.is_empty() {
                // A lone `$` stays literal.
                result.push('$');
            } else {
                let value = env::var(&var_name)
                    .map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
                result.push_str(&value);
            }
        }
    }

    Ok(result)
}
