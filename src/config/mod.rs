//! Configuration module.
//!
//! Handles the TOML settings file, environment variable expansion, and
//! the tunables the cores expose (commit-wait ceiling, workspace path).

mod settings;

pub use settings::{
    expand_env_vars, DiscoverySettings, Settings, SettingsError, TransactionSettings,
    WorkspaceSettings,
};
