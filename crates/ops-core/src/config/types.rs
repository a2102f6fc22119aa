//! Configuration type definitions for ops-toolkit.
//!
//! The persisted configuration is a JSON tree ([`ConfigTree`]). The manager
//! keeps that tree as the source of truth so unknown keys and ad-hoc values
//! written through `ops config set` survive untouched. [`OpsConfig`] is the
//! typed view over the same tree that command handlers read from.
//!
//! # Example Configuration
//!
//! ```json
//! {
//!   "monitor": { "refreshInterval": 5000, "showProcesses": true, "maxProcesses": 20 },
//!   "logs": { "defaultPath": "/var/log", "maxLines": 1000, "follow": false },
//!   "deploy": { "defaultEnv": "production", "backupEnabled": true, "confirmBeforeDeploy": true },
//!   "system": { "showHiddenServices": false, "cacheTimeout": 30000 },
//!   "ui": { "theme": "default", "animations": true, "sound": false }
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Ordered mapping of keys to JSON values. Nested trees are `Value::Object`.
pub type ConfigTree = Map<String, Value>;

/// Typed view of the persisted configuration.
///
/// Every section keeps an `extra` bag so keys this version does not know
/// about are carried through a typed round-trip instead of being dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OpsConfig {
    /// Monitoring command settings
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Log viewer settings
    #[serde(default)]
    pub logs: LogsConfig,

    /// Deployment defaults
    #[serde(default)]
    pub deploy: DeployConfig,

    /// System command settings
    #[serde(default)]
    pub system: SystemConfig,

    /// Terminal UI preferences
    #[serde(default)]
    pub ui: UiConfig,

    /// Top-level keys not covered by a typed section
    #[serde(flatten)]
    pub extra: ConfigTree,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonitorConfig {
    /// Refresh interval in milliseconds.
    pub refresh_interval: u64,

    /// Whether `ops monitor processes` is allowed to list processes.
    pub show_processes: bool,

    /// Default number of processes shown by `ops monitor processes`.
    pub max_processes: usize,

    #[serde(flatten)]
    pub extra: ConfigTree,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogsConfig {
    pub default_path: PathBuf,
    pub max_lines: u64,
    pub follow: bool,

    #[serde(flatten)]
    pub extra: ConfigTree,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeployConfig {
    /// Environment used when a deploy command does not name one.
    pub default_env: String,
    pub backup_enabled: bool,
    pub confirm_before_deploy: bool,

    #[serde(flatten)]
    pub extra: ConfigTree,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemConfig {
    pub show_hidden_services: bool,

    /// Cache timeout in milliseconds.
    pub cache_timeout: u64,

    #[serde(flatten)]
    pub extra: ConfigTree,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiConfig {
    pub theme: String,
    pub animations: bool,
    pub sound: bool,

    #[serde(flatten)]
    pub extra: ConfigTree,
}

impl OpsConfig {
    /// Build the typed view from a configuration tree.
    ///
    /// Missing sections and fields fall back to their defaults; known keys
    /// holding the wrong JSON type are an error.
    pub fn from_tree(tree: &ConfigTree) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(tree.clone()))
    }

    /// Serialize the typed view back into a configuration tree.
    pub fn to_tree(&self) -> Result<ConfigTree, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(tree) => Ok(tree),
            other => Err(serde::ser::Error::custom(format!(
                "expected configuration to serialize to an object, got {}",
                other
            ))),
        }
    }
}
