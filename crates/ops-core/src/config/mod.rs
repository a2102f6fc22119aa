//! # Configuration System
//!
//! Persistent JSON configuration for the ops toolkit.
//!
//! ## Layout
//!
//! ```text
//! ~/.ops-toolkit/                 (or $OPS_TOOLKIT_CONFIG_DIR)
//! ├── config.json                 active settings, pretty-printed
//! └── backups/
//!     └── config-backup-<UTC timestamp>.json
//! ```
//!
//! ## Loading
//!
//! The file is merged over built-in defaults one level deep: top-level
//! sections present in both are combined key by key, anything deeper is
//! taken from the file as-is. See [`loading::merge_configs`].
//!
//! ## Mutations
//!
//! Every `set`/`reset` snapshots the file into `backups/`, writes the new
//! tree atomically, then runs all registered validators. A failed write or
//! validation restores the snapshot and leaves the in-memory tree unchanged.
//!
//! ```rust,no_run
//! use ops_core::config::{ConfigManager, ConfigPaths};
//! use serde_json::json;
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut manager = ConfigManager::new(ConfigPaths::resolve());
//!     manager.initialize()?;
//!     manager.set("monitor.refreshInterval", json!(10_000))?;
//!     let interval = manager.get("monitor.refreshInterval")?;
//!     Ok(())
//! }
//! ```

pub mod backup;
pub mod defaults;
pub mod errors;
pub mod loading;
pub mod manager;
pub mod nested;
pub mod paths;
pub mod types;
pub mod validation;

pub use backup::{BackupSnapshot, BackupStore};
pub use defaults::default_tree;
pub use errors::{BackupError, ConfigError};
pub use manager::{ConfigManager, ManagerState};
pub use paths::ConfigPaths;
pub use types::{
    ConfigTree, DeployConfig, LogsConfig, MonitorConfig, OpsConfig, SystemConfig, UiConfig,
};
pub use validation::{ValidationReport, ValidationResult, Validator, ValidatorRegistry};
