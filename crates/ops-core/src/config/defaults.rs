//! Default configuration values.
//!
//! The default tree is the lower bound of every active configuration: after
//! merging, each of its top-level keys is present. It is built once and never
//! mutated; callers get clones.

use crate::config::types::{
    ConfigTree, DeployConfig, LogsConfig, MonitorConfig, SystemConfig, UiConfig,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::LazyLock;

pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 5000;
pub const DEFAULT_MAX_PROCESSES: usize = 20;
pub const DEFAULT_LOG_PATH: &str = "/var/log";
pub const DEFAULT_MAX_LINES: u64 = 1000;
pub const DEFAULT_DEPLOY_ENV: &str = "production";
pub const DEFAULT_CACHE_TIMEOUT_MS: u64 = 30000;
pub const DEFAULT_THEME: &str = "default";

/// Number of backups kept by `ops config backups --clean` when no count is given.
pub const DEFAULT_BACKUPS_KEPT: usize = 10;

static DEFAULT_TREE: LazyLock<ConfigTree> = LazyLock::new(|| {
    let mut tree = ConfigTree::new();
    tree.insert(
        "monitor".to_string(),
        json!({
            "refreshInterval": DEFAULT_REFRESH_INTERVAL_MS,
            "showProcesses": true,
            "maxProcesses": DEFAULT_MAX_PROCESSES,
        }),
    );
    tree.insert(
        "logs".to_string(),
        json!({
            "defaultPath": DEFAULT_LOG_PATH,
            "maxLines": DEFAULT_MAX_LINES,
            "follow": false,
        }),
    );
    tree.insert(
        "deploy".to_string(),
        json!({
            "defaultEnv": DEFAULT_DEPLOY_ENV,
            "backupEnabled": true,
            "confirmBeforeDeploy": true,
        }),
    );
    tree.insert(
        "system".to_string(),
        json!({
            "showHiddenServices": false,
            "cacheTimeout": DEFAULT_CACHE_TIMEOUT_MS,
        }),
    );
    tree.insert(
        "ui".to_string(),
        json!({
            "theme": DEFAULT_THEME,
            "animations": true,
            "sound": false,
        }),
    );
    tree
});

/// Returns a copy of the default configuration tree.
pub fn default_tree() -> ConfigTree {
    DEFAULT_TREE.clone()
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL_MS,
            show_processes: true,
            max_processes: DEFAULT_MAX_PROCESSES,
            extra: ConfigTree::new(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            default_path: PathBuf::from(DEFAULT_LOG_PATH),
            max_lines: DEFAULT_MAX_LINES,
            follow: false,
            extra: ConfigTree::new(),
        }
    }
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            default_env: DEFAULT_DEPLOY_ENV.to_string(),
            backup_enabled: true,
            confirm_before_deploy: true,
            extra: ConfigTree::new(),
        }
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            show_hidden_services: false,
            cache_timeout: DEFAULT_CACHE_TIMEOUT_MS,
            extra: ConfigTree::new(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            animations: true,
            sound: false,
            extra: ConfigTree::new(),
        }
    }
}
