use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

use super::backup::{BackupSnapshot, BackupStore};
use super::defaults::default_tree;
use super::errors::{BackupError, ConfigError};
use super::loading::{load_config_file, merge_configs, write_config_file};
use super::nested::{get_path, set_path, split_path};
use super::paths::ConfigPaths;
use super::types::{ConfigTree, OpsConfig};
use super::validation::{Validator, ValidatorRegistry};

/// Lifecycle of a [`ConfigManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerState {
    /// `initialize()` has not completed successfully.
    Uninitialized,
    /// Settings can be read and written.
    Ready,
}

/// Sole owner of the active configuration.
///
/// Key invariant: after any failed `set`/`reset` the in-memory tree equals
/// the tree before the call, and the file is restored from the backup taken
/// at the start of that call.
#[derive(Debug)]
pub struct ConfigManager {
    paths: ConfigPaths,
    backups: BackupStore,
    validators: ValidatorRegistry,
    defaults: ConfigTree,
    active: Option<ConfigTree>,
}

impl ConfigManager {
    /// Create an uninitialized manager with the built-in validators registered.
    pub fn new(paths: ConfigPaths) -> Self {
        Self::with_validators(paths, ValidatorRegistry::with_builtin())
    }

    /// Create an uninitialized manager with an explicit validator set.
    pub fn with_validators(paths: ConfigPaths, validators: ValidatorRegistry) -> Self {
        let backups = BackupStore::new(paths.config_file(), paths.backup_dir());
        Self {
            paths,
            backups,
            validators,
            defaults: default_tree(),
            active: None,
        }
    }

    /// Create a manager for the per-user configuration directory.
    ///
    /// See [`ConfigPaths::resolve`].
    pub fn from_env() -> Self {
        Self::new(ConfigPaths::resolve())
    }

    pub fn state(&self) -> ManagerState {
        if self.active.is_some() {
            ManagerState::Ready
        } else {
            ManagerState::Uninitialized
        }
    }

    /// Create directories, load or create the file, merge and validate.
    ///
    /// On any failure the manager stays `Uninitialized`.
    pub fn initialize(&mut self) -> Result<(), ConfigError> {
        info!(
            event = "core.config.initialize_started",
            config_dir = %self.paths.config_dir().display()
        );

        self.ensure_dirs()?;

        if !self.paths.config_file().exists() {
            write_config_file(self.paths.config_file(), &self.defaults)?;
            info!(
                event = "core.config.defaults_written",
                config_file = %self.paths.config_file().display()
            );
        }

        let merged = self.load_merged()?;
        self.validators.run_all(&merged).into_result("initialize")?;
        self.active = Some(merged);

        info!(
            event = "core.config.initialize_completed",
            config_file = %self.paths.config_file().display(),
            validators = self.validators.len()
        );
        Ok(())
    }

    /// A copy of the whole active configuration.
    pub fn get_all(&self) -> Result<ConfigTree, ConfigError> {
        Ok(self.active_tree()?.clone())
    }

    /// The value at a dotted `key`, or `None` if nothing is stored there.
    pub fn get(&self, key: &str) -> Result<Option<Value>, ConfigError> {
        Ok(get_path(self.active_tree()?, key).cloned())
    }

    /// Typed view of the active configuration.
    pub fn typed(&self) -> Result<OpsConfig, ConfigError> {
        OpsConfig::from_tree(self.active_tree()?).map_err(|e| ConfigError::ValidationFailed {
            operation: "typed read".to_string(),
            errors: vec![e.to_string()],
        })
    }

    /// Assign `value` at `key`, persist and validate, rolling back on failure.
    ///
    /// An empty key (or one with an empty segment) is a logged no-op.
    pub fn set(&mut self, key: &str, value: Value) -> Result<(), ConfigError> {
        let previous = self.active_tree()?.clone();

        if split_path(key).is_none() {
            warn!(
                event = "core.config.set_skipped",
                key = key,
                "Configuration key is empty - nothing to update"
            );
            return Ok(());
        }

        info!(event = "core.config.set_started", key = key);
        let operation = format!("set '{}'", key);

        let backup = self.backup_before_mutation(&operation);
        if let Some(active) = self.active.as_mut() {
            set_path(active, key, value);
        }

        match self.persist_and_validate(&operation) {
            Ok(()) => {
                info!(event = "core.config.set_completed", key = key);
                Ok(())
            }
            Err(e) => Err(self.roll_back(previous, backup, e, &operation)),
        }
    }

    /// Replace the active configuration with the defaults.
    ///
    /// Same backup and rollback contract as [`ConfigManager::set`].
    pub fn reset(&mut self) -> Result<(), ConfigError> {
        let previous = self.active_tree()?.clone();
        info!(event = "core.config.reset_started");

        let backup = self.backup_before_mutation("reset");
        self.active = Some(self.defaults.clone());

        match self.persist_and_validate("reset") {
            Ok(()) => {
                info!(event = "core.config.reset_completed");
                Ok(())
            }
            Err(e) => Err(self.roll_back(previous, backup, e, "reset")),
        }
    }

    /// Overwrite the file with the defaults without loading it first, then
    /// initialize from them.
    ///
    /// Recovery path for a file that no longer parses, so it works on an
    /// uninitialized manager. The current bytes are backed up when possible.
    pub fn force_reset(&mut self) -> Result<(), ConfigError> {
        warn!(
            event = "core.config.force_reset_started",
            config_file = %self.paths.config_file().display()
        );
        self.active = None;

        self.ensure_dirs()?;
        let backup = self.backup_before_mutation("force reset");
        write_config_file(self.paths.config_file(), &self.defaults)?;
        self.initialize()?;

        info!(
            event = "core.config.force_reset_completed",
            backup = backup.as_ref().map(|b| b.name.as_str()).unwrap_or("")
        );
        Ok(())
    }

    /// Re-read the file and re-merge with defaults. Takes no backup.
    ///
    /// If the reloaded tree fails validation it still becomes active and the
    /// failure is returned. If the file cannot be loaded the previous tree
    /// stays active.
    pub fn reload(&mut self) -> Result<(), ConfigError> {
        self.active_tree()?;
        info!(event = "core.config.reload_started");

        let merged = self.load_merged()?;
        let report = self.validators.run_all(&merged);
        self.active = Some(merged);

        report.into_result("reload")?;
        info!(event = "core.config.reload_completed");
        Ok(())
    }

    /// Run every validator against the active configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validators
            .run_all(self.active_tree()?)
            .into_result("validate")
    }

    /// Add or replace a named validator. Runs from the next load or mutation.
    pub fn register_validator(&mut self, name: impl Into<String>, validator: impl Validator + 'static) {
        self.validators.register(name, validator);
    }

    pub fn validator_names(&self) -> Vec<&str> {
        self.validators.names()
    }

    /// Keep the `max_kept` most recent backups. Returns how many were removed.
    pub fn clean_old_backups(&self, max_kept: usize) -> Result<usize, BackupError> {
        self.backups.prune(max_kept)
    }

    /// Backups on disk, oldest first.
    pub fn list_backups(&self) -> Result<Vec<BackupSnapshot>, BackupError> {
        self.backups.list_backups()
    }

    pub fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    pub fn config_dir(&self) -> &Path {
        self.paths.config_dir()
    }

    pub fn config_file(&self) -> &Path {
        self.paths.config_file()
    }

    pub fn backup_dir(&self) -> &Path {
        self.paths.backup_dir()
    }

    fn active_tree(&self) -> Result<&ConfigTree, ConfigError> {
        self.active.as_ref().ok_or(ConfigError::Uninitialized)
    }

    fn ensure_dirs(&self) -> Result<(), ConfigError> {
        for dir in [self.paths.config_dir(), self.paths.backup_dir()] {
            fs::create_dir_all(dir).map_err(|source| ConfigError::DirectoryCreateFailed {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }

    fn load_merged(&self) -> Result<ConfigTree, ConfigError> {
        let loaded = load_config_file(self.paths.config_file())?;
        Ok(merge_configs(&self.defaults, &loaded))
    }

    /// Best-effort backup. Failures are logged and the mutation proceeds.
    fn backup_before_mutation(&self, operation: &str) -> Option<BackupSnapshot> {
        match self.backups.create_backup() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(
                    event = "core.config.backup_failed",
                    operation = operation,
                    error = %e,
                    "Continuing without a backup - rollback will not be able to restore the file"
                );
                None
            }
        }
    }

    fn persist_and_validate(&self, operation: &str) -> Result<(), ConfigError> {
        let active = self.active_tree()?;
        write_config_file(self.paths.config_file(), active)?;
        self.validators.run_all(active).into_result(operation)
    }

    /// Restore the file from this call's backup and reload it.
    ///
    /// Returns the error to surface: `original` when the file was restored to
    /// the pre-call state, otherwise `RollbackFailed` wrapping it. The active
    /// tree always ends up equal to `previous`.
    fn roll_back(
        &mut self,
        previous: ConfigTree,
        backup: Option<BackupSnapshot>,
        original: ConfigError,
        operation: &str,
    ) -> ConfigError {
        warn!(
            event = "core.config.rollback_started",
            operation = operation,
            error = %original
        );

        let restored = match &backup {
            None => Err("no backup was taken before the change".to_string()),
            Some(snapshot) => self
                .backups
                .restore(snapshot)
                .map_err(|e| e.to_string())
                .and_then(|()| self.load_merged().map_err(|e| e.to_string()))
                .and_then(|tree| {
                    // The file changed on disk after this manager last loaded it
                    if tree == previous {
                        Ok(())
                    } else {
                        Err(format!(
                            "restored file '{}' differs from the in-memory configuration",
                            snapshot.path.display()
                        ))
                    }
                }),
        };

        self.active = Some(previous);

        match restored {
            Ok(()) => {
                info!(event = "core.config.rollback_completed", operation = operation);
                original
            }
            Err(rollback) => {
                error!(
                    event = "core.config.rollback_failed",
                    operation = operation,
                    error = %original,
                    rollback_error = %rollback
                );
                ConfigError::RollbackFailed {
                    source: Box::new(original),
                    rollback,
                }
            }
        }
    }
}
