use std::path::PathBuf;

use crate::errors::OpsError;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration not initialized - call initialize() before reading or writing settings")]
    Uninitialized,

    #[error("Failed to create configuration directory '{path}': {source}")]
    DirectoryCreateFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to load configuration from '{path}': {message}")]
    LoadFailed { path: PathBuf, message: String },

    #[error("Configuration validation failed during {operation}: {}", .errors.join("; "))]
    ValidationFailed {
        operation: String,
        errors: Vec<String>,
    },

    #[error("Failed to persist configuration to '{path}': {message}")]
    PersistFailed { path: PathBuf, message: String },

    /// The original failure, plus the reason the file could not be restored.
    #[error("{source} (rollback failed: {rollback})")]
    RollbackFailed {
        source: Box<ConfigError>,
        rollback: String,
    },
}

impl OpsError for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            ConfigError::Uninitialized => "CONFIG_UNINITIALIZED",
            ConfigError::DirectoryCreateFailed { .. } => "CONFIG_DIRECTORY_CREATE_FAILED",
            ConfigError::LoadFailed { .. } => "CONFIG_LOAD_FAILED",
            ConfigError::ValidationFailed { .. } => "CONFIG_VALIDATION_FAILED",
            ConfigError::PersistFailed { .. } => "CONFIG_PERSIST_FAILED",
            ConfigError::RollbackFailed { .. } => "CONFIG_ROLLBACK_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        // Exhaustive match ensures new variants force an explicit classification.
        match self {
            ConfigError::LoadFailed { .. } | ConfigError::ValidationFailed { .. } => true,

            ConfigError::Uninitialized
            | ConfigError::DirectoryCreateFailed { .. }
            | ConfigError::PersistFailed { .. }
            | ConfigError::RollbackFailed { .. } => false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error("No backup found in '{dir}'")]
    NoBackup { dir: PathBuf },

    #[error("Backup I/O failed at '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl OpsError for BackupError {
    fn error_code(&self) -> &'static str {
        match self {
            BackupError::NoBackup { .. } => "BACKUP_NOT_FOUND",
            BackupError::Io { .. } => "BACKUP_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, BackupError::NoBackup { .. })
    }
}
