//! Timestamped snapshots of the persisted configuration file.
//!
//! Snapshot names embed a UTC timestamp (`config-backup-<timestamp>.json`)
//! whose lexicographic order equals creation order, so recency never depends
//! on filesystem metadata.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};

use crate::config::errors::BackupError;
use crate::config::loading::write_atomic;

pub const BACKUP_PREFIX: &str = "config-backup-";
pub const BACKUP_EXTENSION: &str = ".json";

/// Filesystem-safe timestamp; `:` is not allowed in Windows file names.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.9fZ";

/// A single backup file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupSnapshot {
    pub path: PathBuf,
    /// File name, e.g. `config-backup-2026-10-17T09-30-00.123456789Z.json`
    pub name: String,
    pub modified: Option<SystemTime>,
}

impl BackupSnapshot {
    /// The timestamp portion of the file name.
    pub fn id(&self) -> &str {
        self.name
            .strip_prefix(BACKUP_PREFIX)
            .and_then(|rest| rest.strip_suffix(BACKUP_EXTENSION))
            .unwrap_or(&self.name)
    }

    /// Creation time parsed back out of the file name.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        NaiveDateTime::parse_from_str(self.id(), TIMESTAMP_FORMAT)
            .ok()
            .map(|naive| naive.and_utc())
    }
}

/// Undo log for configuration mutations.
#[derive(Debug, Clone)]
pub struct BackupStore {
    config_file: PathBuf,
    backup_dir: PathBuf,
}

impl BackupStore {
    pub fn new(config_file: impl Into<PathBuf>, backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_file: config_file.into(),
            backup_dir: backup_dir.into(),
        }
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Copy the persisted file into the backup directory.
    ///
    /// Returns `Ok(None)` when there is no persisted file yet.
    pub fn create_backup(&self) -> Result<Option<BackupSnapshot>, BackupError> {
        if !self.config_file.exists() {
            debug!(
                event = "core.config.backup_skipped",
                config_file = %self.config_file.display(),
                "No persisted configuration yet - nothing to back up"
            );
            return Ok(None);
        }

        fs::create_dir_all(&self.backup_dir).map_err(|source| BackupError::Io {
            path: self.backup_dir.clone(),
            source,
        })?;

        let contents = fs::read(&self.config_file).map_err(|source| BackupError::Io {
            path: self.config_file.clone(),
            source,
        })?;

        let name = self.next_backup_name()?;
        let path = self.backup_dir.join(&name);
        write_atomic(&path, &contents).map_err(|source| BackupError::Io {
            path: path.clone(),
            source,
        })?;

        info!(
            event = "core.config.backup_created",
            backup = %path.display(),
            bytes = contents.len()
        );

        let modified = fs::metadata(&path).and_then(|m| m.modified()).ok();
        Ok(Some(BackupSnapshot {
            path,
            name,
            modified,
        }))
    }

    /// All snapshots, oldest first.
    ///
    /// A missing backup directory is an empty list. Files that do not follow
    /// the `config-backup-<timestamp>.json` naming are ignored.
    pub fn list_backups(&self) -> Result<Vec<BackupSnapshot>, BackupError> {
        let entries = match fs::read_dir(&self.backup_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(BackupError::Io {
                    path: self.backup_dir.clone(),
                    source,
                });
            }
        };

        let mut snapshots = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(
                        event = "core.config.backup_dir_entry_failed",
                        backup_dir = %self.backup_dir.display(),
                        error = %e,
                        "Could not read directory entry in backup directory"
                    );
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().to_string();
            if !name.starts_with(BACKUP_PREFIX) || !name.ends_with(BACKUP_EXTENSION) {
                continue;
            }

            let metadata = entry.metadata().ok();
            if metadata.as_ref().is_some_and(|m| !m.is_file()) {
                continue;
            }

            let snapshot = BackupSnapshot {
                path: entry.path(),
                name,
                modified: metadata.and_then(|m| m.modified().ok()),
            };
            // A name without a parseable stamp would sort after every real one
            if snapshot.created_at().is_none() {
                debug!(
                    event = "core.config.backup_name_ignored",
                    backup = %snapshot.path.display()
                );
                continue;
            }
            snapshots.push(snapshot);
        }

        snapshots.sort_by(|a, b| a.name.cmp(&b.name).then(a.modified.cmp(&b.modified)));
        Ok(snapshots)
    }

    /// The most recent snapshot, if any.
    pub fn latest_backup(&self) -> Result<Option<BackupSnapshot>, BackupError> {
        Ok(self.list_backups()?.pop())
    }

    /// Copy the most recent snapshot over the persisted file.
    ///
    /// `BackupError::NoBackup` is the expected answer on a first run.
    pub fn restore_latest(&self) -> Result<BackupSnapshot, BackupError> {
        let latest = self.latest_backup()?.ok_or_else(|| BackupError::NoBackup {
            dir: self.backup_dir.clone(),
        })?;

        self.restore(&latest)?;
        Ok(latest)
    }

    /// Copy `snapshot` over the persisted file.
    pub fn restore(&self, snapshot: &BackupSnapshot) -> Result<(), BackupError> {
        let contents = fs::read(&snapshot.path).map_err(|source| BackupError::Io {
            path: snapshot.path.clone(),
            source,
        })?;

        write_atomic(&self.config_file, &contents).map_err(|source| BackupError::Io {
            path: self.config_file.clone(),
            source,
        })?;

        info!(
            event = "core.config.backup_restored",
            backup = %snapshot.path.display(),
            config_file = %self.config_file.display()
        );

        Ok(())
    }

    /// Keep the `max_kept` most recent snapshots and delete the rest.
    ///
    /// Returns how many files were removed. A file that cannot be deleted is
    /// logged and skipped.
    pub fn prune(&self, max_kept: usize) -> Result<usize, BackupError> {
        let mut snapshots = self.list_backups()?;
        // Newest first: name descending, then modification time descending
        snapshots.sort_by(|a, b| b.name.cmp(&a.name).then(b.modified.cmp(&a.modified)));

        let mut removed = 0;
        let mut failed = 0;
        for snapshot in snapshots.iter().skip(max_kept) {
            match fs::remove_file(&snapshot.path) {
                Ok(()) => removed += 1,
                Err(e) => {
                    failed += 1;
                    warn!(
                        event = "core.config.backup_prune_delete_failed",
                        backup = %snapshot.path.display(),
                        error = %e,
                        "Could not delete old configuration backup"
                    );
                }
            }
        }

        info!(
            event = "core.config.backup_prune_completed",
            max_kept = max_kept,
            removed = removed,
            failed = failed
        );

        Ok(removed)
    }

    /// Name for the next snapshot, strictly later than the newest existing one.
    fn next_backup_name(&self) -> Result<String, BackupError> {
        let mut stamp = Utc::now();

        if let Some(latest) = self.latest_backup()?
            && let Some(latest_stamp) = latest.created_at()
            && latest_stamp >= stamp
        {
            stamp = latest_stamp + chrono::Duration::nanoseconds(1);
        }

        Ok(format!(
            "{}{}{}",
            BACKUP_PREFIX,
            stamp.format(TIMESTAMP_FORMAT),
            BACKUP_EXTENSION
        ))
    }
}
