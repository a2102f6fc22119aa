use std::path::{Path, PathBuf};

/// Environment variable that overrides the configuration directory.
pub const CONFIG_DIR_ENV: &str = "OPS_TOOLKIT_CONFIG_DIR";

pub const CONFIG_DIR_NAME: &str = ".ops-toolkit";
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const BACKUP_DIR_NAME: &str = "backups";

/// Filesystem locations owned by the configuration manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    config_dir: PathBuf,
    config_file: PathBuf,
    backup_dir: PathBuf,
}

impl ConfigPaths {
    /// Lay out the config file and backup directory under `config_dir`.
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        let config_dir = config_dir.into();
        Self {
            config_file: config_dir.join(CONFIG_FILE_NAME),
            backup_dir: config_dir.join(BACKUP_DIR_NAME),
            config_dir,
        }
    }

    /// Resolve the per-user configuration directory.
    ///
    /// Uses `OPS_TOOLKIT_CONFIG_DIR` when set and non-empty, otherwise
    /// `~/.ops-toolkit`. Falls back to `./.ops-toolkit` if the home directory
    /// cannot be determined.
    pub fn resolve() -> Self {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
            && !dir.is_empty()
        {
            return Self::new(dir);
        }

        match dirs::home_dir() {
            Some(home) => Self::new(home.join(CONFIG_DIR_NAME)),
            None => {
                tracing::error!(
                    event = "core.config.home_dir_not_found",
                    fallback = ".",
                    "Could not determine home directory - using current directory as fallback"
                );
                Self::new(PathBuf::from(".").join(CONFIG_DIR_NAME))
            }
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serializes tests that touch OPS_TOOLKIT_CONFIG_DIR.
    static CONFIG_DIR_ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Removes OPS_TOOLKIT_CONFIG_DIR on drop.
    struct ConfigDirEnvGuard;

    impl ConfigDirEnvGuard {
        fn set(value: &str) -> Self {
            // SAFETY: callers hold CONFIG_DIR_ENV_LOCK, which serializes every
            // test in this crate that reads or writes the variable.
            unsafe { std::env::set_var(CONFIG_DIR_ENV, value) };
            Self
        }
    }

    impl Drop for ConfigDirEnvGuard {
        fn drop(&mut self) {
            // SAFETY: see ConfigDirEnvGuard::set.
            unsafe { std::env::remove_var(CONFIG_DIR_ENV) };
        }
    }

    #[test]
    fn test_new_lays_out_children() {
        let paths = ConfigPaths::new("/tmp/ops");
        assert_eq!(paths.config_dir(), Path::new("/tmp/ops"));
        assert_eq!(paths.config_file(), Path::new("/tmp/ops/config.json"));
        assert_eq!(paths.backup_dir(), Path::new("/tmp/ops/backups"));
    }

    #[test]
    fn test_resolve_env_override() {
        let _lock = CONFIG_DIR_ENV_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let custom = temp_dir.path().join("custom");

        let _guard = ConfigDirEnvGuard::set(custom.to_str().unwrap());

        let paths = ConfigPaths::resolve();
        assert_eq!(paths.config_dir(), custom.as_path());
    }

    #[test]
    fn test_resolve_empty_env_uses_default() {
        let _lock = CONFIG_DIR_ENV_LOCK.lock().unwrap();
        let _guard = ConfigDirEnvGuard::set("");

        let paths = ConfigPaths::resolve();
        assert!(paths.config_dir().ends_with(CONFIG_DIR_NAME));
        assert!(paths.config_file().ends_with("config.json"));
    }
}
