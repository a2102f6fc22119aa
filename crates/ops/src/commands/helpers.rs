use serde_json::Value;
use tracing::{error, warn};

use ops_core::OpsError;
use ops_core::config::{ConfigError, ConfigManager, OpsConfig};

/// Build the manager for the current user and load the configuration.
///
/// Prints the failure with a tip pointing at the file, since nothing can be
/// read or changed until the file loads.
pub fn open_manager() -> Result<ConfigManager, ConfigError> {
    let mut manager = ConfigManager::from_env();

    if let Err(e) = manager.initialize() {
        eprintln!("❌ Could not load configuration: {}", e);
        eprintln!(
            "Tip: Fix {}, run 'ops config reset --force', or restore a file listed by 'ops config backups'.",
            manager.config_file().display()
        );
        error!(
            event = "cli.config.load_failed",
            config_file = %manager.config_file().display(),
            error = %e,
            error_code = e.error_code()
        );
        return Err(e);
    }

    Ok(manager)
}

/// Typed settings for read-only commands, falling back to defaults.
pub fn load_config_with_warning() -> OpsConfig {
    let mut manager = ConfigManager::from_env();

    match manager.initialize().and_then(|()| manager.typed()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Could not load config: {}. Using defaults.\n\
                 Tip: Check {} for syntax errors.",
                e,
                manager.config_file().display()
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                error_code = e.error_code(),
                "Config load failed, using defaults"
            );
            OpsConfig::default()
        }
    }
}

/// Interpret a command-line value: JSON when it parses, otherwise a string.
///
/// `10` becomes a number, `true` a boolean, `{"a":1}` a tree, and `dark`
/// stays the string `"dark"`.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Render a value for terminal output. Strings print without quotes.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}
