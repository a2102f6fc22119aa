use clap::ArgMatches;
use serde_json::Value;
use tracing::{error, info};

use ops_core::OpsError;
use ops_core::config::defaults::DEFAULT_BACKUPS_KEPT;
use ops_core::config::{ConfigError, ConfigManager, ConfigTree};

use super::helpers::{display_value, open_manager, parse_value};

pub(crate) fn handle_config_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    match matches.subcommand() {
        Some(("get", sub_matches)) => handle_get(sub_matches),
        Some(("set", sub_matches)) => handle_set(sub_matches),
        Some(("reset", sub_matches)) => handle_reset(sub_matches),
        Some(("reload", _)) => handle_reload(),
        Some(("validate", _)) => handle_validate(),
        Some(("path", _)) => handle_path(),
        Some(("backups", sub_matches)) => handle_backups(sub_matches),
        _ => {
            error!(event = "cli.config_subcommand_unknown");
            Err("Unknown config subcommand".into())
        }
    }
}

fn handle_get(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    let manager = open_manager()?;

    let Some(key) = matches.get_one::<String>("key") else {
        let tree = manager.get_all()?;
        if json_output {
            println!("{}", serde_json::to_string_pretty(&tree)?);
        } else {
            for line in flatten_for_display(&tree) {
                println!("{}", line);
            }
        }
        return Ok(());
    };

    info!(event = "cli.config_get_started", key = %key);

    match manager.get(key)? {
        Some(value) => {
            if json_output {
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{}", display_value(&value));
            }
            info!(event = "cli.config_get_completed", key = %key);
            Ok(())
        }
        None => {
            eprintln!("❌ Configuration key '{}' not found", key);
            eprintln!("Tip: Use 'ops config get' to list every setting.");
            error!(event = "cli.config_get_failed", key = %key, reason = "not_found");
            Err(format!("Configuration key '{}' not found", key).into())
        }
    }
}

fn handle_set(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let key = matches
        .get_one::<String>("key")
        .ok_or("Key argument is required")?;
    let raw = matches
        .get_one::<String>("value")
        .ok_or("Value argument is required")?;
    let value = parse_value(raw);

    info!(event = "cli.config_set_started", key = %key);

    let mut manager = open_manager()?;
    if let Err(e) = manager.set(key, value.clone()) {
        report_mutation_failure("set", &e);
        error!(
            event = "cli.config_set_failed",
            key = %key,
            error = %e,
            error_code = e.error_code()
        );
        return Err(e.into());
    }

    println!("✅ {} = {}", key, display_value(&value));
    info!(event = "cli.config_set_completed", key = %key);
    Ok(())
}

fn handle_reset(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let force = matches.get_flag("force");
    info!(event = "cli.config_reset_started", force = force);

    let mut manager = if force {
        // Skip loading so an unparseable file can still be replaced
        ConfigManager::from_env()
    } else {
        open_manager()?
    };
    let result = if force {
        manager.force_reset()
    } else {
        manager.reset()
    };
    if let Err(e) = result {
        report_mutation_failure("reset", &e);
        error!(
            event = "cli.config_reset_failed",
            error = %e,
            error_code = e.error_code()
        );
        return Err(e.into());
    }

    println!("✅ Configuration reset to defaults.");
    println!(
        "   Previous settings were backed up to {}",
        manager.backup_dir().display()
    );
    info!(event = "cli.config_reset_completed");
    Ok(())
}

fn handle_reload() -> Result<(), Box<dyn std::error::Error>> {
    let mut manager = open_manager()?;

    if let Err(e) = manager.reload() {
        eprintln!("❌ Reload failed: {}", e);
        error!(
            event = "cli.config_reload_failed",
            error = %e,
            error_code = e.error_code()
        );
        return Err(e.into());
    }

    println!(
        "✅ Configuration reloaded from {}",
        manager.config_file().display()
    );
    info!(event = "cli.config_reload_completed");
    Ok(())
}

fn handle_validate() -> Result<(), Box<dyn std::error::Error>> {
    // initialize() already validates; a failure there is reported by open_manager
    let manager = open_manager()?;

    match manager.validate() {
        Ok(()) => {
            println!(
                "✅ Configuration is valid ({} validators: {})",
                manager.validator_names().len(),
                manager.validator_names().join(", ")
            );
            Ok(())
        }
        Err(e) => {
            print_validation_errors(&e);
            error!(
                event = "cli.config_validate_failed",
                error = %e,
                error_code = e.error_code()
            );
            Err(e.into())
        }
    }
}

fn handle_path() -> Result<(), Box<dyn std::error::Error>> {
    let manager = ConfigManager::from_env();

    println!("Config directory: {}", manager.config_dir().display());
    println!("Config file:      {}", manager.config_file().display());
    println!("Backups:          {}", manager.backup_dir().display());
    Ok(())
}

fn handle_backups(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    // Backups are plain files; listing or pruning them works even when the
    // configuration itself does not load.
    let manager = ConfigManager::from_env();

    if matches.get_flag("clean") {
        let keep = matches
            .get_one::<usize>("keep")
            .copied()
            .unwrap_or(DEFAULT_BACKUPS_KEPT);
        info!(event = "cli.config_backups_clean_started", keep = keep);

        let removed = match manager.clean_old_backups(keep) {
            Ok(removed) => removed,
            Err(e) => {
                eprintln!("❌ Could not clean backups: {}", e);
                error!(
                    event = "cli.config_backups_clean_failed",
                    error = %e,
                    error_code = e.error_code()
                );
                return Err(e.into());
            }
        };

        println!("✅ Removed {} old backup(s), kept up to {}.", removed, keep);
        info!(event = "cli.config_backups_clean_completed", removed = removed);
        return Ok(());
    }

    let backups = manager.list_backups()?;
    if backups.is_empty() {
        println!("No backups in {}", manager.backup_dir().display());
        return Ok(());
    }

    println!("Backups in {}:", manager.backup_dir().display());
    for backup in &backups {
        let created = backup
            .created_at()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "unknown time".to_string());
        println!("  {}  {}", created, backup.name);
    }
    println!("Total: {}", backups.len());
    Ok(())
}

fn report_mutation_failure(operation: &str, error: &ConfigError) {
    match error {
        ConfigError::ValidationFailed { .. } => {
            print_validation_errors(error);
            eprintln!("   The {} was rolled back; no settings changed.", operation);
        }
        ConfigError::RollbackFailed { .. } => {
            eprintln!("❌ {} failed and the previous file could not be restored:", operation);
            eprintln!("   {}", error);
            eprintln!("Tip: Copy a file from 'ops config backups' over the config file by hand.");
        }
        _ => {
            eprintln!("❌ {} failed: {}", operation, error);
            eprintln!("   The {} was rolled back; no settings changed.", operation);
        }
    }
}

fn print_validation_errors(error: &ConfigError) {
    match error {
        ConfigError::ValidationFailed { errors, .. } => {
            eprintln!("❌ Configuration validation failed:");
            for message in errors {
                eprintln!("   {}", message);
            }
        }
        other => eprintln!("❌ {}", other),
    }
}

/// `section.key = value` lines, one level deep like the merge rule.
fn flatten_for_display(tree: &ConfigTree) -> Vec<String> {
    let mut lines = Vec::new();
    for (key, value) in tree {
        match value {
            Value::Object(section) if !section.is_empty() => {
                for (inner_key, inner_value) in section {
                    lines.push(format!(
                        "{}.{} = {}",
                        key,
                        inner_key,
                        serde_json::to_string(inner_value).unwrap_or_default()
                    ));
                }
            }
            other => lines.push(format!(
                "{} = {}",
                key,
                serde_json::to_string(other).unwrap_or_default()
            )),
        }
    }
    lines
}
