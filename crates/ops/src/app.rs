use clap::{Arg, ArgAction, Command, value_parser};
use clap_complete::Shell;

use ops_core::config::defaults::DEFAULT_BACKUPS_KEPT;

pub fn build_cli() -> Command {
    Command::new("ops")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Operations toolkit: configuration, monitoring and deployment helpers")
        .long_about("ops keeps its settings in ~/.ops-toolkit/config.json (override with OPS_TOOLKIT_CONFIG_DIR). Every change is backed up first and rolled back if it cannot be written or fails validation.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("config")
                .about("Show and change persisted settings")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(
                    Command::new("get")
                        .about("Print one setting by dotted key, or the whole configuration")
                        .arg(
                            Arg::new("key")
                                .help("Dotted key, e.g. monitor.refreshInterval")
                                .index(1)
                        )
                        .arg(
                            Arg::new("json")
                                .long("json")
                                .help("Output in JSON format")
                                .action(ArgAction::SetTrue)
                        )
                )
                .subcommand(
                    Command::new("set")
                        .about("Change one setting (backed up and validated)")
                        .arg(
                            Arg::new("key")
                                .help("Dotted key, e.g. ui.theme")
                                .required(true)
                                .index(1)
                        )
                        .arg(
                            Arg::new("value")
                                .help("New value; parsed as JSON when possible, otherwise stored as a string")
                                .required(true)
                                .allow_hyphen_values(true)
                                .index(2)
                        )
                )
                .subcommand(
                    Command::new("reset")
                        .about("Restore every setting to its default (the current file is backed up)")
                        .arg(
                            Arg::new("force")
                                .long("force")
                                .help("Overwrite the file even if it cannot be loaded")
                                .action(ArgAction::SetTrue)
                        )
                )
                .subcommand(
                    Command::new("reload")
                        .about("Re-read the configuration file and validate it")
                )
                .subcommand(
                    Command::new("validate")
                        .about("Run every validator against the current configuration")
                )
                .subcommand(
                    Command::new("path")
                        .about("Show the configuration directory, file and backup directory")
                )
                .subcommand(
                    Command::new("backups")
                        .about("List configuration backups, oldest first")
                        .arg(
                            Arg::new("clean")
                                .long("clean")
                                .help("Delete all but the most recent backups")
                                .action(ArgAction::SetTrue)
                        )
                        .arg(
                            Arg::new("keep")
                                .long("keep")
                                .help(format!("Number of backups kept by --clean (default: {})", DEFAULT_BACKUPS_KEPT))
                                .value_parser(value_parser!(usize))
                                .requires("clean")
                        )
                )
        )
        .subcommand(
            Command::new("monitor")
                .about("Inspect the local host")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(
                    Command::new("system")
                        .about("Show host, CPU and memory information")
                        .arg(
                            Arg::new("json")
                                .long("json")
                                .help("Output in JSON format")
                                .action(ArgAction::SetTrue)
                        )
                )
                .subcommand(
                    Command::new("processes")
                        .about("List the busiest processes")
                        .arg(
                            Arg::new("sort")
                                .long("sort")
                                .short('s')
                                .help("Sort order")
                                .value_parser(["cpu", "memory", "name"])
                                .default_value("cpu")
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .short('n')
                                .help("Maximum number of processes (default: monitor.maxProcesses)")
                                .value_parser(value_parser!(usize))
                        )
                        .arg(
                            Arg::new("json")
                                .long("json")
                                .help("Output in JSON format")
                                .action(ArgAction::SetTrue)
                        )
                )
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .help("Target shell")
                        .required(true)
                        .index(1)
                        .value_parser(value_parser!(Shell))
                )
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_build() {
        let app = build_cli();
        assert_eq!(app.get_name(), "ops");
        app.debug_assert();
    }

    #[test]
    fn test_cli_config_get_without_key() {
        let app = build_cli();
        let matches = app.try_get_matches_from(vec!["ops", "config", "get", "--json"]);
        assert!(matches.is_ok());

        let matches = matches.unwrap();
        let config_matches = matches.subcommand_matches("config").unwrap();
        let get_matches = config_matches.subcommand_matches("get").unwrap();
        assert!(get_matches.get_one::<String>("key").is_none());
        assert!(get_matches.get_flag("json"));
    }

    #[test]
    fn test_cli_config_set() {
        let app = build_cli();
        let matches = app
            .try_get_matches_from(vec!["ops", "config", "set", "monitor.refreshInterval", "-5"])
            .unwrap();

        let set_matches = matches
            .subcommand_matches("config")
            .unwrap()
            .subcommand_matches("set")
            .unwrap();
        assert_eq!(
            set_matches.get_one::<String>("key").unwrap(),
            "monitor.refreshInterval"
        );
        assert_eq!(set_matches.get_one::<String>("value").unwrap(), "-5");
    }

    #[test]
    fn test_cli_config_set_requires_value() {
        let app = build_cli();
        let matches = app.try_get_matches_from(vec!["ops", "config", "set", "ui.theme"]);
        assert!(matches.is_err());
    }

    #[test]
    fn test_cli_backups_clean_without_keep() {
        let app = build_cli();
        let matches = app
            .try_get_matches_from(vec!["ops", "config", "backups", "--clean"])
            .unwrap();

        let backups_matches = matches
            .subcommand_matches("config")
            .unwrap()
            .subcommand_matches("backups")
            .unwrap();
        assert!(backups_matches.get_flag("clean"));
        assert!(backups_matches.get_one::<usize>("keep").is_none());
    }

    #[test]
    fn test_cli_reset_force_flag() {
        let app = build_cli();

        let matches = app
            .clone()
            .try_get_matches_from(vec!["ops", "config", "reset", "--force"])
            .unwrap();
        let config = matches.subcommand_matches("config").unwrap();
        let reset = config.subcommand_matches("reset").unwrap();
        assert!(reset.get_flag("force"));

        let matches = app
            .try_get_matches_from(vec!["ops", "config", "reset"])
            .unwrap();
        let config = matches.subcommand_matches("config").unwrap();
        let reset = config.subcommand_matches("reset").unwrap();
        assert!(!reset.get_flag("force"));
    }

    #[test]
    fn test_cli_keep_requires_clean() {
        let app = build_cli();
        let matches = app.try_get_matches_from(vec!["ops", "config", "backups", "--keep", "3"]);
        assert!(matches.is_err());
    }

    #[test]
    fn test_cli_processes_sort_values() {
        let app = build_cli();
        let matches = app
            .try_get_matches_from(vec!["ops", "monitor", "processes", "--sort", "memory", "-n", "5"])
            .unwrap();

        let processes_matches = matches
            .subcommand_matches("monitor")
            .unwrap()
            .subcommand_matches("processes")
            .unwrap();
        assert_eq!(
            processes_matches.get_one::<String>("sort").unwrap(),
            "memory"
        );
        assert_eq!(*processes_matches.get_one::<usize>("limit").unwrap(), 5);

        let app = build_cli();
        let invalid = app.try_get_matches_from(vec!["ops", "monitor", "processes", "--sort", "pid"]);
        assert!(invalid.is_err());
    }

    #[test]
    fn test_cli_verbose_is_global() {
        let app = build_cli();
        let matches = app
            .try_get_matches_from(vec!["ops", "config", "path", "-v"])
            .unwrap();
        assert!(matches.get_flag("verbose"));
    }

    #[test]
    fn test_cli_completions_shell() {
        let app = build_cli();
        let matches = app
            .try_get_matches_from(vec!["ops", "completions", "bash"])
            .unwrap();
        let completions_matches = matches.subcommand_matches("completions").unwrap();
        assert_eq!(
            *completions_matches.get_one::<Shell>("shell").unwrap(),
            Shell::Bash
        );
    }
}
