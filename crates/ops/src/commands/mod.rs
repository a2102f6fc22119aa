use clap::ArgMatches;
use tracing::error;

use ops_core::events;

pub mod helpers;

mod completions;
mod config;
mod monitor;

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    events::log_app_startup();

    match matches.subcommand() {
        Some(("config", sub_matches)) => {
            events::log_command_dispatched("config", sub_matches.subcommand_name());
            config::handle_config_command(sub_matches)
        }
        Some(("monitor", sub_matches)) => {
            events::log_command_dispatched("monitor", sub_matches.subcommand_name());
            monitor::handle_monitor_command(sub_matches)
        }
        Some(("completions", sub_matches)) => {
            events::log_command_dispatched("completions", None);
            completions::handle_completions_command(sub_matches)
        }
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}
