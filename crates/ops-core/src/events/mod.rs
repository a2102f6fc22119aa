//! Application lifecycle events shared by the CLI and library.

use tracing::{error, info};

pub fn log_app_startup() {
    info!(
        event = "core.app.startup_completed",
        version = env!("CARGO_PKG_VERSION")
    );
}

pub fn log_app_shutdown(exit_ok: bool) {
    info!(event = "core.app.shutdown_started", exit_ok = exit_ok);
}

/// Record which top-level command the dispatcher is about to run.
pub fn log_command_dispatched(command: &str, subcommand: Option<&str>) {
    info!(
        event = "core.app.command_dispatched",
        command = command,
        subcommand = subcommand.unwrap_or("")
    );
}

pub fn log_app_error(error: &dyn std::error::Error) {
    error!(
        event = "core.app.error_occurred",
        error = %error,
        error_type = std::any::type_name_of_val(error)
    );
}
