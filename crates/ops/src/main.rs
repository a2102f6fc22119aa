use ops_core::events;
use ops_core::init_logging;

mod app;
mod commands;
mod table;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let app = app::build_cli();
    let matches = app.get_matches();

    // Quiet unless -v/--verbose was given
    let verbose = matches.get_flag("verbose");
    init_logging(!verbose);

    let result = commands::run_command(&matches);
    if let Err(e) = &result {
        events::log_app_error(e.as_ref());
    }
    events::log_app_shutdown(result.is_ok());

    result
}
