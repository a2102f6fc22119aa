use clap::ArgMatches;
use tracing::{error, info};

use ops_core::OpsError;
use ops_core::system::{self, HostSnapshot, ProcessQuery, ProcessSort, SystemError};

use super::helpers::load_config_with_warning;
use crate::table::ProcessTable;

pub(crate) fn handle_monitor_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    match matches.subcommand() {
        Some(("system", sub_matches)) => handle_system(sub_matches),
        Some(("processes", sub_matches)) => handle_processes(sub_matches),
        _ => {
            error!(event = "cli.monitor_subcommand_unknown");
            Err("Unknown monitor subcommand".into())
        }
    }
}

fn handle_system(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    info!(event = "cli.monitor_system_started");

    let snapshot = system::host_snapshot();

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_snapshot(&snapshot);
    }

    info!(event = "cli.monitor_system_completed");
    Ok(())
}

fn handle_processes(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_with_warning();

    let sort: ProcessSort = matches
        .get_one::<String>("sort")
        .map(|s| s.parse())
        .transpose()?
        .unwrap_or_default();
    let limit = matches.get_one::<usize>("limit").copied();

    let query = match ProcessQuery::from_config(&config.monitor, sort, limit) {
        Ok(query) => query,
        Err(e @ SystemError::ProcessListDisabled) => {
            eprintln!("❌ {}", e);
            eprintln!("Tip: ops config set monitor.showProcesses true");
            error!(
                event = "cli.monitor_processes_refused",
                reason = "disabled",
                error_code = e.error_code()
            );
            return Err(e.into());
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            error!(
                event = "cli.monitor_processes_failed",
                error = %e,
                error_code = e.error_code()
            );
            return Err(e.into());
        }
    };

    info!(
        event = "cli.monitor_processes_started",
        sort = %query.sort,
        limit = query.limit
    );

    let processes = system::list_processes(query);

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&processes)?);
    } else if processes.is_empty() {
        println!("No processes found.");
    } else {
        ProcessTable::new(&processes).print_table(&processes);
        println!("Showing {} process(es), sorted by {}.", processes.len(), query.sort);
    }

    info!(
        event = "cli.monitor_processes_completed",
        count = processes.len()
    );
    Ok(())
}

fn print_snapshot(snapshot: &HostSnapshot) {
    let unknown = || "unknown".to_string();

    println!("Host:     {}", snapshot.hostname.clone().unwrap_or_else(unknown));
    println!(
        "OS:       {} {}",
        snapshot.os_name.clone().unwrap_or_else(unknown),
        snapshot.os_version.clone().unwrap_or_default()
    );
    println!(
        "Kernel:   {}",
        snapshot.kernel_version.clone().unwrap_or_else(unknown)
    );
    println!("Uptime:   {}", format_uptime(snapshot.uptime_secs));
    println!(
        "Load:     {:.2} {:.2} {:.2}",
        snapshot.load_average.one, snapshot.load_average.five, snapshot.load_average.fifteen
    );
    println!(
        "CPU:      {} cores, {:.1}% used",
        snapshot.cpu_count, snapshot.cpu_usage_percent
    );
    println!(
        "Memory:   {} / {} MB ({:.1}%)",
        snapshot.memory.used_bytes / 1_024 / 1_024,
        snapshot.memory.total_bytes / 1_024 / 1_024,
        snapshot.memory.used_percent()
    );
    if snapshot.swap.total_bytes > 0 {
        println!(
            "Swap:     {} / {} MB ({:.1}%)",
            snapshot.swap.used_bytes / 1_024 / 1_024,
            snapshot.swap.total_bytes / 1_024 / 1_024,
            snapshot.swap.used_percent()
        );
    }
}

fn format_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;

    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(59), "0m");
        assert_eq!(format_uptime(3_660), "1h 1m");
        assert_eq!(format_uptime(2 * 86_400 + 5 * 3_600 + 7 * 60), "2d 5h 7m");
    }
}
