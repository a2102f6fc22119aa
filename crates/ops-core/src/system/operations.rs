use std::sync::{LazyLock, Mutex};
use std::thread;
use sysinfo::{MINIMUM_CPU_UPDATE_INTERVAL, ProcessesToUpdate, System};
use tracing::debug;

use crate::system::types::{
    HostSnapshot, LoadAverage, MemoryUsage, ProcessQuery, ProcessSort, ProcessSummary,
};

// Shared system instance so CPU deltas accumulate across calls
static SYSTEM: LazyLock<Mutex<System>> = LazyLock::new(|| Mutex::new(System::new()));

/// Collect a snapshot of the host.
///
/// CPU usage needs two samples; this blocks for
/// `sysinfo::MINIMUM_CPU_UPDATE_INTERVAL` between them.
pub fn host_snapshot() -> HostSnapshot {
    let mut system = SYSTEM.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    system.refresh_memory();
    system.refresh_cpu_usage();
    thread::sleep(MINIMUM_CPU_UPDATE_INTERVAL);
    system.refresh_cpu_usage();

    let load = System::load_average();
    let snapshot = HostSnapshot {
        hostname: System::host_name(),
        os_name: System::name(),
        os_version: System::os_version(),
        kernel_version: System::kernel_version(),
        uptime_secs: System::uptime(),
        load_average: LoadAverage {
            one: load.one,
            five: load.five,
            fifteen: load.fifteen,
        },
        cpu_count: system.cpus().len(),
        cpu_usage_percent: system.global_cpu_usage(),
        memory: MemoryUsage {
            total_bytes: system.total_memory(),
            used_bytes: system.used_memory(),
            available_bytes: system.available_memory(),
        },
        swap: MemoryUsage {
            total_bytes: system.total_swap(),
            used_bytes: system.used_swap(),
            available_bytes: system.free_swap(),
        },
    };

    debug!(
        event = "core.system.host_snapshot_completed",
        cpu_count = snapshot.cpu_count,
        memory_total = snapshot.memory.total_bytes
    );

    snapshot
}

/// List running processes ordered and truncated per `query`.
pub fn list_processes(query: ProcessQuery) -> Vec<ProcessSummary> {
    let mut system = SYSTEM.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    system.refresh_processes(ProcessesToUpdate::All, true);
    thread::sleep(MINIMUM_CPU_UPDATE_INTERVAL);
    system.refresh_processes(ProcessesToUpdate::All, true);

    let processes: Vec<ProcessSummary> = system
        .processes()
        .iter()
        .map(|(pid, process)| ProcessSummary {
            pid: pid.as_u32(),
            name: process.name().to_string_lossy().to_string(),
            cpu_usage_percent: process.cpu_usage(),
            memory_bytes: process.memory(),
            status: process.status().to_string(),
        })
        .collect();

    debug!(
        event = "core.system.processes_listed",
        total = processes.len(),
        sort = %query.sort,
        limit = query.limit
    );

    sort_and_limit(processes, query.sort, query.limit)
}

/// Order `processes` by `sort` and keep at most `limit` of them.
///
/// Ties fall back to ascending PID so output is stable between runs.
pub fn sort_and_limit(
    mut processes: Vec<ProcessSummary>,
    sort: ProcessSort,
    limit: usize,
) -> Vec<ProcessSummary> {
    match sort {
        ProcessSort::Cpu => processes.sort_by(|a, b| {
            b.cpu_usage_percent
                .total_cmp(&a.cpu_usage_percent)
                .then(a.pid.cmp(&b.pid))
        }),
        ProcessSort::Memory => processes.sort_by(|a, b| {
            b.memory_bytes
                .cmp(&a.memory_bytes)
                .then(a.pid.cmp(&b.pid))
        }),
        ProcessSort::Name => processes.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a.pid.cmp(&b.pid))
        }),
    }
    processes.truncate(limit);
    processes
}
