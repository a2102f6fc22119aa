use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::config::types::MonitorConfig;
use crate::system::errors::SystemError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemoryUsage {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub available_bytes: u64,
}

impl MemoryUsage {
    pub fn used_percent(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        self.used_bytes as f64 / self.total_bytes as f64 * 100.0
    }
}

/// Point-in-time view of the host.
#[derive(Debug, Clone, Serialize)]
pub struct HostSnapshot {
    pub hostname: Option<String>,
    pub os_name: Option<String>,
    pub os_version: Option<String>,
    pub kernel_version: Option<String>,
    pub uptime_secs: u64,
    pub load_average: LoadAverage,
    pub cpu_count: usize,
    pub cpu_usage_percent: f32,
    pub memory: MemoryUsage,
    pub swap: MemoryUsage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessSummary {
    pub pid: u32,
    pub name: String,
    pub cpu_usage_percent: f32,
    pub memory_bytes: u64,
    pub status: String,
}

impl ProcessSummary {
    pub fn memory_mb(&self) -> u64 {
        self.memory_bytes / 1_024 / 1_024
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessSort {
    /// Highest CPU usage first
    #[default]
    Cpu,
    /// Largest resident memory first
    Memory,
    /// Alphabetical, case-insensitive
    Name,
}

impl FromStr for ProcessSort {
    type Err = SystemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cpu" => Ok(ProcessSort::Cpu),
            "memory" | "mem" => Ok(ProcessSort::Memory),
            "name" => Ok(ProcessSort::Name),
            _ => Err(SystemError::InvalidSortKey { key: s.to_string() }),
        }
    }
}

impl fmt::Display for ProcessSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessSort::Cpu => write!(f, "cpu"),
            ProcessSort::Memory => write!(f, "memory"),
            ProcessSort::Name => write!(f, "name"),
        }
    }
}

/// What to list, after applying the monitor settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessQuery {
    pub sort: ProcessSort,
    pub limit: usize,
}

impl ProcessQuery {
    /// Build a query honoring `monitor.showProcesses` and `monitor.maxProcesses`.
    ///
    /// An explicit `limit` overrides the configured maximum.
    pub fn from_config(
        monitor: &MonitorConfig,
        sort: ProcessSort,
        limit: Option<usize>,
    ) -> Result<Self, SystemError> {
        if !monitor.show_processes {
            return Err(SystemError::ProcessListDisabled);
        }

        let limit = limit.unwrap_or(monitor.max_processes);
        if limit == 0 {
            return Err(SystemError::InvalidLimit);
        }

        Ok(Self { sort, limit })
    }
}
