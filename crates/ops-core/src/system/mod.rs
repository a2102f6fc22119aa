//! Host and process information for the monitoring commands.
//!
//! Reads live data through `sysinfo`. Nothing here touches the configuration
//! manager; callers pass in the monitor settings they want honored.

pub mod errors;
pub mod operations;
pub mod types;

pub use errors::SystemError;
pub use operations::{host_snapshot, list_processes, sort_and_limit};
pub use types::{HostSnapshot, LoadAverage, MemoryUsage, ProcessQuery, ProcessSort, ProcessSummary};
