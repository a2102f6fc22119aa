//! ops-core: Core library for the ops toolkit
//!
//! Owns the persistent configuration and the host information used by the
//! `ops` CLI.
//!
//! # Main Entry Points
//!
//! - [`config`] - Load, query, mutate and roll back the configuration
//! - [`system`] - Host and process snapshots for monitoring
//! - [`logging`] - Structured JSON logging setup

pub mod config;
pub mod errors;
pub mod events;
pub mod logging;
pub mod system;

// Re-export commonly used types at crate root for convenience
pub use config::{ConfigError, ConfigManager, ConfigPaths, ConfigTree, OpsConfig};
pub use errors::{OpsError, OpsResult};
pub use system::{HostSnapshot, ProcessSort, ProcessSummary, SystemError};

// Re-export logging initialization
pub use logging::init_logging;
