use crate::errors::OpsError;

#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    #[error("Unknown sort key '{key}' (expected one of: cpu, memory, name)")]
    InvalidSortKey { key: String },

    #[error("Process limit must be at least 1")]
    InvalidLimit,

    #[error("Process listing is disabled (set monitor.showProcesses to true to enable it)")]
    ProcessListDisabled,
}

impl OpsError for SystemError {
    fn error_code(&self) -> &'static str {
        match self {
            SystemError::InvalidSortKey { .. } => "SYSTEM_INVALID_SORT_KEY",
            SystemError::InvalidLimit => "SYSTEM_INVALID_LIMIT",
            SystemError::ProcessListDisabled => "SYSTEM_PROCESS_LIST_DISABLED",
        }
    }

    fn is_user_error(&self) -> bool {
        true
    }
}
