use std::error::Error;

/// Base trait for all application errors
pub trait OpsError: Error + Send + Sync + 'static {
    /// Error code for programmatic handling
    fn error_code(&self) -> &'static str;

    /// Whether this error should be logged as an error or warning
    fn is_user_error(&self) -> bool {
        false
    }
}

/// Common result type for the application
pub type OpsResult<T> = Result<T, Box<dyn OpsError>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("disk on fire")]
    struct FireError;

    impl OpsError for FireError {
        fn error_code(&self) -> &'static str {
            "FIRE"
        }
    }

    #[test]
    fn test_ops_result() {
        let _result: OpsResult<i32> = Ok(42);
    }

    #[test]
    fn test_default_is_not_user_error() {
        let boxed: Box<dyn OpsError> = Box::new(FireError);
        assert_eq!(boxed.error_code(), "FIRE");
        assert!(!boxed.is_user_error());
        assert_eq!(boxed.to_string(), "disk on fire");
    }
}
