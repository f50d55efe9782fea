//! Generic error handling utilities
//!
//! Errors that reach the top of the binary are reported through
//! [`log_error_with_context`], which picks between a user-facing message and
//! a generic operation context depending on the error kind.

/// Errors that can tell user-actionable failures from system failures.
///
/// When `is_user_actionable()` returns `true`, `user_message()` should return
/// `Some(message)`; otherwise it should return `None`.
pub trait ContextualError: std::error::Error {
    /// True if the error message is something the user can fix directly
    /// (bad configuration, unknown option), false for system failures.
    fn is_user_actionable(&self) -> bool;

    /// The message to show the user for actionable errors
    fn user_message(&self) -> Option<&str>;
}

/// Log an error with a detail level based on its kind.
///
/// User-actionable errors print their own message; system errors print the
/// operation context. Full detail is always available at debug level.
pub fn log_error_with_context<E: ContextualError + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message().filter(|_| error.is_user_actionable()) {
        Some(user_msg) => log::error!("FATAL: {}", user_msg),
        None => log::error!("FATAL: {}", operation_context),
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("{message}")]
    struct TestUserError {
        message: String,
    }

    impl ContextualError for TestUserError {
        fn is_user_actionable(&self) -> bool {
            true
        }

        fn user_message(&self) -> Option<&str> {
            Some(&self.message)
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("System error: {0}")]
    struct TestSystemError(String);

    impl ContextualError for TestSystemError {
        fn is_user_actionable(&self) -> bool {
            false
        }

        fn user_message(&self) -> Option<&str> {
            None
        }
    }

    #[test]
    fn test_user_actionable_error_exposes_message() {
        let error = TestUserError {
            message: "Unknown log format".to_string(),
        };
        assert!(error.is_user_actionable());
        assert_eq!(error.user_message(), Some("Unknown log format"));
        log_error_with_context(&error, "Configuration loading");
    }

    #[test]
    fn test_system_error_has_no_user_message() {
        let error = TestSystemError("connection refused".to_string());
        assert!(!error.is_user_actionable());
        assert_eq!(error.user_message(), None);
        log_error_with_context(&error, "Plugin discovery");
    }
}
