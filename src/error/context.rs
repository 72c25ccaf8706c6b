//! Error context utilities
//!
//! Helpers for attaching context to foreign errors and for deciding whether
//! an error is worth stopping for.

use crate::error::{ErrorSeverity, ReachabilityError, Result};
use std::path::Path;

/// Extension trait for Result to add context to errors
pub trait ResultExt<T, E> {
    /// Add context to an error with a custom message
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;

    /// Add file context to an error
    fn with_file_context<P: AsRef<Path>>(self, path: P) -> Result<T>;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error + 'static,
{
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        self.map_err(|err| ReachabilityError::Analysis {
            message: format!("{}: {}", context(), err),
        })
    }

    fn with_file_context<P: AsRef<Path>>(self, path: P) -> Result<T> {
        self.map_err(|err| {
            let dyn_err: &(dyn std::error::Error + 'static) = &err;
            // walkdir wraps the io error it failed with
            let io_err = dyn_err
                .downcast_ref::<std::io::Error>()
                .or_else(|| dyn_err.source().and_then(|source| source.downcast_ref::<std::io::Error>()));
            if let Some(io_err) = io_err {
                if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                    return ReachabilityError::PermissionDenied {
                        path: path.as_ref().to_path_buf(),
                    };
                }
            }

            ReachabilityError::DirectoryTraversal {
                path: path.as_ref().to_path_buf(),
                message: format!("{}", err),
            }
        })
    }
}

/// Handle an error based on its severity
///
/// - Warning: Log the error and return None
/// - Error: Log the error and return None
/// - Critical: Log the error and return Some(error)
pub fn handle_error(err: ReachabilityError) -> Option<ReachabilityError> {
    let message = err.user_message();

    match err.severity() {
        ErrorSeverity::Warning => {
            tracing::warn!("{}", message);
            None
        }
        ErrorSeverity::Error => {
            tracing::error!("{}", message);
            None
        }
        ErrorSeverity::Critical => {
            tracing::error!("critical: {}", message);
            Some(err)
        }
    }
}

/// Try to run a function and handle any errors based on their severity
///
/// Returns Ok(Some(T)) if the function succeeds, Ok(None) for recovered errors,
/// or Err for critical ones.
pub fn try_with_recovery<T, F>(f: F) -> Result<Option<T>>
where
    F: FnOnce() -> Result<T>,
{
    match f() {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            if let Some(critical_err) = handle_error(err) {
                Err(critical_err)
            } else {
                Ok(None)
            }
        }
    }
}

/// Extension trait for Option to convert to Result with a custom error
pub trait OptionExt<T> {
    /// Convert Option to Result with a custom error
    fn ok_or_error<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> ReachabilityError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_error<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> ReachabilityError,
    {
        self.ok_or_else(err_fn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_with_context() {
        let result: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::NotFound, "file not found"));

        let with_context = result.with_context(|| "Failed to read components");

        match with_context {
            Err(ReachabilityError::Analysis { message }) => {
                assert!(message.contains("Failed to read components"));
                assert!(message.contains("file not found"));
            }
            other => panic!("Expected Analysis error, got {:?}", other),
        }
    }

    #[test]
    fn test_with_file_context() {
        let result: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::NotFound, "file not found"));

        match result.with_file_context("test/path") {
            Err(ReachabilityError::DirectoryTraversal { path, .. }) => {
                assert_eq!(path.to_string_lossy(), "test/path");
            }
            other => panic!("Expected DirectoryTraversal error, got {:?}", other),
        }
    }

    #[test]
    fn test_with_file_context_permission_denied() {
        let result: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"));

        match result.with_file_context("test/path") {
            Err(ReachabilityError::PermissionDenied { path }) => {
                assert_eq!(path.to_string_lossy(), "test/path");
            }
            other => panic!("Expected PermissionDenied error, got {:?}", other),
        }
    }

    #[test]
    fn test_try_with_recovery() {
        let recovered: Result<Option<i32>> =
            try_with_recovery(|| Err(ReachabilityError::permission_denied("x")));
        assert!(matches!(recovered, Ok(None)));

        let critical: Result<Option<i32>> =
            try_with_recovery(|| Err(ReachabilityError::config_error("bad")));
        assert!(critical.is_err());

        let ok = try_with_recovery(|| Ok(7));
        assert_eq!(ok.unwrap(), Some(7));
    }

    #[test]
    fn test_option_ext() {
        let none: Option<i32> = None;
        let result = none.ok_or_error(|| ReachabilityError::config_error("Missing value"));

        match result {
            Err(ReachabilityError::Config { message }) => assert_eq!(message, "Missing value"),
            other => panic!("Expected Config error, got {:?}", other),
        }

        let some = Some(42);
        let result = some.ok_or_error(|| ReachabilityError::config_error("Missing value"));
        assert_eq!(result.unwrap(), 42);
    }
}
