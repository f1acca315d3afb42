//! Unified error handling for ccgo core.
//!
//! Wraps domain and application errors behind one type that carries
//! user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for ccgo core operations.
#[derive(Debug, Error, Clone)]
pub enum CcgoError {
    /// Errors from the domain layer (invalid values, unsupported combinations).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (environment, build, filesystem).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl CcgoError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your setup and try again".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in ccgo".into(),
                "Re-run with -vvv and include the output when reporting it".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Whether the run stopped because a build step failed.
    pub fn is_build_failure(&self) -> bool {
        matches!(self, Self::Application(ApplicationError::BuildFailed { .. }))
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Environment,
    Build,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type CcgoResult<T> = Result<T, CcgoError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> CcgoResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> CcgoResult<T> {
        self.map_err(|e| CcgoError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_wraps_as_internal() {
        let res: Result<(), std::io::Error> = Err(std::io::Error::other("boom"));
        let err = res.context("reading manifest").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Internal);
        assert!(err.to_string().contains("reading manifest: boom"));
    }

    #[test]
    fn domain_category_maps_through() {
        let err: CcgoError = DomainError::InvalidPlatform("ios".into()).into();
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(!err.is_build_failure());
    }
}
