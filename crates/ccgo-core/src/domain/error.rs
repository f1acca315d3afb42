// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (so reports can carry them)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid architecture '{arch}': {reason}")]
    InvalidArch { arch: String, reason: String },

    #[error("Unknown build mode '{0}'")]
    InvalidBuildMode(String),

    #[error("Unknown platform '{0}'")]
    InvalidPlatform(String),

    #[error("Invalid build configuration: {0}")]
    InvalidBuildConfig(String),

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Duplicate path in template: {path}")]
    DuplicatePath { path: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Path leaves the project directory: {path}")]
    PathEscapesRoot { path: String },

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidArch { arch, .. } => vec![
                format!("'{}' is not a usable architecture name", arch),
                "Architecture names look like: arm64-v8a, armeabi-v7a, x86_64".into(),
            ],
            Self::InvalidBuildMode(mode) => vec![
                format!("'{}' is not a build mode", mode),
                "Use 1/clean, 2/incremental, 3/test or 4/exit".into(),
            ],
            Self::InvalidPlatform(platform) => vec![
                format!("'{}' is not a supported platform", platform),
                "Supported platforms: ohos, android".into(),
            ],
            Self::AbsolutePathNotAllowed { .. } | Self::PathEscapesRoot { .. } => vec![
                "Template paths must stay inside the destination".into(),
                "Check variables used in file and directory names for '/' or '..'".into(),
            ],
            Self::InvalidTemplate(msg) => vec![
                "Check the template directory".into(),
                format!("Details: {}", msg),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidArch { .. }
            | Self::InvalidBuildMode(_)
            | Self::InvalidPlatform(_)
            | Self::InvalidBuildConfig(_)
            | Self::InvalidTemplate(_)
            | Self::DuplicatePath { .. }
            | Self::AbsolutePathNotAllowed { .. }
            | Self::PathEscapesRoot { .. } => ErrorCategory::Validation,
            Self::MissingRequiredField { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
