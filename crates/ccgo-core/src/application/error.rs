//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The native toolchain for the platform is not usable.
    #[error("{platform} build environment is missing: {detail}")]
    EnvironmentMissing { platform: String, detail: String },

    /// A build run stopped at a failed architecture.
    #[error(
        "Build failed for {failed}: {reason} (succeeded: [{}], not attempted: [{}])",
        succeeded.join(", "),
        not_attempted.join(", ")
    )]
    BuildFailed {
        failed: String,
        reason: String,
        succeeded: Vec<String>,
        not_attempted: Vec<String>,
    },

    /// An external command could not be started.
    #[error("Failed to run '{program}': {reason}")]
    CommandFailed { program: String, reason: String },

    /// Template rendering failed.
    #[error("Template rendering failed: {reason}")]
    RenderingFailed { reason: String },

    /// Template could not be loaded.
    #[error("Template not found at {path}")]
    TemplateNotFound { path: PathBuf },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Shared state lock poisoned.
    #[error("Internal store lock poisoned")]
    StoreLockError,

    /// Validation failed (application-level, not domain).
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Project already exists at target location.
    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    /// Rollback failed (best-effort cleanup failed).
    #[error("Rollback failed for {path}: {reason}")]
    RollbackFailed { path: PathBuf, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::EnvironmentMissing { platform, .. } => vec![
                format!("Install the {platform} SDK and point ccgo at it"),
                "Pass --sdk-root, set build.sdk_root in the config file,".into(),
                "or export the SDK environment variable (e.g. OHOS_SDK_HOME, ANDROID_NDK_HOME)".into(),
                "Make sure cmake is on PATH".into(),
            ],
            Self::BuildFailed { failed, .. } => vec![
                format!("Fix the build errors for {failed} shown above"),
                "Re-run with -vv to see every command".into(),
                "Pass the remaining architectures explicitly to resume".into(),
            ],
            Self::CommandFailed { program, .. } => vec![
                format!("Check that '{program}' is installed and on PATH"),
            ],
            Self::TemplateNotFound { path } => vec![
                format!("No template directory at {}", path.display()),
                "Pass an existing directory with --template".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::ProjectExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Use --force to overwrite (destructive)".into(),
                "Choose a different destination".into(),
            ],
            Self::RenderingFailed { .. } => vec![
                "Check the template syntax near the reported line".into(),
                "Pass missing variables with --var KEY=VALUE".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EnvironmentMissing { .. } => ErrorCategory::Environment,
            Self::BuildFailed { .. } | Self::CommandFailed { .. } => ErrorCategory::Build,
            Self::TemplateNotFound { .. } => ErrorCategory::NotFound,
            Self::FilesystemError { .. } | Self::RollbackFailed { .. } => ErrorCategory::Internal,
            Self::StoreLockError => ErrorCategory::Internal,
            Self::ValidationFailed(_) => ErrorCategory::Validation,
            Self::ProjectExists { .. } => ErrorCategory::Validation,
            Self::RenderingFailed { .. } => ErrorCategory::Validation,
        }
    }
}
