use std::path::PathBuf;

use crate::domain::error::DomainError;

/// Settings shared by every architecture of one build run.
///
/// Constructed once from configuration and passed by reference into each
/// phase; nothing reads ambient process state after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Root of the installed SDK/NDK. May be empty, in which case the
    /// environment check fails.
    pub sdk_root: PathBuf,
    /// CMake generator (`-G`). `None` uses the platform default.
    pub generator: Option<String>,
    /// Minimum platform API level, e.g. `10` for `ohos-10`.
    pub min_platform_version: String,
    /// STL variant, e.g. `c++_shared`.
    pub stl: String,
    /// Keep the previous build-output directory.
    pub incremental: bool,
    /// Extra options appended to the configure step.
    pub target_option: Option<String>,
    /// Parallel jobs handed to the native build tool.
    pub jobs: u16,
}

impl BuildConfig {
    pub fn new(sdk_root: impl Into<PathBuf>) -> Self {
        Self {
            sdk_root: sdk_root.into(),
            generator: None,
            min_platform_version: "10".into(),
            stl: "c++_shared".into(),
            incremental: false,
            target_option: None,
            jobs: 8,
        }
    }

    pub fn with_generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = Some(generator.into());
        self
    }

    pub fn with_min_platform_version(mut self, version: impl Into<String>) -> Self {
        self.min_platform_version = version.into();
        self
    }

    pub fn with_stl(mut self, stl: impl Into<String>) -> Self {
        self.stl = stl.into();
        self
    }

    pub fn with_incremental(mut self, incremental: bool) -> Self {
        self.incremental = incremental;
        self
    }

    /// Set the extra configure options; an empty string clears them.
    pub fn with_target_option(mut self, option: impl Into<String>) -> Self {
        let option = option.into();
        self.target_option = (!option.trim().is_empty()).then_some(option);
        self
    }

    pub fn with_jobs(mut self, jobs: u16) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.jobs == 0 {
            return Err(DomainError::InvalidBuildConfig(
                "job count must be at least 1".into(),
            ));
        }
        if self.min_platform_version.trim().is_empty() {
            return Err(DomainError::MissingRequiredField {
                field: "min_platform_version",
            });
        }
        if self.stl.trim().is_empty() {
            return Err(DomainError::MissingRequiredField { field: "stl" });
        }
        Ok(())
    }
}
