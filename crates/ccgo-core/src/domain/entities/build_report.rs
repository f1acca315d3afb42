use std::path::PathBuf;
use std::time::Duration;

use crate::domain::{platform::Platform, value_objects::Arch};

/// Result of building one architecture successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchOutput {
    pub arch: Arch,
    /// Stripped, distributable libraries.
    pub libs_dir: PathBuf,
    /// Unstripped libraries; must be archived.
    pub symbols_dir: PathBuf,
    pub elapsed: Duration,
}

/// The architecture at which a run stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchFailure {
    pub arch: Arch,
    pub reason: String,
}

/// Summary of one build run.
///
/// The loop stops at the first failure, so at most one architecture is ever
/// recorded as failed; everything after it is "not attempted".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub platform: Platform,
    pub requested: Vec<Arch>,
    pub succeeded: Vec<ArchOutput>,
    pub failed: Option<ArchFailure>,
    pub libs_root: PathBuf,
    pub symbols_root: PathBuf,
}

impl BuildReport {
    pub fn new(
        platform: Platform,
        requested: Vec<Arch>,
        libs_root: impl Into<PathBuf>,
        symbols_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            platform,
            requested,
            succeeded: Vec::new(),
            failed: None,
            libs_root: libs_root.into(),
            symbols_root: symbols_root.into(),
        }
    }

    pub fn record_success(&mut self, output: ArchOutput) {
        self.succeeded.push(output);
    }

    pub fn record_failure(&mut self, arch: Arch, reason: impl Into<String>) {
        self.failed = Some(ArchFailure {
            arch,
            reason: reason.into(),
        });
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_none()
    }

    pub fn succeeded_archs(&self) -> Vec<&Arch> {
        self.succeeded.iter().map(|o| &o.arch).collect()
    }

    /// Requested architectures that did not succeed, failed one included.
    pub fn unsuccessful_archs(&self) -> Vec<&Arch> {
        self.requested
            .iter()
            .filter(|arch| !self.succeeded.iter().any(|o| &o.arch == *arch))
            .collect()
    }

    /// Requested architectures the run never reached.
    pub fn not_attempted(&self) -> Vec<&Arch> {
        self.unsuccessful_archs()
            .into_iter()
            .filter(|arch| self.failed.as_ref().is_none_or(|f| &f.arch != *arch))
            .collect()
    }
}
