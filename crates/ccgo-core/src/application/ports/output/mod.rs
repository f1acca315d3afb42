//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `ccgo-adapters` crate provides implementations.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::CcgoResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `ccgo_adapters::filesystem::LocalFilesystem` (production)
/// - `ccgo_adapters::filesystem::MemoryFilesystem` (testing)
pub trait Filesystem: Send + Sync {
    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is an existing directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> CcgoResult<()>;

    /// Remove a directory and all contents. Missing directories are fine.
    fn remove_dir_all(&self, path: &Path) -> CcgoResult<()>;

    /// Copy one file, overwriting the destination.
    fn copy_file(&self, from: &Path, to: &Path) -> CcgoResult<()>;

    /// Immediate children of a directory, sorted by path.
    fn list_dir(&self, path: &Path) -> CcgoResult<Vec<PathBuf>>;

    /// Write content to a file.
    fn write_file(&self, path: &Path, content: &[u8]) -> CcgoResult<()>;

    /// Read a UTF-8 file.
    fn read_to_string(&self, path: &Path) -> CcgoResult<String>;

    /// Set file permissions.
    fn set_permissions(&self, path: &Path, executable: bool) -> CcgoResult<()>;
}

/// An external program invocation.
///
/// The working directory is always explicit; the runner never relies on the
/// process-wide current directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Exit status of a finished command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    /// `None` when the process was killed by a signal.
    pub code: Option<i32>,
}

impl CommandStatus {
    pub const SUCCESS: Self = Self { code: Some(0) };

    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit status {code}"),
            None => f.write_str("terminated by signal"),
        }
    }
}

/// Output of a captured command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub status: CommandStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Port for running external programs.
///
/// Implemented by:
/// - `ccgo_adapters::process::SystemCommandRunner`
///
/// `Err` means the program could not be started at all; a program that ran
/// and failed is reported through its [`CommandStatus`].
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner: Send + Sync {
    /// Run with inherited stdout/stderr.
    fn run(&self, command: &CommandSpec) -> CcgoResult<CommandStatus>;

    /// Run and capture stdout/stderr.
    fn capture(&self, command: &CommandSpec) -> CcgoResult<CommandOutput>;

    /// Whether `program` can be found on PATH.
    fn is_available(&self, program: &str) -> bool;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `ccgo_adapters::renderer::HandlebarsRenderer`
pub trait TemplateRenderer: Send + Sync {
    /// Render a template string against a JSON context.
    fn render_str(&self, template: &str, context: &serde_json::Value) -> CcgoResult<String>;
}

/// Identity attribute an [`IdentitySource`] can answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityField {
    UserName,
    UserEmail,
}

impl IdentityField {
    /// Version-control configuration key.
    pub const fn config_key(&self) -> &'static str {
        match self {
            Self::UserName => "user.name",
            Self::UserEmail => "user.email",
        }
    }
}

/// Port for one scope of ambient identity configuration.
///
/// Implemented by:
/// - `ccgo_adapters::git::GitConfigSource`
///
/// Lookups never fail: anything that goes wrong is `None`.
#[cfg_attr(test, mockall::automock)]
pub trait IdentitySource: Send + Sync {
    fn name(&self) -> String;

    fn lookup(&self, field: IdentityField) -> Option<String>;
}
