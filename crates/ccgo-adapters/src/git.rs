//! Git identity sources.
//!
//! `git config user.name` is asked in repository scope first, then in global
//! scope. Every failure (git missing, not a repository, key unset) is a
//! silent `None`.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::trace;

use ccgo_core::application::{
    IdentityResolver,
    ports::{CommandRunner, CommandSpec, IdentityField, IdentitySource},
};

/// Which `git config` scope a source reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitConfigScope {
    /// Repository config (falls through to global/system inside git itself).
    Local,
    /// `--global` only.
    Global,
}

impl GitConfigScope {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Global => "global",
        }
    }
}

/// One `git config` scope exposed as an [`IdentitySource`].
pub struct GitConfigSource {
    scope: GitConfigScope,
    cwd: PathBuf,
    runner: Arc<dyn CommandRunner>,
}

impl GitConfigSource {
    pub fn new(scope: GitConfigScope, cwd: impl Into<PathBuf>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            scope,
            cwd: cwd.into(),
            runner,
        }
    }

    fn command(&self, field: IdentityField) -> CommandSpec {
        let cmd = CommandSpec::new("git", &self.cwd).arg("config");
        let cmd = match self.scope {
            GitConfigScope::Local => cmd,
            GitConfigScope::Global => cmd.arg("--global"),
        };
        cmd.arg(field.config_key())
    }
}

impl IdentitySource for GitConfigSource {
    fn name(&self) -> String {
        format!("git {}", self.scope.as_str())
    }

    fn lookup(&self, field: IdentityField) -> Option<String> {
        match self.runner.capture(&self.command(field)) {
            Ok(out) if out.status.success() => Some(out.stdout.trim().to_string()),
            Ok(out) => {
                trace!(status = %out.status, "git config gave no value");
                None
            }
            Err(e) => {
                trace!(error = %e, "git config failed");
                None
            }
        }
    }
}

/// Repository scope, then global scope, both run in `cwd`.
pub fn git_identity_resolver(cwd: impl Into<PathBuf>, runner: Arc<dyn CommandRunner>) -> IdentityResolver {
    let cwd = cwd.into();
    IdentityResolver::new(vec![
        Box::new(GitConfigSource::new(
            GitConfigScope::Local,
            cwd.clone(),
            Arc::clone(&runner),
        )),
        Box::new(GitConfigSource::new(GitConfigScope::Global, cwd, runner)),
    ])
}

/// Git user name from repository then global config, else `default`.
pub fn git_user_name(
    cwd: impl Into<PathBuf>,
    runner: Arc<dyn CommandRunner>,
    default: &str,
) -> String {
    git_identity_resolver(cwd, runner).user_name(default)
}

/// Git user email from repository then global config, else `default`.
pub fn git_user_email(
    cwd: impl Into<PathBuf>,
    runner: Arc<dyn CommandRunner>,
    default: &str,
) -> String {
    git_identity_resolver(cwd, runner).user_email(default)
}
