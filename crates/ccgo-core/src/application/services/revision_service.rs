//! Revision header generation.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::{
    application::ports::{CommandRunner, CommandSpec, Filesystem},
    domain::RevisionInfo,
    error::CcgoResult,
};

/// Revision reported when the VCS cannot be queried.
pub const UNKNOWN_REVISION: &str = "unknown";

/// Queries the working copy revision and writes the revision header.
pub struct RevisionService {
    filesystem: Arc<dyn Filesystem>,
    runner: Arc<dyn CommandRunner>,
}

impl RevisionService {
    pub fn new(filesystem: Arc<dyn Filesystem>, runner: Arc<dyn CommandRunner>) -> Self {
        Self { filesystem, runner }
    }

    /// Short revision of the repository at `root`, or [`UNKNOWN_REVISION`].
    pub fn current_revision(&self, root: &Path) -> String {
        let cmd = CommandSpec::new("git", root).args(["rev-parse", "--short", "HEAD"]);
        match self.runner.capture(&cmd) {
            Ok(out) if out.status.success() && !out.stdout.trim().is_empty() => {
                out.stdout.trim().to_string()
            }
            Ok(out) => {
                debug!(status = %out.status, "git rev-parse gave no revision");
                UNKNOWN_REVISION.to_string()
            }
            Err(e) => {
                debug!(error = %e, "git unavailable");
                UNKNOWN_REVISION.to_string()
            }
        }
    }

    /// Write the header for `info` to `path`.
    ///
    /// With `keep_unchanged`, an existing file whose content differs only in
    /// the timestamp line is left alone so incremental builds don't recompile
    /// everything that includes it. Returns whether the file was written.
    #[instrument(skip(self, info), fields(path = %path.display()))]
    pub fn write_header(
        &self,
        path: &Path,
        info: &RevisionInfo,
        keep_unchanged: bool,
    ) -> CcgoResult<bool> {
        let header = info.render_header();

        if keep_unchanged && self.filesystem.exists(path) {
            if let Ok(existing) = self.filesystem.read_to_string(path) {
                if RevisionInfo::same_content(&existing, &header) {
                    debug!("Revision header unchanged");
                    return Ok(false);
                }
            }
        }

        if let Some(parent) = path.parent() {
            self.filesystem.create_dir_all(parent)?;
        }
        self.filesystem.write_file(path, header.as_bytes())?;
        info!(revision = %info.revision, "Revision header written");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::output::MockCommandRunner;
    use crate::application::ports::{CommandOutput, CommandStatus};
    use crate::error::CcgoError;

    struct NoFilesystem;

    impl Filesystem for NoFilesystem {
        fn exists(&self, _: &Path) -> bool {
            false
        }
        fn is_dir(&self, _: &Path) -> bool {
            false
        }
        fn create_dir_all(&self, _: &Path) -> CcgoResult<()> {
            Ok(())
        }
        fn remove_dir_all(&self, _: &Path) -> CcgoResult<()> {
            Ok(())
        }
        fn copy_file(&self, _: &Path, _: &Path) -> CcgoResult<()> {
            Ok(())
        }
        fn list_dir(&self, _: &Path) -> CcgoResult<Vec<std::path::PathBuf>> {
            Ok(Vec::new())
        }
        fn write_file(&self, _: &Path, _: &[u8]) -> CcgoResult<()> {
            Ok(())
        }
        fn read_to_string(&self, path: &Path) -> CcgoResult<String> {
            Err(CcgoError::Internal {
                message: format!("{} not found", path.display()),
            })
        }
        fn set_permissions(&self, _: &Path, _: bool) -> CcgoResult<()> {
            Ok(())
        }
    }

    fn service(runner: MockCommandRunner) -> RevisionService {
        RevisionService::new(Arc::new(NoFilesystem), Arc::new(runner))
    }

    #[test]
    fn revision_from_git_output() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_capture()
            .withf(|cmd| cmd.program == "git" && cmd.args == ["rev-parse", "--short", "HEAD"])
            .times(1)
            .returning(|_| {
                Ok(CommandOutput {
                    status: CommandStatus::SUCCESS,
                    stdout: "abc1234\n".into(),
                    stderr: String::new(),
                })
            });
        assert_eq!(service(runner).current_revision(Path::new("/p")), "abc1234");
    }

    #[test]
    fn revision_unknown_outside_repository() {
        let mut runner = MockCommandRunner::new();
        runner.expect_capture().returning(|_| {
            Ok(CommandOutput {
                status: CommandStatus::from_code(128),
                stdout: String::new(),
                stderr: "fatal: not a git repository".into(),
            })
        });
        assert_eq!(service(runner).current_revision(Path::new("/p")), UNKNOWN_REVISION);
    }

    #[test]
    fn revision_unknown_without_git() {
        let mut runner = MockCommandRunner::new();
        runner.expect_capture().returning(|cmd| {
            Err(CcgoError::Internal {
                message: format!("{} not installed", cmd.program),
            })
        });
        assert_eq!(service(runner).current_revision(Path::new("/p")), UNKNOWN_REVISION);
    }
}
