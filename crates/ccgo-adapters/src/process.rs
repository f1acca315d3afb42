//! Process runner backed by `std::process::Command`.

use std::process::{Command, ExitStatus, Stdio};

use tracing::{debug, instrument};

use ccgo_core::{
    application::{
        ApplicationError,
        ports::{CommandOutput, CommandRunner, CommandSpec, CommandStatus},
    },
    error::{CcgoError, CcgoResult},
};

/// Runs programs on the host.
///
/// Every command gets its working directory from the [`CommandSpec`]; the
/// process-wide current directory is never changed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }

    fn command(spec: &CommandSpec) -> Command {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args).current_dir(&spec.cwd);
        cmd
    }
}

impl CommandRunner for SystemCommandRunner {
    #[instrument(skip_all, fields(program = %spec.program, cwd = %spec.cwd.display()))]
    fn run(&self, spec: &CommandSpec) -> CcgoResult<CommandStatus> {
        let status = Self::command(spec)
            .stdin(Stdio::null())
            .status()
            .map_err(|e| spawn_error(spec, e))?;
        debug!(%status, "Command finished");
        Ok(to_status(status))
    }

    #[instrument(skip_all, fields(program = %spec.program, cwd = %spec.cwd.display()))]
    fn capture(&self, spec: &CommandSpec) -> CcgoResult<CommandOutput> {
        let output = Self::command(spec)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| spawn_error(spec, e))?;
        Ok(CommandOutput {
            status: to_status(output.status),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn is_available(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

fn to_status(status: ExitStatus) -> CommandStatus {
    CommandStatus {
        code: status.code(),
    }
}

fn spawn_error(spec: &CommandSpec, e: std::io::Error) -> CcgoError {
    ApplicationError::CommandFailed {
        program: spec.program.clone(),
        reason: e.to_string(),
    }
    .into()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn capture_runs_in_given_directory() {
        let temp = TempDir::new().unwrap();
        let spec = CommandSpec::new("pwd", temp.path());
        let out = SystemCommandRunner::new().capture(&spec).unwrap();

        assert!(out.status.success());
        let reported = std::path::PathBuf::from(out.stdout.trim());
        assert_eq!(
            reported.canonicalize().unwrap(),
            temp.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn nonzero_exit_is_a_status_not_an_error() {
        let temp = TempDir::new().unwrap();
        let spec = CommandSpec::new("sh", temp.path()).args(["-c", "exit 3"]);
        let status = SystemCommandRunner::new().run(&spec).unwrap();
        assert_eq!(status, CommandStatus::from_code(3));
    }

    #[test]
    fn missing_program_is_an_error() {
        let temp = TempDir::new().unwrap();
        let spec = CommandSpec::new("ccgo-no-such-program", temp.path());
        let err = SystemCommandRunner::new().run(&spec).unwrap_err();
        assert!(err.to_string().contains("ccgo-no-such-program"));
        assert!(!SystemCommandRunner::new().is_available("ccgo-no-such-program"));
    }

    #[test]
    fn sh_is_available() {
        assert!(SystemCommandRunner::new().is_available("sh"));
    }
}
