//! Build Service - per-platform native build orchestration.
//!
//! One run walks a fixed sequence:
//! 1. Check the SDK and CMake are usable (fatal before any architecture)
//! 2. Write the revision header
//! 3. For each architecture in caller order: clean, configure and build,
//!    collect, copy the STL, merge third-party libraries, strip
//!
//! The loop stops at the first architecture that fails; the returned
//! [`BuildReport`] says which succeeded, which failed and which were never
//! attempted.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::Local;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{CommandRunner, CommandSpec, Filesystem},
        services::revision_service::RevisionService,
    },
    domain::{
        Arch, ArchOutput, ArtifactFilter, BuildConfig, BuildReport, DomainValidator as validator,
        Platform, ProjectLayout, RevisionInfo, ThirdPartyPolicy,
    },
    error::{CcgoError, CcgoResult},
};

const CMAKE: &str = "cmake";

/// Everything one build run needs, resolved up front.
#[derive(Debug, Clone)]
pub struct BuildPlan {
    pub platform: Platform,
    pub config: BuildConfig,
    pub layout: ProjectLayout,
    /// Architectures in build order.
    pub archs: Vec<Arch>,
    pub filter: ArtifactFilter,
    pub policy: ThirdPartyPolicy,
    pub project: String,
    pub version: String,
    /// Tag stamped into the revision header.
    pub tag: String,
}

impl BuildPlan {
    /// An empty `archs` means every architecture the platform supports.
    pub fn new(
        platform: Platform,
        config: BuildConfig,
        layout: ProjectLayout,
        archs: Vec<Arch>,
    ) -> Self {
        let archs = if archs.is_empty() {
            platform.default_archs()
        } else {
            archs
        };
        Self {
            platform,
            config,
            layout,
            archs,
            filter: ArtifactFilter::none(),
            policy: ThirdPartyPolicy::default(),
            project: String::new(),
            version: "0.0.0".into(),
            tag: String::new(),
        }
    }

    pub fn with_filter(mut self, filter: ArtifactFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_policy(mut self, policy: ThirdPartyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_project(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.project = name.into();
        self.version = version.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }
}

/// Progress notifications emitted at phase boundaries.
#[derive(Debug, Clone, Copy)]
pub enum BuildEvent<'a> {
    EnvironmentReady { sdk_root: &'a Path },
    RevisionStamped { revision: &'a str, written: bool },
    ArchStarted { arch: &'a Arch, index: usize, total: usize },
    ArchSucceeded(&'a ArchOutput),
    ArchFailed { arch: &'a Arch, reason: &'a str },
}

/// Native build orchestrator.
pub struct BuildService {
    filesystem: Arc<dyn Filesystem>,
    runner: Arc<dyn CommandRunner>,
    revisions: RevisionService,
}

impl BuildService {
    pub fn new(filesystem: Arc<dyn Filesystem>, runner: Arc<dyn CommandRunner>) -> Self {
        let revisions = RevisionService::new(Arc::clone(&filesystem), Arc::clone(&runner));
        Self {
            filesystem,
            runner,
            revisions,
        }
    }

    /// Execute `plan`.
    ///
    /// Environment and validation problems are returned as `Err` before any
    /// architecture is attempted. Architecture failures are recorded in the
    /// report; call [`BuildReport::into_result`] to turn them into an error.
    pub fn run(&self, plan: &BuildPlan) -> CcgoResult<BuildReport> {
        self.run_with(plan, &mut |_| {})
    }

    /// Like [`run`](Self::run), reporting progress to `on_event`.
    #[instrument(
        skip_all,
        fields(platform = %plan.platform, archs = plan.archs.len())
    )]
    pub fn run_with(
        &self,
        plan: &BuildPlan,
        on_event: &mut dyn FnMut(BuildEvent<'_>),
    ) -> CcgoResult<BuildReport> {
        validator::validate_build_config(&plan.config)?;
        for arch in plan.platform.unknown_archs(&plan.archs) {
            warn!(
                arch = %arch,
                platform = %plan.platform,
                "Unknown architecture, passing it to the toolchain"
            );
        }

        self.check_environment(plan)?;
        on_event(BuildEvent::EnvironmentReady {
            sdk_root: &plan.config.sdk_root,
        });

        let (revision, written) = self.stamp_revision(plan)?;
        on_event(BuildEvent::RevisionStamped {
            revision: &revision,
            written,
        });

        let mut report = BuildReport::new(
            plan.platform,
            plan.archs.clone(),
            plan.layout.libs_root(),
            plan.layout.symbols_root(),
        );

        let total = plan.archs.len();
        for (index, arch) in plan.archs.iter().enumerate() {
            on_event(BuildEvent::ArchStarted { arch, index, total });
            match self.build_arch(plan, arch) {
                Ok(output) => {
                    info!(arch = %arch, elapsed_ms = output.elapsed.as_millis() as u64, "Architecture built");
                    on_event(BuildEvent::ArchSucceeded(&output));
                    report.record_success(output);
                }
                Err(e) => {
                    let reason = e.to_string();
                    warn!(arch = %arch, %reason, "Architecture failed, stopping");
                    on_event(BuildEvent::ArchFailed {
                        arch,
                        reason: &reason,
                    });
                    report.record_failure(arch.clone(), reason);
                    break;
                }
            }
        }

        Ok(report)
    }

    // -------------------------------------------------------------------------
    // Phases
    // -------------------------------------------------------------------------

    /// SDK root, toolchain file and CMake must all be present.
    pub fn check_environment(&self, plan: &BuildPlan) -> CcgoResult<()> {
        let sdk_root = &plan.config.sdk_root;
        let missing = |detail: String| -> CcgoError {
            ApplicationError::EnvironmentMissing {
                platform: plan.platform.display_name().to_string(),
                detail,
            }
            .into()
        };

        if sdk_root.as_os_str().is_empty() {
            return Err(missing(format!(
                "no SDK root configured; install the {}",
                plan.platform.sdk_description()
            )));
        }
        if !self.filesystem.is_dir(sdk_root) {
            return Err(missing(format!(
                "SDK root {} is not a directory",
                sdk_root.display()
            )));
        }
        let toolchain = plan.platform.toolchain_file(sdk_root);
        if !self.filesystem.exists(&toolchain) {
            return Err(missing(format!(
                "toolchain file {} not found",
                toolchain.display()
            )));
        }
        if !self.runner.is_available(CMAKE) {
            return Err(missing("cmake not found on PATH".into()));
        }

        debug!(sdk_root = %sdk_root.display(), "Build environment ready");
        Ok(())
    }

    fn stamp_revision(&self, plan: &BuildPlan) -> CcgoResult<(String, bool)> {
        let revision = self.revisions.current_revision(plan.layout.root());
        let info = RevisionInfo {
            project: plan.project.clone(),
            version: plan.version.clone(),
            revision: revision.clone(),
            tag: plan.tag.clone(),
            built_at: Local::now().naive_local(),
        };
        let written = self.revisions.write_header(
            plan.layout.revision_file(),
            &info,
            plan.config.incremental,
        )?;
        Ok((revision, written))
    }

    #[instrument(skip(self, plan), fields(arch = %arch))]
    fn build_arch(&self, plan: &BuildPlan, arch: &Arch) -> CcgoResult<ArchOutput> {
        let started = Instant::now();

        self.prepare_build_dir(plan)?;
        self.invoke_build(plan, arch)?;
        let (libs_dir, symbols_dir) = self.collect(plan, arch)?;
        self.copy_stl(plan, arch, &libs_dir, &symbols_dir)?;
        self.merge_third_party(plan, arch, &libs_dir)?;
        self.strip(plan, &libs_dir)?;

        Ok(ArchOutput {
            arch: arch.clone(),
            libs_dir,
            symbols_dir,
            elapsed: started.elapsed(),
        })
    }

    /// Remove the build-output directory unless incremental, then (re)create it.
    pub fn prepare_build_dir(&self, plan: &BuildPlan) -> CcgoResult<()> {
        let build_out = plan.layout.build_out();
        if plan.config.incremental {
            debug!(dir = %build_out.display(), "Incremental build, keeping build directory");
        } else {
            info!(dir = %build_out.display(), "Cleaning build directory");
            self.filesystem.remove_dir_all(build_out)?;
        }
        self.filesystem.create_dir_all(build_out)
    }

    fn invoke_build(&self, plan: &BuildPlan, arch: &Arch) -> CcgoResult<()> {
        let build_out = plan.layout.build_out();

        let configure = CommandSpec::new(CMAKE, build_out).args(plan.platform.configure_args(
            plan.layout.root(),
            &plan.config,
            arch,
        ));
        self.run_checked(&configure, "configure")?;

        let build = CommandSpec::new(CMAKE, build_out).args(plan.platform.build_args(&plan.config));
        self.run_checked(&build, "build")
    }

    fn run_checked(&self, command: &CommandSpec, step: &str) -> CcgoResult<()> {
        info!(cwd = %command.cwd.display(), "{command}");
        let status = self.runner.run(command)?;
        if status.success() {
            Ok(())
        } else {
            Err(ApplicationError::CommandFailed {
                program: format!("{} {step}", command.program),
                reason: status.to_string(),
            }
            .into())
        }
    }

    /// Recreate both output directories and copy every non-excluded shared
    /// library from the build-output directory into them.
    fn collect(&self, plan: &BuildPlan, arch: &Arch) -> CcgoResult<(PathBuf, PathBuf)> {
        let libs_dir = plan.layout.libs_dir(arch);
        let symbols_dir = plan.layout.symbols_dir(arch);
        for dir in [&libs_dir, &symbols_dir] {
            self.filesystem.remove_dir_all(dir)?;
            self.filesystem.create_dir_all(dir)?;
        }

        let ext = plan.platform.shared_lib_ext();
        let mut copied = 0usize;
        for artifact in self.shared_libs(plan.layout.build_out(), ext)? {
            if plan.filter.is_excluded(&artifact) {
                debug!(artifact = %artifact.display(), "Excluded");
                continue;
            }
            self.copy_into(&artifact, &symbols_dir)?;
            self.copy_into(&artifact, &libs_dir)?;
            copied += 1;
        }
        info!(copied, "Artifacts collected");
        Ok((libs_dir, symbols_dir))
    }

    /// Ship the SDK's STL unless a third-party component already bundles it.
    fn copy_stl(
        &self,
        plan: &BuildPlan,
        arch: &Arch,
        libs_dir: &Path,
        symbols_dir: &Path,
    ) -> CcgoResult<()> {
        let third_party = plan.layout.third_party();
        if !self.filesystem.is_dir(third_party) {
            return Ok(());
        }
        let components = self.component_names(third_party)?;
        if plan
            .policy
            .bundles_stl(components.iter().map(String::as_str))
        {
            debug!(component = %plan.policy.stl_component, "STL bundled by third party");
            return Ok(());
        }

        match plan.platform.stl_library(&plan.config.sdk_root, arch) {
            Some(stl) if self.filesystem.exists(&stl) => {
                self.copy_into(&stl, symbols_dir)?;
                self.copy_into(&stl, libs_dir)?;
                debug!(stl = %stl.display(), "STL copied");
            }
            Some(stl) => debug!(stl = %stl.display(), "STL library not found, skipping"),
            None => debug!("No STL library for this architecture"),
        }
        Ok(())
    }

    /// Copy `lib/<platform>/<arch>/*.<ext>` of every mergeable component.
    fn merge_third_party(&self, plan: &BuildPlan, arch: &Arch, libs_dir: &Path) -> CcgoResult<()> {
        let third_party = plan.layout.third_party();
        if !self.filesystem.is_dir(third_party) {
            debug!(dir = %third_party.display(), "No third-party directory");
            return Ok(());
        }

        let ext = plan.platform.shared_lib_ext();
        for component in self.component_names(third_party)? {
            if !plan.policy.should_merge(&component) {
                debug!(%component, "Not merged by policy");
                continue;
            }
            let lib_dir = plan
                .layout
                .component_lib_dir(&component, plan.platform, arch);
            if !self.filesystem.is_dir(&lib_dir) {
                debug!(%component, dir = %lib_dir.display(), "No libraries for this architecture");
                continue;
            }
            for lib in self.shared_libs(&lib_dir, ext)? {
                if plan.filter.is_excluded(&lib) {
                    debug!(lib = %lib.display(), "Excluded");
                    continue;
                }
                self.copy_into(&lib, libs_dir)?;
            }
            info!(%component, "Third-party libraries merged");
        }
        Ok(())
    }

    /// Strip every shared library in `libs_dir` in place. Failures only warn.
    fn strip(&self, plan: &BuildPlan, libs_dir: &Path) -> CcgoResult<()> {
        let tool = plan.platform.strip_tool(&plan.config.sdk_root);
        let tool = tool.display().to_string();
        for lib in self.shared_libs(libs_dir, plan.platform.shared_lib_ext())? {
            let cmd = CommandSpec::new(tool.as_str(), libs_dir).arg(lib.display().to_string());
            debug!("{cmd}");
            match self.runner.run(&cmd) {
                Ok(status) if status.success() => {}
                Ok(status) => warn!(lib = %lib.display(), %status, "Strip failed"),
                Err(e) => warn!(lib = %lib.display(), error = %e, "Strip failed"),
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn shared_libs(&self, dir: &Path, ext: &str) -> CcgoResult<Vec<PathBuf>> {
        Ok(self
            .filesystem
            .list_dir(dir)?
            .into_iter()
            .filter(|p| p.extension().is_some_and(|e| e == ext))
            .filter(|p| !self.filesystem.is_dir(p))
            .collect())
    }

    fn component_names(&self, third_party: &Path) -> CcgoResult<Vec<String>> {
        Ok(self
            .filesystem
            .list_dir(third_party)?
            .into_iter()
            .filter(|p| self.filesystem.is_dir(p))
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect())
    }

    fn copy_into(&self, file: &Path, dir: &Path) -> CcgoResult<()> {
        let name = file.file_name().ok_or_else(|| CcgoError::Internal {
            message: format!("artifact without file name: {}", file.display()),
        })?;
        self.filesystem.copy_file(file, &dir.join(name))
    }
}

impl BuildReport {
    /// Turn a report with a failed architecture into
    /// [`ApplicationError::BuildFailed`].
    pub fn into_result(self) -> CcgoResult<Self> {
        if self.is_success() {
            return Ok(self);
        }
        let (failed, reason) = self
            .failed
            .as_ref()
            .map(|f| (f.arch.to_string(), f.reason.clone()))
            .unwrap_or_default();
        let names = |archs: Vec<&Arch>| -> Vec<String> {
            archs.into_iter().map(Arch::to_string).collect()
        };
        Err(ApplicationError::BuildFailed {
            failed,
            reason,
            succeeded: names(self.succeeded_archs()),
            not_attempted: names(self.not_attempted()),
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::output::MockCommandRunner;
    use crate::application::ports::{CommandOutput, CommandStatus};
    use std::collections::BTreeSet;
    use std::sync::Mutex;

    /// Minimal directory-set filesystem; enough for the environment checks.
    #[derive(Default)]
    struct DirSet(Mutex<BTreeSet<PathBuf>>);

    impl DirSet {
        fn with(paths: &[&str]) -> Self {
            Self(Mutex::new(paths.iter().map(PathBuf::from).collect()))
        }
    }

    impl Filesystem for DirSet {
        fn exists(&self, path: &Path) -> bool {
            self.0.lock().unwrap().contains(path)
        }
        fn is_dir(&self, path: &Path) -> bool {
            self.exists(path)
        }
        fn create_dir_all(&self, path: &Path) -> CcgoResult<()> {
            self.0.lock().unwrap().insert(path.to_path_buf());
            Ok(())
        }
        fn remove_dir_all(&self, path: &Path) -> CcgoResult<()> {
            self.0.lock().unwrap().retain(|p| !p.starts_with(path));
            Ok(())
        }
        fn copy_file(&self, _: &Path, _: &Path) -> CcgoResult<()> {
            Ok(())
        }
        fn list_dir(&self, _: &Path) -> CcgoResult<Vec<PathBuf>> {
            Ok(Vec::new())
        }
        fn write_file(&self, _: &Path, _: &[u8]) -> CcgoResult<()> {
            Ok(())
        }
        fn read_to_string(&self, _: &Path) -> CcgoResult<String> {
            Ok(String::new())
        }
        fn set_permissions(&self, _: &Path, _: bool) -> CcgoResult<()> {
            Ok(())
        }
    }

    const TOOLCHAIN: &str = "/sdk/native/build/cmake/ohos.toolchain.cmake";

    fn plan(sdk: &str, archs: &[&str]) -> BuildPlan {
        BuildPlan::new(
            Platform::Ohos,
            BuildConfig::new(sdk),
            ProjectLayout::conventional("/p", Platform::Ohos, "demo"),
            archs.iter().map(|a| Arch::new(*a).unwrap()).collect(),
        )
        .with_project("demo", "1.0.0")
    }

    fn git_unknown(runner: &mut MockCommandRunner) {
        runner.expect_capture().returning(|_| {
            Ok(CommandOutput {
                status: CommandStatus::from_code(128),
                stdout: String::new(),
                stderr: String::new(),
            })
        });
    }

    fn service(fs: DirSet, runner: MockCommandRunner) -> BuildService {
        BuildService::new(Arc::new(fs), Arc::new(runner))
    }

    #[test]
    fn empty_archs_means_platform_defaults() {
        let plan = plan("/sdk", &[]);
        assert_eq!(plan.archs, Platform::Ohos.default_archs());
    }

    #[test]
    fn empty_sdk_root_is_environment_error() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().never();
        let err = service(DirSet::default(), runner)
            .run(&plan("", &["arm64-v8a"]))
            .unwrap_err();
        assert!(matches!(
            err,
            CcgoError::Application(ApplicationError::EnvironmentMissing { .. })
        ));
    }

    #[test]
    fn missing_toolchain_is_environment_error() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().never();
        let err = service(DirSet::with(&["/sdk"]), runner)
            .run(&plan("/sdk", &["arm64-v8a"]))
            .unwrap_err();
        assert!(err.to_string().contains("toolchain file"));
    }

    #[test]
    fn missing_cmake_is_environment_error() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_is_available()
            .withf(|p| p == "cmake")
            .return_const(false);
        runner.expect_run().never();
        let err = service(DirSet::with(&["/sdk", TOOLCHAIN]), runner)
            .run(&plan("/sdk", &["arm64-v8a"]))
            .unwrap_err();
        assert!(err.to_string().contains("cmake not found"));
    }

    #[test]
    fn unknown_arch_reaches_the_toolchain() {
        let mut runner = MockCommandRunner::new();
        runner.expect_is_available().return_const(true);
        git_unknown(&mut runner);
        runner
            .expect_run()
            .withf(|spec| spec.program == "cmake")
            .times(1)
            .returning(|_| Ok(CommandStatus::from_code(1)));

        let report = service(DirSet::with(&["/sdk", TOOLCHAIN]), runner)
            .run(&plan("/sdk", &["riscv64"]))
            .unwrap();
        assert_eq!(report.failed.as_ref().unwrap().arch.as_str(), "riscv64");
    }

    #[test]
    fn failing_configure_stops_after_first_arch() {
        let mut runner = MockCommandRunner::new();
        runner.expect_is_available().return_const(true);
        git_unknown(&mut runner);
        runner
            .expect_run()
            .times(1)
            .returning(|_| Ok(CommandStatus::from_code(1)));

        let report = service(DirSet::with(&["/sdk", TOOLCHAIN]), runner)
            .run(&plan("/sdk", &["armeabi-v7a", "arm64-v8a", "x86_64"]))
            .unwrap();

        assert!(report.succeeded.is_empty());
        assert_eq!(report.failed.as_ref().unwrap().arch.as_str(), "armeabi-v7a");
        assert_eq!(report.not_attempted().len(), 2);

        let err = report.into_result().unwrap_err();
        assert!(err.is_build_failure());
    }

    #[test]
    fn successful_report_into_result_is_ok() {
        let report = BuildReport::new(Platform::Ohos, vec![], "/l", "/s");
        assert!(report.into_result().is_ok());
    }
}
