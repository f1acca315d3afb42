//! End-to-end build orchestration against the in-memory filesystem and a
//! scripted toolchain.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use ccgo_adapters::MemoryFilesystem;
use ccgo_core::application::ports::{
    CommandOutput, CommandRunner, CommandSpec, CommandStatus, Filesystem,
};
use ccgo_core::application::{ApplicationError, BuildEvent, BuildPlan, BuildService};
use ccgo_core::domain::{
    Arch, ArtifactFilter, BuildConfig, Platform, ProjectLayout, ThirdPartyPolicy,
};
use ccgo_core::error::{CcgoError, CcgoResult};

const SDK: &str = "/sdk";
const TOOLCHAIN: &str = "/sdk/native/build/cmake/ohos.toolchain.cmake";
const ROOT: &str = "/p";

/// Pretends to be cmake, git and llvm-strip.
struct FakeToolchain {
    fs: MemoryFilesystem,
    /// Files the build step drops into its working directory.
    artifacts: Vec<&'static str>,
    fail_step: Option<&'static str>,
    cmake_available: bool,
    calls: Mutex<Vec<CommandSpec>>,
}

impl FakeToolchain {
    fn new(fs: &MemoryFilesystem) -> Self {
        Self {
            fs: fs.clone(),
            artifacts: vec!["libdemo.so"],
            fail_step: None,
            cmake_available: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn producing(mut self, artifacts: &[&'static str]) -> Self {
        self.artifacts = artifacts.to_vec();
        self
    }

    fn failing(mut self, step: &'static str) -> Self {
        self.fail_step = Some(step);
        self
    }

    fn step(cmd: &CommandSpec) -> &'static str {
        match cmd.program.as_str() {
            "cmake" if cmd.args.first().map(String::as_str) == Some("--build") => "build",
            "cmake" => "configure",
            "git" => "git",
            p if p.ends_with("llvm-strip") => "strip",
            _ => "other",
        }
    }

    fn calls_for(&self, step: &str) -> Vec<CommandSpec> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| Self::step(c) == step)
            .cloned()
            .collect()
    }
}

impl CommandRunner for FakeToolchain {
    fn run(&self, command: &CommandSpec) -> CcgoResult<CommandStatus> {
        self.calls.lock().unwrap().push(command.clone());
        let step = Self::step(command);
        if self.fail_step == Some(step) {
            return Ok(CommandStatus::from_code(1));
        }
        if step == "build" {
            for artifact in &self.artifacts {
                self.fs.write_file(&command.cwd.join(artifact), b"\x7fELF")?;
            }
        }
        Ok(CommandStatus::SUCCESS)
    }

    fn capture(&self, command: &CommandSpec) -> CcgoResult<CommandOutput> {
        self.calls.lock().unwrap().push(command.clone());
        Ok(CommandOutput {
            status: CommandStatus::SUCCESS,
            stdout: "abc1234\n".into(),
            stderr: String::new(),
        })
    }

    fn is_available(&self, program: &str) -> bool {
        program != "cmake" || self.cmake_available
    }
}

fn sdk_fs() -> MemoryFilesystem {
    MemoryFilesystem::new()
        .with_file(TOOLCHAIN, "# toolchain")
        .with_dir(ROOT)
}

fn archs(names: &[&str]) -> Vec<Arch> {
    names.iter().map(|n| Arch::new(*n).unwrap()).collect()
}

fn plan(names: &[&str], incremental: bool) -> BuildPlan {
    BuildPlan::new(
        Platform::Ohos,
        BuildConfig::new(SDK).with_incremental(incremental),
        ProjectLayout::conventional(ROOT, Platform::Ohos, "demo"),
        archs(names),
    )
    .with_project("demo", "1.0.0")
    .with_tag("1")
}

fn service(fs: &MemoryFilesystem, runner: &Arc<FakeToolchain>) -> BuildService {
    BuildService::new(Arc::new(fs.clone()), runner.clone())
}

fn names(files: Vec<PathBuf>) -> Vec<String> {
    files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn failing_build_tool_aborts_after_first_arch() {
    let fs = sdk_fs();
    let runner = Arc::new(FakeToolchain::new(&fs).failing("configure"));

    let report = service(&fs, &runner)
        .run(&plan(&["armeabi-v7a", "arm64-v8a", "x86_64"], false))
        .unwrap();

    assert!(report.succeeded.is_empty());
    assert_eq!(report.failed.as_ref().unwrap().arch.as_str(), "armeabi-v7a");
    assert_eq!(report.not_attempted().len(), 2);
    assert_eq!(runner.calls_for("configure").len(), 1);
    assert!(runner.calls_for("build").is_empty());

    match report.into_result() {
        Err(CcgoError::Application(ApplicationError::BuildFailed {
            failed,
            succeeded,
            not_attempted,
            ..
        })) => {
            assert_eq!(failed, "armeabi-v7a");
            assert!(succeeded.is_empty());
            assert_eq!(not_attempted, ["arm64-v8a", "x86_64"]);
        }
        other => panic!("expected BuildFailed, got {other:?}"),
    }
}

#[test]
fn failing_build_step_stops_run() {
    let fs = sdk_fs();
    let runner = Arc::new(FakeToolchain::new(&fs).failing("build"));

    let report = service(&fs, &runner)
        .run(&plan(&["armeabi-v7a", "arm64-v8a"], false))
        .unwrap();

    assert_eq!(runner.calls_for("configure").len(), 1);
    assert_eq!(runner.calls_for("build").len(), 1);
    assert_eq!(report.failed.unwrap().arch.as_str(), "armeabi-v7a");
}

#[test]
fn excluded_artifacts_never_reach_outputs() {
    let fs = sdk_fs();
    let runner = Arc::new(
        FakeToolchain::new(&fs).producing(&["libdemo.so", "libtest_helper.so", "notes.txt"]),
    );
    let plan = plan(&["arm64-v8a"], false)
        .with_filter(ArtifactFilter::from_patterns(["test_helper"]));

    let report = service(&fs, &runner).run(&plan).unwrap();
    assert!(report.is_success());

    let arch = Arch::new("arm64-v8a").unwrap();
    let libs = plan.layout.libs_dir(&arch);
    let symbols = plan.layout.symbols_dir(&arch);
    assert_eq!(names(fs.files_in(&libs)), ["libdemo.so"]);
    assert_eq!(names(fs.files_in(&symbols)), ["libdemo.so"]);
}

#[test]
fn collect_replaces_stale_outputs() {
    let fs = sdk_fs()
        .with_file("/p/ohos/libs/arm64-v8a/libold.so", "old")
        .with_file("/p/ohos/obj/local/arm64-v8a/libold.so", "old");
    let runner = Arc::new(FakeToolchain::new(&fs));

    service(&fs, &runner).run(&plan(&["arm64-v8a"], false)).unwrap();

    assert_eq!(
        names(fs.files_in(Path::new("/p/ohos/libs/arm64-v8a"))),
        ["libdemo.so"]
    );
    assert_eq!(
        names(fs.files_in(Path::new("/p/ohos/obj/local/arm64-v8a"))),
        ["libdemo.so"]
    );
}

#[test]
fn incremental_keeps_build_directory() {
    let stale = Path::new("/p/cmake_build/ohos/CMakeCache.txt");
    let fs = sdk_fs().with_file(stale, "cache");
    let runner = Arc::new(FakeToolchain::new(&fs));

    service(&fs, &runner).run(&plan(&["arm64-v8a"], true)).unwrap();
    assert!(fs.exists(stale));
}

#[test]
fn clean_build_removes_build_directory() {
    let stale = Path::new("/p/cmake_build/ohos/CMakeCache.txt");
    let fs = sdk_fs().with_file(stale, "cache");
    let runner = Arc::new(FakeToolchain::new(&fs));

    service(&fs, &runner).run(&plan(&["arm64-v8a"], false)).unwrap();
    assert!(!fs.exists(stale));
    assert!(fs.is_dir(Path::new("/p/cmake_build/ohos")));
}

#[test]
fn missing_sdk_fails_before_any_arch() {
    let fs = MemoryFilesystem::new().with_dir(ROOT);
    let runner = Arc::new(FakeToolchain::new(&fs));

    let err = service(&fs, &runner)
        .run(&plan(&["armeabi-v7a", "arm64-v8a"], false))
        .unwrap_err();

    assert!(matches!(
        err,
        CcgoError::Application(ApplicationError::EnvironmentMissing { .. })
    ));
    assert!(runner.calls.lock().unwrap().is_empty());
}

#[test]
fn missing_cmake_fails_before_any_arch() {
    let fs = sdk_fs();
    let mut fake = FakeToolchain::new(&fs);
    fake.cmake_available = false;
    let runner = Arc::new(fake);

    let err = service(&fs, &runner).run(&plan(&["arm64-v8a"], false)).unwrap_err();
    assert!(err.to_string().contains("cmake"));
    assert!(runner.calls_for("configure").is_empty());
}

#[test]
fn commands_run_in_build_directory() {
    let fs = sdk_fs();
    let runner = Arc::new(FakeToolchain::new(&fs));

    service(&fs, &runner).run(&plan(&["arm64-v8a"], false)).unwrap();

    let configure = &runner.calls_for("configure")[0];
    assert_eq!(configure.cwd, Path::new("/p/cmake_build/ohos"));
    assert_eq!(configure.args[0], ROOT);
    assert!(configure.args.contains(&format!("-DCMAKE_TOOLCHAIN_FILE={TOOLCHAIN}")));

    let build = &runner.calls_for("build")[0];
    assert_eq!(build.args, ["--build", ".", "--config", "Release", "--", "-j8"]);

    let git = &runner.calls_for("git")[0];
    assert_eq!(git.cwd, Path::new(ROOT));
}

#[test]
fn third_party_merge_honours_policy() {
    let fs = sdk_fs()
        .with_file("/p/third_party/zlib/lib/ohos/arm64-v8a/libz.so", "z")
        .with_file("/p/third_party/zlib/lib/ohos/x86_64/libz_x86.so", "z")
        .with_file("/p/third_party/logcomm/lib/ohos/arm64-v8a/liblog.so", "l")
        .with_file("/p/third_party/netcomm/lib/ohos/arm64-v8a/libnet.so", "n")
        .with_dir("/p/third_party/headers_only/include");
    let runner = Arc::new(FakeToolchain::new(&fs));
    let plan = plan(&["arm64-v8a"], false)
        .with_policy(ThirdPartyPolicy::default().with_overrides(["netcomm"]));

    let report = service(&fs, &runner).run(&plan).unwrap();
    assert!(report.is_success());

    assert_eq!(
        names(fs.files_in(Path::new("/p/ohos/libs/arm64-v8a"))),
        ["libdemo.so", "libnet.so", "libz.so"]
    );
    assert_eq!(
        names(fs.files_in(Path::new("/p/ohos/obj/local/arm64-v8a"))),
        ["libdemo.so"],
        "third-party libraries only go to the release tree"
    );
}

#[test]
fn stl_copied_when_third_party_does_not_bundle_it() {
    let stl = "/sdk/native/llvm/lib/aarch64-linux-ohos/libc++_shared.so";
    let fs = sdk_fs()
        .with_file(stl, "stl")
        .with_dir("/p/third_party/zlib");
    let runner = Arc::new(FakeToolchain::new(&fs));

    service(&fs, &runner).run(&plan(&["arm64-v8a"], false)).unwrap();

    for dir in ["/p/ohos/libs/arm64-v8a", "/p/ohos/obj/local/arm64-v8a"] {
        assert!(fs.exists(&Path::new(dir).join("libc++_shared.so")), "{dir}");
    }
}

#[test]
fn stl_skipped_when_stdcomm_present() {
    let stl = "/sdk/native/llvm/lib/aarch64-linux-ohos/libc++_shared.so";
    let fs = sdk_fs().with_file(stl, "stl").with_dir("/p/third_party/stdcomm");
    let runner = Arc::new(FakeToolchain::new(&fs));

    service(&fs, &runner).run(&plan(&["arm64-v8a"], false)).unwrap();
    assert!(!fs.exists(Path::new("/p/ohos/libs/arm64-v8a/libc++_shared.so")));
}

#[test]
fn strip_runs_once_per_release_library() {
    let fs = sdk_fs().with_file("/p/third_party/zlib/lib/ohos/arm64-v8a/libz.so", "z");
    let runner = Arc::new(FakeToolchain::new(&fs).producing(&["liba.so", "libb.so"]));

    service(&fs, &runner).run(&plan(&["arm64-v8a"], false)).unwrap();

    let stripped: Vec<_> = runner
        .calls_for("strip")
        .into_iter()
        .map(|c| c.args[0].clone())
        .collect();
    assert_eq!(
        stripped,
        [
            "/p/ohos/libs/arm64-v8a/liba.so",
            "/p/ohos/libs/arm64-v8a/libb.so",
            "/p/ohos/libs/arm64-v8a/libz.so",
        ]
    );
}

#[test]
fn strip_failure_is_not_fatal() {
    let fs = sdk_fs();
    let runner = Arc::new(FakeToolchain::new(&fs).failing("strip"));

    let report = service(&fs, &runner)
        .run(&plan(&["armeabi-v7a", "arm64-v8a"], false))
        .unwrap();
    assert!(report.is_success());
    assert_eq!(report.succeeded.len(), 2);
}

#[test]
fn revision_header_written_once_per_content() {
    let fs = sdk_fs();
    let runner = Arc::new(FakeToolchain::new(&fs));
    let header = Path::new("/p/include/demo/verinfo.h");

    let mut written = Vec::new();
    let svc = service(&fs, &runner);
    for incremental in [false, true] {
        svc.run_with(&plan(&["arm64-v8a"], incremental), &mut |event| {
            if let BuildEvent::RevisionStamped { revision, written: w } = event {
                assert_eq!(revision, "abc1234");
                written.push(w);
            }
        })
        .unwrap();
    }

    assert_eq!(written, [true, false]);
    let content = fs.read_file(header).unwrap();
    assert!(content.contains("#define DEMO_REVISION \"abc1234\""));
    assert!(content.contains("#define DEMO_BUILD_TAG \"1\""));
}

#[test]
fn events_follow_phase_order() {
    let fs = sdk_fs();
    let runner = Arc::new(FakeToolchain::new(&fs));
    let mut seen = Vec::new();

    service(&fs, &runner)
        .run_with(&plan(&["armeabi-v7a", "arm64-v8a"], false), &mut |event| {
            seen.push(match event {
                BuildEvent::EnvironmentReady { .. } => "env".to_string(),
                BuildEvent::RevisionStamped { .. } => "revision".to_string(),
                BuildEvent::ArchStarted { arch, index, total } => {
                    format!("start {arch} {}/{total}", index + 1)
                }
                BuildEvent::ArchSucceeded(out) => format!("ok {}", out.arch),
                BuildEvent::ArchFailed { arch, .. } => format!("fail {arch}"),
            })
        })
        .unwrap();

    assert_eq!(
        seen,
        [
            "env",
            "revision",
            "start armeabi-v7a 1/2",
            "ok armeabi-v7a",
            "start arm64-v8a 2/2",
            "ok arm64-v8a",
        ]
    );
}
