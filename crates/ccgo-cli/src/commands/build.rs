//! Implementation of the `ccgo build` command.
//!
//! Responsibility: resolve mode, architectures, SDK root and layout into one
//! explicit [`BuildPlan`], run it, and print the report.

use std::ffi::OsString;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveTime};
use tracing::{debug, info, instrument, warn};

use ccgo_adapters::{LocalFilesystem, SystemCommandRunner};
use ccgo_core::{
    application::{BuildPlan, BuildService},
    domain::{
        Arch, ArtifactFilter, BuildConfig, BuildMode, Platform, ProjectLayout, ThirdPartyPolicy,
    },
};

use crate::{
    cli::{BuildArgs, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Execute the `ccgo build` command.
///
/// 1. Resolve the project root and name
/// 2. Take the mode from the arguments, or ask for it (menu builds only the
///    platform's first architecture)
/// 3. Resolve the SDK root and assemble the plan
/// 4. Run, streaming phase events, then print the summary
#[instrument(skip_all, fields(platform = %args.platform))]
pub fn execute(
    args: BuildArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let root = resolve_project_root(args.project_dir.as_deref())?;
    let project = project_name(&config, &root);

    let (mode, archs) = match args.mode {
        Some(mode) => (mode, args.archs.clone()),
        None => {
            let mode = select_mode(&project, &global, &output)?;
            (mode, args.platform.primary_arch().into_iter().collect())
        }
    };

    if mode == BuildMode::Exit {
        output.info("Exit.")?;
        return Ok(());
    }

    let plan = build_plan(
        &args,
        mode,
        archs,
        &root,
        &config,
        |var| std::env::var_os(var),
        Local::now().time(),
    );
    debug!(?plan, "Build plan resolved");

    output.header(&format!(
        "Building {project} for {} ({mode})",
        plan.platform.display_name()
    ))?;
    info!(
        project = %project,
        %mode,
        archs = plan.archs.len(),
        sdk_root = %plan.config.sdk_root.display(),
        "Build started"
    );

    let service = BuildService::new(
        Arc::new(LocalFilesystem::new()),
        Arc::new(SystemCommandRunner::new()),
    );

    let mut print_error: Option<io::Error> = None;
    let report = service.run_with(&plan, &mut |event| {
        if let Err(e) = output.build_event(&event) {
            print_error.get_or_insert(e);
        }
    })?;
    if let Some(e) = print_error {
        return Err(e.into());
    }

    output.report(&report)?;
    report.into_result()?;
    Ok(())
}

// ── Plan assembly ─────────────────────────────────────────────────────────────

fn resolve_project_root(dir: Option<&Path>) -> CliResult<PathBuf> {
    let cwd = std::env::current_dir().with_cli_context(|| "reading current directory")?;
    Ok(match dir {
        Some(dir) => cwd.join(dir),
        None => cwd,
    })
}

/// Configured name, else the project directory name.
fn project_name(config: &AppConfig, root: &Path) -> String {
    config
        .project
        .name
        .clone()
        .filter(|name| !name.trim().is_empty())
        .or_else(|| {
            root.file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "project".into())
}

/// `--sdk-root`, then the config value, then the platform's environment
/// variables in order. Empty when nothing is set; the environment check
/// reports that.
pub fn resolve_sdk_root(
    cli: Option<&Path>,
    configured: Option<&Path>,
    platform: Platform,
    env: impl Fn(&str) -> Option<OsString>,
) -> PathBuf {
    if let Some(path) = cli.or(configured) {
        return path.to_path_buf();
    }
    platform
        .sdk_env_vars()
        .iter()
        .find_map(|var| {
            env(var).filter(|v| !v.is_empty()).map(|v| {
                debug!(%var, "SDK root from environment");
                PathBuf::from(v)
            })
        })
        .unwrap_or_default()
}

/// Mode option and user option joined; empty when both are absent.
fn combine_options(mode_option: Option<String>, user_option: Option<&str>) -> String {
    [mode_option.as_deref(), user_option]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn build_plan(
    args: &BuildArgs,
    mode: BuildMode,
    archs: Vec<Arch>,
    root: &Path,
    config: &AppConfig,
    env: impl Fn(&str) -> Option<OsString>,
    now: NaiveTime,
) -> BuildPlan {
    let settings = &config.build;
    let platform = args.platform;
    let project = project_name(config, root);

    let sdk_root = resolve_sdk_root(
        args.sdk_root.as_deref(),
        settings.sdk_root.as_deref(),
        platform,
        env,
    );

    let mut build_config = BuildConfig::new(sdk_root)
        .with_min_platform_version(&settings.min_sdk_version)
        .with_stl(&settings.stl)
        .with_jobs(args.jobs.unwrap_or(settings.jobs))
        .with_incremental(mode.is_incremental())
        .with_target_option(combine_options(
            mode.target_option(now),
            args.option.as_deref(),
        ));
    if let Some(generator) = &settings.generator {
        build_config = build_config.with_generator(generator);
    }

    let mut layout = ProjectLayout::conventional(root, platform, &project);
    if let Some(dir) = &settings.build_dir {
        layout = layout.with_build_out(dir);
    }
    if let Some(dir) = &settings.symbols_dir {
        layout = layout.with_symbols_root(dir);
    }
    if let Some(dir) = &settings.libs_dir {
        layout = layout.with_libs_root(dir);
    }
    if let Some(dir) = &settings.third_party_dir {
        layout = layout.with_third_party(dir);
    }
    if let Some(file) = &settings.revision_file {
        layout = layout.with_revision_file(file);
    }

    BuildPlan::new(platform, build_config, layout, archs)
        .with_filter(ArtifactFilter::from_patterns(settings.exclude_libs.clone()))
        .with_policy(ThirdPartyPolicy::default().with_overrides(settings.merge_third_party.clone()))
        .with_project(project, config.project.version.clone())
        .with_tag(mode.menu_number().to_string())
}

// ── Menu ──────────────────────────────────────────────────────────────────────

fn select_mode(project: &str, global: &GlobalArgs, output: &OutputManager) -> CliResult<BuildMode> {
    #[cfg(feature = "interactive")]
    {
        use std::io::IsTerminal as _;
        if io::stdin().is_terminal() && !global.quiet {
            return select_mode_interactive(project);
        }
    }
    #[cfg(not(feature = "interactive"))]
    let _ = global;

    read_menu_choice(io::stdin().lock(), project, output)
}

#[cfg(feature = "interactive")]
fn select_mode_interactive(project: &str) -> CliResult<BuildMode> {
    let items: Vec<String> = BuildMode::ALL
        .iter()
        .map(|mode| format!("{}. {}", mode.menu_number(), mode.describe(project)))
        .collect();

    let index = dialoguer::Select::new()
        .with_prompt("Select a build mode")
        .items(&items)
        .default(0)
        .interact()
        .map_err(|e| CliError::InvalidInput {
            message: format!("menu selection failed: {e}"),
            source: Some(Box::new(e)),
        })?;

    BuildMode::ALL
        .get(index)
        .copied()
        .ok_or_else(|| CliError::InvalidInput {
            message: format!("menu index {index} out of range"),
            source: None,
        })
}

/// Plain menu on the output, one line read from `input`. Anything that is not
/// a menu entry, empty input included, means exit.
fn read_menu_choice(
    mut input: impl BufRead,
    project: &str,
    output: &OutputManager,
) -> CliResult<BuildMode> {
    output.header("Select a build mode")?;
    for mode in BuildMode::ALL {
        output.print(&format!("  {}. {}", mode.menu_number(), mode.describe(project)))?;
    }
    output.print("Enter menu:")?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .with_cli_context(|| "failed to read menu choice")?;
    match line.parse::<BuildMode>() {
        Ok(mode) => Ok(mode),
        Err(e) => {
            warn!(choice = line.trim(), error = %e, "Unrecognised menu choice, exiting");
            Ok(BuildMode::Exit)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
