//! Implementation of the `ccgo new` command.
//!
//! Responsibility: load the template directory, assemble the variables,
//! call the core scaffold service, and display results.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument};

use ccgo_adapters::{
    DirectoryTemplateLoader, HandlebarsRenderer, LocalFilesystem, SystemCommandRunner,
    git_identity_resolver, git_user_name,
};
use ccgo_core::{
    application::{ScaffoldOptions, ScaffoldService, ports::CommandRunner},
    domain::{RenderContext, Template},
};

use crate::{
    cli::{GlobalArgs, NewArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Variable every template receives, derived from the destination.
const PROJECT_NAME_VAR: &str = "project_name";

/// Execute the `ccgo new` command.
///
/// 1. Parse and validate the destination
/// 2. Load the template and build the render context
/// 3. Early-exit if `--dry-run`
/// 4. Confirm with user unless `--yes` or `--quiet`
/// 5. Scaffold and print next steps
#[instrument(skip_all, fields(dest = %args.dest))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    _config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    // 1. Resolve project path
    let (project_name, project_path) = resolve_project_path(&args.dest)?;
    validate_project_name(&project_name)?;

    // 2. Template + variables
    let template = DirectoryTemplateLoader::new(&args.template).load()?;
    let context = build_context(&project_name, &args.vars);
    debug!(
        template = %template.name,
        nodes = template.nodes.len(),
        variables = context.len(),
        "Template loaded"
    );

    let service = scaffold_service()?;

    // 3. Dry run: render but do not write.
    if args.dry_run {
        let structure = service.render(&template, context, &project_path)?;
        output.info(&format!(
            "Dry run: would create '{}' at {}",
            project_name,
            project_path.display(),
        ))?;
        for entry in structure.entries() {
            output.print(&format!("  {}", entry.path().display()))?;
        }
        return Ok(());
    }

    if project_path.exists() && !args.force {
        return Err(CliError::ProjectExists { path: project_path });
    }

    // 4. Show configuration and confirm
    if !global.quiet && !args.yes {
        show_configuration(&template, &project_name, &project_path, &output)?;
        if !confirm(io::stdin().lock())? {
            return Err(CliError::Cancelled);
        }
    }

    // 5. Scaffold
    output.header(&format!("Creating '{project_name}'..."))?;
    info!(project = %project_name, path = %project_path.display(), "Scaffold started");

    let structure = service.scaffold(
        &template,
        context,
        &project_path,
        ScaffoldOptions { force: args.force },
    )?;

    output.success(&format!(
        "Project '{project_name}' created ({} files)",
        structure.files().count()
    ))?;

    if !global.quiet {
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  cd {}", project_path.display()))?;
        output.print("  ccgo build 1")?;
    }

    Ok(())
}

/// Scaffold service over the local disk, identity from git in the current
/// directory.
pub fn scaffold_service() -> CliResult<ScaffoldService> {
    let cwd = std::env::current_dir().with_cli_context(|| "reading current directory")?;
    let runner: Arc<dyn CommandRunner> = Arc::new(SystemCommandRunner::new());
    let renderer = HandlebarsRenderer::new(git_identity_resolver(cwd, runner));
    Ok(ScaffoldService::new(
        Box::new(renderer),
        Box::new(LocalFilesystem::new()),
    ))
}

/// `project_name` from the destination, then `--var` pairs in order.
pub fn build_context(project_name: &str, vars: &[(String, String)]) -> RenderContext {
    let mut context = RenderContext::new().with_variable(PROJECT_NAME_VAR, project_name);
    for (key, value) in vars {
        context.insert(key.as_str(), value.as_str());
    }
    context
}

/// `--var` pairs only; later pairs win.
pub fn build_context_from_vars(vars: &[(String, String)]) -> RenderContext {
    vars.iter().cloned().collect()
}

// ── Path resolution ───────────────────────────────────────────────────────────

/// Split a destination into the project name (last component) and the full
/// project directory.
pub fn resolve_project_path(dest: &str) -> CliResult<(String, PathBuf)> {
    let path = Path::new(dest);

    let project_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CliError::InvalidProjectName {
            name: dest.into(),
            reason: "cannot extract valid project name".into(),
        })?
        .to_string();

    Ok((project_name, path.to_path_buf()))
}

fn validate_project_name(name: &str) -> CliResult<()> {
    if name.is_empty() {
        return Err(CliError::InvalidProjectName {
            name: name.into(),
            reason: "name cannot be empty".into(),
        });
    }
    if name.starts_with('.') {
        return Err(CliError::InvalidProjectName {
            name: name.into(),
            reason: "name cannot start with '.'".into(),
        });
    }
    if name.contains('/') || name.contains('\\') {
        return Err(CliError::InvalidProjectName {
            name: name.into(),
            reason: "name cannot contain path separators".into(),
        });
    }
    Ok(())
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn show_configuration(
    template: &Template,
    name: &str,
    path: &Path,
    out: &OutputManager,
) -> CliResult<()> {
    out.header("Configuration")?;
    out.print(&format!("  Project:  {name}"))?;
    out.print(&format!("  Template: {}", template.name))?;
    out.print(&format!("  Files:    {}", template.file_count()))?;
    out.print(&format!("  Location: {}", path.display()))?;
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let author = git_user_name(cwd, Arc::new(SystemCommandRunner::new()), "unknown");
    out.print(&format!("  Author:   {author}"))?;
    out.print("")?;
    Ok(())
}

/// Empty input (including end of input) means yes.
fn confirm(mut input: impl io::BufRead) -> CliResult<bool> {
    print!("Continue? [Y/n] ");
    io::stdout()
        .flush()
        .with_cli_context(|| "failed to flush stdout")?;

    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .with_cli_context(|| "failed to read confirmation input")?;

    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer.is_empty() || answer == "y" || answer == "yes")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    // ── resolve_project_path ──────────────────────────────────────────────

    #[test]
    fn simple_name_resolves_to_relative_dir() {
        let (name, dir) = resolve_project_path("my-lib").unwrap();
        assert_eq!(name, "my-lib");
        assert_eq!(dir, PathBuf::from("my-lib"));
    }

    #[test]
    fn nested_path_keeps_full_directory() {
        let (name, dir) = resolve_project_path("../libs/netcomm").unwrap();
        assert_eq!(name, "netcomm");
        assert_eq!(dir, PathBuf::from("../libs/netcomm"));
    }

    #[test]
    fn parent_only_has_no_name() {
        assert!(matches!(
            resolve_project_path(".."),
            Err(CliError::InvalidProjectName { .. })
        ));
    }

    // ── validate_project_name ─────────────────────────────────────────────

    #[test]
    fn dotfile_name_is_invalid() {
        assert!(matches!(
            validate_project_name(".hidden"),
            Err(CliError::InvalidProjectName { .. })
        ));
        assert!(validate_project_name("").is_err());
    }

    #[test]
    fn valid_names_pass() {
        for name in &["my-lib", "net_comm", "demo123", "CcgoDemo"] {
            assert!(validate_project_name(name).is_ok(), "failed for: {name}");
        }
    }

    // ── build_context ─────────────────────────────────────────────────────

    #[test]
    fn vars_override_project_name() {
        let vars = vec![
            ("namespace".to_string(), "net".to_string()),
            (PROJECT_NAME_VAR.to_string(), "renamed".to_string()),
        ];
        let ctx = build_context("netcomm", &vars);
        assert_eq!(ctx.get("namespace").and_then(|v| v.as_str()), Some("net"));
        assert_eq!(ctx.get(PROJECT_NAME_VAR).and_then(|v| v.as_str()), Some("renamed"));
    }

    #[test]
    fn later_vars_win() {
        let vars = vec![
            ("name".to_string(), "a".to_string()),
            ("name".to_string(), "b".to_string()),
        ];
        let ctx = build_context_from_vars(&vars);
        assert_eq!(ctx.len(), 1);
        assert_eq!(ctx.get("name").and_then(|v| v.as_str()), Some("b"));
    }

    // ── confirm ───────────────────────────────────────────────────────────

    #[test]
    fn confirm_defaults_to_yes() {
        assert!(confirm(Cursor::new("\n")).unwrap());
        assert!(confirm(Cursor::new("")).unwrap());
        assert!(confirm(Cursor::new("Yes\n")).unwrap());
        assert!(!confirm(Cursor::new("n\n")).unwrap());
    }
}
