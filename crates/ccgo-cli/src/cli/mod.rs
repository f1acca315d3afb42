//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums. No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use ccgo_core::domain::{Arch, BuildMode, Platform};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "ccgo",
    bin_name = "ccgo",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Native library builds and project scaffolding",
    long_about = "ccgo builds C/C++ libraries for OpenHarmony and Android through \
                  CMake and the platform SDK, and generates projects from \
                  Handlebars template directories.",
    after_help = "EXAMPLES:\n\
        \x20 ccgo build 1                       # clean build, every architecture\n\
        \x20 ccgo build incremental arm64-v8a   # one architecture, keep build dir\n\
        \x20 ccgo new my-lib --template ./templates/cpp-lib\n\
        \x20 ccgo completions bash > /usr/share/bash-completion/completions/ccgo",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build native libraries for one platform.
    #[command(
        visible_alias = "b",
        about = "Build native libraries",
        after_help = "MODES:\n\
            \x20 1, clean        remove the build directory, then build\n\
            \x20 2, incremental  keep the build directory\n\
            \x20 3, test         incremental with a time-stamped log tag suffix\n\
            \x20 4, exit         do nothing\n\
            \n\
            Without a mode an interactive menu is shown and only the first\n\
            architecture of the platform is built.\n\
            \n\
            EXAMPLES:\n\
            \x20 ccgo build 1\n\
            \x20 ccgo build 2 armeabi-v7a arm64-v8a --platform android\n\
            \x20 ccgo build clean --sdk-root ~/ohos-sdk --option \"-DFOO=1\""
    )]
    Build(BuildArgs),

    /// Create a new project from a template directory.
    #[command(
        visible_alias = "n",
        about = "Create a new project",
        after_help = "EXAMPLES:\n\
            \x20 ccgo new my-lib --template ./templates/cpp-lib\n\
            \x20 ccgo new ../libs/net --template ./tpl --var namespace=net --yes\n\
            \x20 ccgo new my-lib --template ./tpl --dry-run"
    )]
    New(NewArgs),

    /// Render one template file or standard input.
    #[command(
        about = "Render a single template",
        after_help = "EXAMPLES:\n\
            \x20 ccgo render LICENSE.hbs --var project_name=demo\n\
            \x20 echo '{{pascal_case name}}' | ccgo render - --var name=my-lib"
    )]
    Render(RenderArgs),

    /// Initialise a ccgo configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 ccgo init           # user config location\n\
            \x20 ccgo init --local   # .ccgo.toml in the current directory"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 ccgo completions bash > ~/.local/share/bash-completion/completions/ccgo\n\
            \x20 ccgo completions zsh  > ~/.zfunc/_ccgo\n\
            \x20 ccgo completions fish > ~/.config/fish/completions/ccgo.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the ccgo configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 ccgo config get build.sdk_root\n\
            \x20 ccgo config list\n\
            \x20 ccgo config path"
    )]
    Config(ConfigCommands),
}

// ── build ─────────────────────────────────────────────────────────────────────

/// Arguments for `ccgo build`.
#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Build mode; omitted means the interactive menu.
    #[arg(value_name = "MODE", help = "1|clean, 2|incremental, 3|test, 4|exit")]
    pub mode: Option<BuildMode>,

    /// Architectures in build order; empty means every supported one.
    #[arg(value_name = "ARCH", help = "Architectures to build (default: all)")]
    pub archs: Vec<Arch>,

    /// Target platform.
    #[arg(
        short = 'p',
        long = "platform",
        value_name = "PLATFORM",
        default_value = "ohos",
        help = "Target platform (ohos, android)"
    )]
    pub platform: Platform,

    /// Project root; defaults to the current directory.
    #[arg(
        short = 'C',
        long = "project-dir",
        value_name = "DIR",
        help = "Project root (default: current directory)"
    )]
    pub project_dir: Option<PathBuf>,

    /// SDK root, overriding config and environment.
    #[arg(long = "sdk-root", value_name = "DIR", help = "SDK/NDK root directory")]
    pub sdk_root: Option<PathBuf>,

    /// Extra options appended to the CMake configure step.
    #[arg(
        long = "option",
        value_name = "OPTIONS",
        allow_hyphen_values = true,
        help = "Extra CMake configure options"
    )]
    pub option: Option<String>,

    /// Parallel jobs for the native build tool.
    #[arg(short = 'j', long = "jobs", value_name = "N", help = "Parallel build jobs")]
    pub jobs: Option<u16>,
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `ccgo new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Project name or path. A plain name creates `./name`; a path like
    /// `../foo` places the project one level up.
    #[arg(value_name = "DEST", help = "Project name or path")]
    pub dest: String,

    /// Template directory.
    #[arg(
        short = 't',
        long = "template",
        value_name = "DIR",
        help = "Template directory"
    )]
    pub template: PathBuf,

    /// Template variables; repeatable.
    #[arg(
        long = "var",
        value_name = "KEY=VALUE",
        value_parser = parse_var,
        help = "Set a template variable (repeatable)"
    )]
    pub vars: Vec<(String, String)>,

    /// Skip the confirmation prompt.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Skip confirmation and create immediately"
    )]
    pub yes: bool,

    /// Overwrite an existing directory (destructive).
    #[arg(long = "force", help = "Overwrite existing directory")]
    pub force: bool,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

// ── render ────────────────────────────────────────────────────────────────────

/// Arguments for `ccgo render`.
#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Template file, or `-` for standard input.
    #[arg(value_name = "FILE", default_value = "-", help = "Template file or '-'")]
    pub input: String,

    /// Template variables; repeatable.
    #[arg(
        long = "var",
        value_name = "KEY=VALUE",
        value_parser = parse_var,
        help = "Set a template variable (repeatable)"
    )]
    pub vars: Vec<(String, String)>,

    /// Write here instead of standard output.
    #[arg(short = 'o', long = "output", value_name = "FILE", help = "Output file")]
    pub output: Option<PathBuf>,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `ccgo init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.ccgo.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `ccgo completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `ccgo config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `build.sdk_root`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the user configuration file.
    Path,
}

// ── value parsers ─────────────────────────────────────────────────────────────

/// Parse `KEY=VALUE`. The value may be empty or contain further `=`.
pub fn parse_var(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty variable name in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

// ── tests ─────────────────────────────────────────────────────────────────────
