//! Flags shared by `build`, `new`, `render` and the rest.

use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Log level: warn by default, `-v` info, `-vv` debug, `-vvv` trace.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "More log output (-v, -vv, -vvv)",
        long_help = "Log level for ccgo and its build steps:
    (none)  warnings and errors
    -v      each CMake and strip command before it runs
    -vv     skipped artifacts, config layering, template entries
    -vvv    everything"
    )]
    pub verbose: u8,

    /// Errors only. Rendered text and `config get` values still print.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Print errors and command results only"
    )]
    pub quiet: bool,

    /// Plain text on stdout and stderr. Also set by `NO_COLOR`.
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        help = "No ANSI colours"
    )]
    pub no_color: bool,

    /// Replaces the user config and `.ccgo.toml`; must exist.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        help = "Read settings from FILE only"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "human, plain or json (build reports, config list)"
    )]
    pub output_format: OutputFormat,
}

/// Rendering of messages and build reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// `human` on a terminal, `plain` when piped.
    #[default]
    Auto,
    Human,
    /// No colours or symbols styling.
    Plain,
    /// Build report and config as JSON; log lines as JSON on stderr.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn flags_work_after_the_subcommand() {
        let cli = Cli::try_parse_from(["ccgo", "config", "list", "-vv", "--output-format", "json"])
            .unwrap();
        assert_eq!(cli.global.verbose, 2);
        assert_eq!(cli.global.output_format, OutputFormat::Json);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["ccgo", "-q", "-v", "config", "path"]).is_err());
    }

    #[test]
    fn output_format_defaults_to_auto() {
        let cli = Cli::try_parse_from(["ccgo", "-c", "ci.toml", "config", "path"]).unwrap();
        assert_eq!(cli.global.output_format, OutputFormat::Auto);
        assert_eq!(cli.global.config, Some(PathBuf::from("ci.toml")));
    }
}
