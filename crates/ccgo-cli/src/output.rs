//! Output management and formatting.

use std::io::{self, IsTerminal};

use console::Term;
use owo_colors::OwoColorize;
use serde_json::json;

use ccgo_core::application::BuildEvent;
use ccgo_core::domain::BuildReport;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        // Auto → Human (TTY) or Plain (piped/redirected).
        let resolved_format = if args.output_format == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            args.output_format
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }

    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet || self.is_json() {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Command output proper (rendered text, config values). Never
    /// suppressed and written verbatim.
    pub fn emit(&self, data: &str) -> io::Result<()> {
        self.term.write_str(data)?;
        self.term.flush()
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.symbol_line("\u{2713}", msg, |s| s.green().bold().to_string(), |m| {
            m.green().to_string()
        })
    }

    /// Error indicator: `✗ <msg>`. *Not* suppressed in quiet mode.
    pub fn error(&self, msg: &str) -> io::Result<()> {
        let line = if self.no_color {
            format!("\u{2717} {msg}")
        } else {
            format!("{} {}", "\u{2717}".red().bold(), msg.red())
        };
        self.term.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.symbol_line("\u{26a0}", msg, |s| s.yellow().bold().to_string(), |m| {
            m.yellow().to_string()
        })
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.symbol_line("\u{2139}", msg, |s| s.blue().bold().to_string(), |m| {
            m.blue().to_string()
        })
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet || self.is_json() {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// Progress line for one build phase.
    pub fn build_event(&self, event: &BuildEvent<'_>) -> io::Result<()> {
        match event {
            BuildEvent::EnvironmentReady { sdk_root } => {
                self.info(&format!("SDK: {}", sdk_root.display()))
            }
            BuildEvent::RevisionStamped { revision, written } => self.info(&format!(
                "Revision {revision}{}",
                if *written { "" } else { " (header unchanged)" }
            )),
            BuildEvent::ArchStarted { arch, index, total } => {
                self.header(&format!("==== [{}/{}] Building {arch} ====", index + 1, total))
            }
            BuildEvent::ArchSucceeded(out) => self.success(&format!(
                "{} built in {:.1}s",
                out.arch,
                out.elapsed.as_secs_f64()
            )),
            BuildEvent::ArchFailed { arch, reason } => self.error(&format!("{arch}: {reason}")),
        }
    }

    /// Final summary of a build run.
    pub fn report(&self, report: &BuildReport) -> io::Result<()> {
        if self.is_json() {
            let names = |archs: Vec<&ccgo_core::domain::Arch>| -> Vec<String> {
                archs.into_iter().map(ToString::to_string).collect()
            };
            let value = json!({
                "platform": report.platform.as_str(),
                "succeeded": names(report.succeeded_archs()),
                "failed": report.failed.as_ref().map(|f| json!({
                    "arch": f.arch.as_str(),
                    "reason": f.reason,
                })),
                "not_attempted": names(report.not_attempted()),
                "libs": report.libs_root.display().to_string(),
                "symbols": report.symbols_root.display().to_string(),
            });
            return self.emit(&format!("{value:#}\n"));
        }

        self.print("")?;
        self.header(&format!("Build summary ({})", report.platform.display_name()))?;
        for out in &report.succeeded {
            self.success(&format!("{}  {}", out.arch, out.libs_dir.display()))?;
        }
        if let Some(failed) = &report.failed {
            self.error(&format!("{}  {}", failed.arch, failed.reason))?;
        }
        for arch in report.not_attempted() {
            self.warning(&format!("{arch}  not attempted"))?;
        }
        if report.is_success() {
            self.print(&format!("  libs:    {}", report.libs_root.display()))?;
            self.print(&format!("  symbols: {}", report.symbols_root.display()))?;
        }
        Ok(())
    }

    fn symbol_line(
        &self,
        symbol: &str,
        msg: &str,
        style_symbol: impl Fn(&str) -> String,
        style_msg: impl Fn(&str) -> String,
    ) -> io::Result<()> {
        if self.quiet || self.is_json() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("{symbol} {msg}")
        } else {
            format!("{} {}", style_symbol(symbol), style_msg(msg))
        };
        self.term.write_line(&line)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// `true` if ANSI colours are enabled.
    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    /// `true` if quiet mode suppresses most output.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// `true` when only machine-readable output goes to stdout.
    pub fn is_json(&self) -> bool {
        self.resolved_format == OutputFormat::Json
    }

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_manager(quiet: bool, no_color: bool, format: OutputFormat) -> OutputManager {
        let args = GlobalArgs {
            verbose: 0,
            quiet,
            no_color,
            config: None,
            output_format: format,
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    #[test]
    fn quiet_suppresses_print() {
        let out = make_manager(true, true, OutputFormat::Plain);
        assert!(out.print("hello").is_ok());
        assert!(out.is_quiet());
    }

    #[test]
    fn error_not_suppressed_in_quiet_mode() {
        let out = make_manager(true, true, OutputFormat::Plain);
        assert!(out.error("something went wrong").is_ok());
    }

    #[test]
    fn colour_only_for_human_format() {
        assert!(make_manager(false, false, OutputFormat::Human).supports_color());
        assert!(!make_manager(false, true, OutputFormat::Human).supports_color());
        assert!(!make_manager(false, false, OutputFormat::Plain).supports_color());
    }

    #[test]
    fn format_accessor_returns_resolved() {
        let out = make_manager(false, false, OutputFormat::Json);
        assert_eq!(out.format(), OutputFormat::Json);
        assert!(out.is_json());
    }
}
