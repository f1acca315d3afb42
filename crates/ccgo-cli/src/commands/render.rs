//! `ccgo render` renders one template string with the full helper set.

use std::fs;
use std::io::Read;

use tracing::{debug, instrument};

use crate::{
    cli::RenderArgs,
    commands::new::{build_context_from_vars, scaffold_service},
    error::{CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all, fields(input = %args.input))]
pub fn execute(args: RenderArgs, output: OutputManager) -> CliResult<()> {
    let source = read_source(&args.input)?;
    let context = build_context_from_vars(&args.vars);
    debug!(bytes = source.len(), variables = context.len(), "Rendering");

    let rendered = scaffold_service()?.render_str(&source, &context)?;

    match &args.output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_cli_context(|| format!("failed to write '{}'", path.display()))?;
            output.success(&format!("Rendered to {}", path.display()))?;
        }
        None => output.emit(&rendered)?,
    }
    Ok(())
}

fn read_source(input: &str) -> CliResult<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .with_cli_context(|| "failed to read standard input")?;
        return Ok(buf);
    }
    fs::read_to_string(input).with_cli_context(|| format!("failed to read '{input}'"))
}
