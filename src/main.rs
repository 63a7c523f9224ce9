use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use resub::Invocation;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// <SOURCE_DIR> <GLOB_PATTERN> <FROM> <TO>
    #[arg(
        value_name = "ARGS",
        num_args = 0..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    args: Vec<String>,
}

fn main() -> Result<()> {
    resub::logging::init_logging();

    let cli = Cli::parse();

    // Argument count is checked here rather than by clap so a wrong count
    // reports InvalidArgs
    let invocation = Invocation::from_args(cli.args)?;

    let summary = resub::run(&invocation).with_context(|| {
        format!(
            "Failed to replace text under {}",
            invocation.source_dir.display()
        )
    })?;

    info!(
        "Done: {} files rewritten, {} replacements",
        summary.rewritten, summary.replacements
    );

    Ok(())
}
