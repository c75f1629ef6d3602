use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use emberscope_core::explorer::Explorer;

use super::Outcome;

#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Project directory (default: current directory)
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Splice referenced components into import and export entries
    #[arg(long)]
    pub collapse: bool,
}

pub async fn run(args: GraphArgs, quiet: bool) -> anyhow::Result<Outcome> {
    let dir = super::resolve_dir(&args.dir)?;
    let mut config = super::load_config(&dir)?;
    config.graph.collapse_references |= args.collapse;

    let explorer = Explorer::scan(&dir, config, &super::reporter(quiet))
        .await
        .context("Failed to scan project")?;
    super::print_json(&serde_json::to_value(explorer.graph())?)?;
    Ok(Outcome::from_failures(explorer.errors().len()))
}
