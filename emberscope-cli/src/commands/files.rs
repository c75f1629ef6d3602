use std::path::PathBuf;

use clap::Args;
use serde_json::json;

use emberscope_core::discovery::discover_files;
use emberscope_core::file_info::get_files_information;

use super::Outcome;

#[derive(Args, Debug)]
pub struct FilesArgs {
    /// Project directory (default: current directory)
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Analyze every discovered file instead of only listing it
    #[arg(long)]
    pub analyze: bool,
}

pub async fn run(args: FilesArgs, quiet: bool) -> anyhow::Result<Outcome> {
    let dir = super::resolve_dir(&args.dir)?;
    let config = super::load_config(&dir)?;
    let listing = discover_files(&dir, &config.discovery)?;

    if !args.analyze {
        super::print_json(&json!({ "type": "path", "data": listing.files }))?;
        return Ok(Outcome::Complete);
    }

    let reporter = super::reporter(quiet);
    let report = get_files_information(&listing.files, &config.resolver(), &reporter).await;
    let errors: Vec<_> = report
        .errors
        .iter()
        .map(|(path, e)| json!({ "path": path, "error": e.to_string() }))
        .collect();
    super::print_json(&json!({
        "type": "results",
        "data": report.files,
        "errors": errors,
    }))?;
    Ok(Outcome::from_failures(report.errors.len()))
}
