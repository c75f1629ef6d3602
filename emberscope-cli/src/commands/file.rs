use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use emberscope_core::file_info::get_file_information;
use emberscope_syntax::FileMeta;
use emberscope_syntax::resolve::serialize_path;

use super::Outcome;

#[derive(Args, Debug)]
pub struct FileArgs {
    /// Script (.js) or template (.hbs) file to analyze
    pub path: PathBuf,

    /// Project root for config lookup and relative import names
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}

pub fn run(args: &FileArgs) -> anyhow::Result<Outcome> {
    let root = super::resolve_dir(&args.root)?;
    let config = super::load_config(&root)?;
    let resolver = config.resolver();

    let info = get_file_information(&args.path.to_string_lossy(), &resolver)
        .with_context(|| format!("Failed to analyze {}", args.path.display()))?;

    let root_name = serialize_path(&root);
    let mut output = serde_json::to_value(&info)?;
    if matches!(info.meta, FileMeta::Script(_)) {
        output["resolvedImports"] =
            serde_json::to_value(info.resolved_imports(&root_name, &resolver))?;
    }
    output["root"] = root_name.into();
    super::print_json(&output)?;
    Ok(Outcome::Complete)
}
