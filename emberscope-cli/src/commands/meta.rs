use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use emberscope_core::aggregate::{MergedMeta, extract_component_information};
use emberscope_core::config::CrossReferencePolicy;

use super::Outcome;

#[derive(Args, Debug)]
pub struct MetaArgs {
    /// JSON file holding a merged fact sheet, or `-` for stdin
    pub input: PathBuf,

    /// Project root whose `emberscope.toml` supplies the cross-reference policy
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Mark template references without a declaration as template-only,
    /// whatever the config says
    #[arg(long)]
    pub annotate: bool,
}

pub fn run(args: &MetaArgs) -> anyhow::Result<Outcome> {
    let root = super::resolve_dir(&args.root)?;
    let config = super::load_config(&root)?;

    let text = if args.input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        text
    } else {
        std::fs::read_to_string(&args.input)
            .with_context(|| format!("Cannot resolve path: {}", args.input.display()))?
    };

    let meta = MergedMeta::from_json(&text).context("Invalid merged fact sheet")?;
    let policy = if args.annotate {
        CrossReferencePolicy::Annotate
    } else {
        config.aggregate.cross_reference
    };
    let info = extract_component_information(&meta, policy);
    super::print_json(&serde_json::to_value(&info)?)?;
    Ok(Outcome::Complete)
}
