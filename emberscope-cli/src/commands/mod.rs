pub mod component;
pub mod file;
pub mod files;
pub mod graph;
pub mod meta;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Subcommand;
use serde_json::Value;

use emberscope_core::config::ExplorerConfig;
use emberscope_core::progress::IndicatifReporter;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a single script or template file
    File(file::FileArgs),
    /// List candidate files below a directory, optionally analyzing them
    Files(files::FilesArgs),
    /// Show the aggregated information of one component
    Component(component::ComponentArgs),
    /// Print the component graph of a project
    Graph(graph::GraphArgs),
    /// Build component information from an already merged fact sheet
    Meta(meta::MetaArgs),
}

/// How a successful command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Complete,
    /// Some files of a batch could not be analyzed.
    Partial,
}

impl Outcome {
    fn from_failures(count: usize) -> Self {
        if count == 0 { Self::Complete } else { Self::Partial }
    }
}

pub async fn run(cmd: Command, quiet: bool) -> anyhow::Result<Outcome> {
    match cmd {
        Command::File(args) => file::run(&args),
        Command::Files(args) => files::run(args, quiet).await,
        Command::Component(args) => component::run(args, quiet).await,
        Command::Graph(args) => graph::run(args, quiet).await,
        Command::Meta(args) => meta::run(&args),
    }
}

fn resolve_dir(path: &Path) -> anyhow::Result<PathBuf> {
    std::fs::canonicalize(path)
        .with_context(|| format!("Cannot resolve path: {}", path.display()))
}

fn load_config(root: &Path) -> anyhow::Result<ExplorerConfig> {
    ExplorerConfig::load(root)
        .with_context(|| format!("Cannot load config from {}", root.display()))
}

fn reporter(quiet: bool) -> IndicatifReporter {
    if quiet {
        IndicatifReporter::hidden()
    } else {
        IndicatifReporter::new()
    }
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{text}");
    Ok(())
}
