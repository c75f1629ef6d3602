//! Per-file analysis: read a file, dispatch on its suffix, wrap the result.

use std::time::{Duration, Instant};

use emberscope_syntax::resolve::serialize_path;
use emberscope_syntax::{FileMeta, PathResolver, script, template};
use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use crate::error::{ExplorerError, Result};
use crate::progress::ProgressReporter;

/// Fact sheet of one file together with the path it was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInformation {
    pub relative_path: String,
    #[serde(flatten)]
    pub meta: FileMeta,
}

/// An import annotated for display relative to a project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedImport {
    pub name: String,
    pub relative_name: String,
    /// The import resolved to a script or markup file on disk.
    pub is_linkable: bool,
}

impl FileInformation {
    pub fn resolved_imports(&self, root: &str, resolver: &PathResolver) -> Vec<ResolvedImport> {
        let prefix = format!("{}/", root.trim_end_matches('/'));
        self.meta
            .imports()
            .iter()
            .map(|name| ResolvedImport {
                name: name.clone(),
                relative_name: name.replacen(&prefix, "", 1),
                is_linkable: resolver.is_concrete(name),
            })
            .collect()
    }
}

/// Read and analyze one file. Files with the script extension go through
/// the source analyzer, everything else through the markup analyzer.
pub fn get_file_information(path: &str, resolver: &PathResolver) -> Result<FileInformation> {
    let source = std::fs::read_to_string(path).map_err(|source| ExplorerError::Read {
        path: path.to_string(),
        source,
    })?;
    let relative_path = serialize_path(std::path::Path::new(path));
    let is_script = relative_path
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ext == resolver.script_extension());

    let meta = if is_script {
        FileMeta::Script(script::analyze_module_with(&source, &relative_path, resolver)?)
    } else {
        FileMeta::Template(template::analyze_template(&source)?)
    };
    debug!(path = %relative_path, kind = meta.kind(), "File analyzed");
    Ok(FileInformation {
        relative_path,
        meta,
    })
}

/// Outcome of a batch analysis.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Successfully analyzed files, in request order.
    pub files: Vec<FileInformation>,
    /// Files that could not be read or parsed, in request order.
    pub errors: Vec<(String, ExplorerError)>,
    pub duration: Duration,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Analyze many files concurrently.
///
/// Each file runs as its own blocking task; completions arrive in any
/// order and are put back into request order before returning. A failing
/// file is recorded in [`BatchReport::errors`] and never aborts its siblings.
#[instrument(skip_all, name = "files_information", fields(count = paths.len()))]
pub async fn get_files_information(
    paths: &[String],
    resolver: &PathResolver,
    reporter: &dyn ProgressReporter,
) -> BatchReport {
    let start = Instant::now();
    reporter.batch_started(paths.len());

    let mut tasks = JoinSet::new();
    for (index, path) in paths.iter().enumerate() {
        let path = path.clone();
        let resolver = resolver.clone();
        tasks.spawn_blocking(move || (index, get_file_information(&path, &resolver)));
    }

    let mut outcomes: Vec<Option<Result<FileInformation>>> =
        std::iter::repeat_with(|| None).take(paths.len()).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, outcome)) => {
                reporter.file_finished(&paths[index], outcome.is_ok());
                outcomes[index] = Some(outcome);
            }
            Err(e) => warn!(error = %e, "Analysis task did not complete"),
        }
    }

    let mut report = BatchReport::default();
    for (path, outcome) in paths.iter().zip(outcomes) {
        match outcome {
            Some(Ok(info)) => report.files.push(info),
            Some(Err(e)) => {
                warn!(path = %path, error = %e, "Failed to analyze file");
                report.errors.push((path.clone(), e));
            }
            None => report.errors.push((
                path.clone(),
                ExplorerError::Task(format!("analysis of {path} was cancelled")),
            )),
        }
    }

    report.duration = start.elapsed();
    reporter.batch_finished(report.errors.len());
    info!(
        files = report.files.len(),
        errors = report.errors.len(),
        duration = ?report.duration,
        "Batch analysis complete"
    );
    report
}
