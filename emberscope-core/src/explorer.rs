use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use emberscope_syntax::UNKNOWN;
use emberscope_syntax::resolve::serialize_path;
use tracing::{info, instrument};

use crate::aggregate::{self, ComponentInformation};
use crate::config::ExplorerConfig;
use crate::discovery::discover_files;
use crate::error::{ExplorerError, Result};
use crate::file_info::get_files_information;
use crate::graph::{self, ComponentFile, ComponentFiles, GraphNode};
use crate::naming::extract_component_name;
use crate::progress::ProgressReporter;

/// A scanned project: every component found below a root directory with
/// the fact sheets of its files.
#[derive(Debug)]
pub struct Explorer {
    root: PathBuf,
    config: ExplorerConfig,
    found: bool,
    components: Vec<ComponentFiles>,
    errors: Vec<(String, ExplorerError)>,
}

impl Explorer {
    /// Discover, group and analyze the component files below `root`.
    ///
    /// Files outside every component convention are dropped. Files that fail
    /// to read or parse stay in their component without a fact sheet and are
    /// listed in [`Explorer::errors`].
    #[instrument(skip_all, name = "scan", fields(root = %root.display()))]
    pub async fn scan(
        root: &Path,
        config: ExplorerConfig,
        reporter: &dyn ProgressReporter,
    ) -> Result<Self> {
        let start = Instant::now();
        let listing = discover_files(root, &config.discovery)?;
        let root_name = serialize_path(root);

        let mut components: Vec<ComponentFiles> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut paths = Vec::new();
        for path in listing.files {
            let name = extract_component_name(&path, &root_name);
            if name == UNKNOWN || name.is_empty() {
                continue;
            }
            let slot = *index.entry(name.clone()).or_insert_with(|| {
                components.push(ComponentFiles {
                    name,
                    paths: Vec::new(),
                });
                components.len() - 1
            });
            components[slot].paths.push(ComponentFile {
                name: path.replacen(&format!("{root_name}/"), "", 1),
                path: path.clone(),
                meta: None,
            });
            paths.push(path);
        }

        let report = get_files_information(&paths, &config.resolver(), reporter).await;
        let mut sheets: HashMap<String, _> = report
            .files
            .into_iter()
            .map(|file| (file.relative_path, file.meta))
            .collect();
        for file in components.iter_mut().flat_map(|c| c.paths.iter_mut()) {
            file.meta = sheets.remove(&file.path);
        }

        info!(
            components = components.len(),
            files = paths.len(),
            errors = report.errors.len(),
            duration = ?start.elapsed(),
            "Scan complete"
        );
        Ok(Self {
            root: root.to_path_buf(),
            config,
            found: listing.found,
            components,
            errors: report.errors,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// `false` when the scanned directory does not exist.
    pub fn found(&self) -> bool {
        self.found
    }

    pub fn components(&self) -> &[ComponentFiles] {
        &self.components
    }

    /// Files that could not be analyzed, with the reason.
    pub fn errors(&self) -> &[(String, ExplorerError)] {
        &self.errors
    }

    /// Aggregate the named component, or `None` if no such component was found.
    pub fn component_information(&self, name: &str) -> Option<ComponentInformation> {
        let component = self.components.iter().find(|c| c.name == name)?;
        Some(aggregate::aggregate(
            name,
            &component.sheets(),
            self.config.aggregate.cross_reference,
        ))
    }

    /// The component graph, spliced when `graph.collapse_references` is set.
    pub fn graph(&self) -> Vec<GraphNode> {
        let graph = graph::build_graph(&self.components, &self.config.graph.root_name);
        if self.config.graph.collapse_references {
            graph::collapse_references(&graph)
        } else {
            graph
        }
    }
}
