use std::path::Path;

use emberscope_syntax::resolve::serialize_path;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::DiscoverySection;
use crate::error::Result;

/// Candidate files below a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileListing {
    /// `false` when the requested directory does not exist.
    pub found: bool,
    /// Sorted, `/`-separated paths.
    pub files: Vec<String>,
}

/// List the script and markup files of a project directory.
///
/// Top-level entries are filtered first: dotfiles, denylisted names and
/// files with an unsupported extension are skipped. Each surviving
/// directory is then expanded recursively.
pub fn discover_files(dir: &Path, config: &DiscoverySection) -> Result<FileListing> {
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "Discovery root not found");
        return Ok(FileListing::default());
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if !keeps_entry(&name, config) {
            continue;
        }
        if path.is_dir() {
            expand_directory(&path, config, &mut files);
        } else if is_candidate(&name, config) {
            files.push(serialize_path(&path));
        }
    }

    files.sort();
    debug!(dir = %dir.display(), count = files.len(), "Discovered files");
    Ok(FileListing { found: true, files })
}

fn keeps_entry(name: &str, config: &DiscoverySection) -> bool {
    if name.starts_with('.') || config.ignored_names.iter().any(|n| n == name) {
        return false;
    }
    !name.contains('.') || has_supported_extension(name, config)
}

fn expand_directory(dir: &Path, config: &DiscoverySection, files: &mut Vec<String>) {
    let pattern = format!(
        "{}/**/*",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    match glob::glob(&pattern) {
        Ok(paths) => {
            for entry in paths.flatten() {
                let name = entry
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                if entry.is_file() && is_candidate(&name, config) {
                    files.push(serialize_path(&entry));
                }
            }
        }
        Err(e) => warn!(pattern = %pattern, error = %e, "Invalid glob pattern"),
    }
}

fn is_candidate(name: &str, config: &DiscoverySection) -> bool {
    !config
        .ignored_suffixes
        .iter()
        .any(|suffix| name.ends_with(suffix.as_str()))
        && has_supported_extension(name, config)
}

fn has_supported_extension(name: &str, config: &DiscoverySection) -> bool {
    name.rsplit_once('.')
        .is_some_and(|(_, ext)| config.extensions.iter().any(|e| e == ext))
}
