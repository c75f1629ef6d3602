use std::path::Path;

use emberscope_syntax::PathResolver;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name looked up at the project root.
pub const CONFIG_FILE: &str = "emberscope.toml";

/// Top-level configuration, matching `emberscope.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExplorerConfig {
    #[serde(default)]
    pub discovery: DiscoverySection,
    #[serde(default)]
    pub resolver: ResolverSection,
    #[serde(default)]
    pub aggregate: AggregateSection,
    #[serde(default)]
    pub graph: GraphSection,
}

impl ExplorerConfig {
    /// Load `emberscope.toml` from `root`, falling back to defaults when the
    /// file is absent.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE);
        if path.is_file() {
            Self::from_path(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load a specific configuration file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::NotFound(path.display().to_string()))?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolver.script_extension.is_empty() || self.resolver.markup_extension.is_empty() {
            return Err(ConfigError::Invalid(
                "resolver extensions must not be empty".to_string(),
            ));
        }
        if self.graph.root_name.is_empty() {
            return Err(ConfigError::Invalid(
                "graph.root_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn resolver(&self) -> PathResolver {
        PathResolver::new(
            self.resolver.script_extension.as_str(),
            self.resolver.markup_extension.as_str(),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoverySection {
    /// Top-level entry names skipped during discovery.
    pub ignored_names: Vec<String>,
    /// File suffixes skipped while expanding directories.
    pub ignored_suffixes: Vec<String>,
    /// Extensions of candidate files, without the dot.
    pub extensions: Vec<String>,
}

impl Default for DiscoverySection {
    fn default() -> Self {
        Self {
            ignored_names: vec![
                "tmp".into(),
                "vendor".into(),
                "node_modules".into(),
                "tests".into(),
                "ember-cli-build.js".into(),
                "index.js".into(),
                "dist".into(),
                "testem.js".into(),
                "config".into(),
            ],
            ignored_suffixes: vec![
                ".gitkeep".into(),
                ".css".into(),
                ".less".into(),
                ".scss".into(),
                ".md".into(),
            ],
            extensions: vec!["js".into(), "hbs".into()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSection {
    pub script_extension: String,
    pub markup_extension: String,
}

impl Default for ResolverSection {
    fn default() -> Self {
        Self {
            script_extension: "js".to_string(),
            markup_extension: "hbs".to_string(),
        }
    }
}

/// How template references without a matching declaration are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CrossReferencePolicy {
    /// Rewrite matched references and leave the rest untouched.
    #[default]
    Rewrite,
    /// Also mark unmatched references as template-only and backfill a
    /// placeholder declaration for each.
    Annotate,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateSection {
    pub cross_reference: CrossReferencePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSection {
    pub root_name: String,
    /// Splice referenced components into import/export leaves.
    pub collapse_references: bool,
}

impl Default for GraphSection {
    fn default() -> Self {
        Self {
            root_name: "<ROOT>".to_string(),
            collapse_references: false,
        }
    }
}
