//! Extraction engine for component-based UI codebases.
//!
//! Two analyzers turn raw file text into flat fact sheets:
//! [`script::analyze_module`] walks a tree-sitter JavaScript tree and
//! [`template::analyze_template`] walks a parsed Glimmer template. The
//! [`resolve::PathResolver`] rewrites module specifiers into concrete
//! project paths by probing the filesystem.

pub mod meta;
pub mod ordered_set;
pub mod resolve;
pub mod script;
pub mod template;

pub use meta::{ActionSignature, FileMeta, Modifier, ScriptMeta, TemplateMeta};
pub use ordered_set::OrderedSet;
pub use resolve::PathResolver;

/// Sentinel for facts that could not be classified.
pub const UNKNOWN: &str = "<UNKNOWN>";

/// Error type for the extraction engine.
#[derive(thiserror::Error, Debug)]
pub enum SyntaxError {
    #[error("Parse error in {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Template error at {line}:{column}: {message}")]
    Template {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Tree-sitter error: {0}")]
    Language(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SyntaxError>;
