/// Top-level explorer error type.
///
/// All fallible operations in `emberscope-core` return [`Result<T, ExplorerError>`](Result).
/// Per-file failures inside batch operations are collected rather than
/// returned, so a single variant here never aborts a whole scan.
#[derive(thiserror::Error, Debug)]
pub enum ExplorerError {
    /// Malformed JavaScript or template markup.
    #[error("Syntax error: {0}")]
    Syntax(#[from] emberscope_syntax::SyntaxError),

    /// A file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Path as requested by the caller.
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Filesystem I/O error outside of a single file read (directory listing).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error in configuration parsing or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A merged fact sheet could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A blocking analysis task panicked or was cancelled.
    #[error("Analysis task failed: {0}")]
    Task(String),
}

impl ExplorerError {
    /// Whether the failure comes from malformed input rather than the environment.
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax(_))
    }
}

/// Errors in `emberscope.toml` parsing and validation.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist at the expected path.
    #[error("Config file not found: {0}")]
    NotFound(String),

    /// Configuration values are present but semantically invalid.
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// Configuration file syntax could not be parsed (TOML error).
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Convenience alias for `Result<T, ExplorerError>`.
pub type Result<T> = std::result::Result<T, ExplorerError>;
