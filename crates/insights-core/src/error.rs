use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by Store Insights.
#[derive(Error, Debug)]
pub enum InsightsError {
    /// A declared source file does not exist or could not be read.
    #[error("Failed to read source {path}: {source}")]
    MissingFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source lacks a column the internal schema requires.
    #[error("Schema error in {path}: {reason}")]
    Schema { path: PathBuf, reason: String },

    /// A row holds a value that cannot be parsed or is out of range.
    #[error("Invalid row at {path}:{line}: {reason}")]
    InvalidRow {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    /// The CSV framing itself is malformed.
    #[error("Failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// No CSV sources were found under the given directory.
    #[error("No CSV files found in {0}")]
    NoSources(PathBuf),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A JSON document could not be produced or parsed.
    #[error("Failed to process JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the insights crates.
pub type Result<T> = std::result::Result<T, InsightsError>;
