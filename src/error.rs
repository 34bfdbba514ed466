use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal export failures. Per-object problems are reported through
/// [`crate::builder::report::ExportReport`] instead.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The output file could not be created or written
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The scene snapshot handed over by the editor is not valid JSON for our schema
    #[error("Scene snapshot error: {0}")]
    SceneParse(#[from] serde_json::Error),

    /// The export configuration file could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// A selected container is not part of the snapshot's container tree
    #[error("Collection does not exist: {0}")]
    MissingCollection(String),

    /// The companion static-mesh exporter could not be run or exited non-zero
    #[error("Static mesh exporter failed for {path}: {message}")]
    CompanionFailed { path: PathBuf, message: String },
}

/// Result type for export operations
pub type Result<T> = std::result::Result<T, ExportError>;
