use std::path::PathBuf;

use thiserror::Error;

/// Rejected rule set. Raised before any search work starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("target_count must be at least 1")]
    ZeroTargetCount,

    #[error("blackout window {start} - {end} ends before it starts")]
    InvertedWindow { start: String, end: String },

    #[error("{rule} group has no course patterns")]
    EmptyGroup { rule: &'static str },

    #[error("cannot read rule file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse rule file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A single schedule image or the rule dump could not be written.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
}
