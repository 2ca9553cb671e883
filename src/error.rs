use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while turning a CSV file into a [`crate::SongCatalog`].
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed catalog csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid song record on line {line} (need id, title, artist): missing {field}")]
    MissingField { line: u64, field: &'static str },
    #[error("no songs loaded from {0}")]
    Empty(String),
}

/// Failures raised while loading or validating a [`crate::GeneratorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be at least {min}, got {value}")]
    TooSmall {
        field: &'static str,
        min: usize,
        value: usize,
    },
    #[error("{field}: min {min} exceeds max {max}")]
    InvertedRange {
        field: &'static str,
        min: usize,
        max: usize,
    },
}
