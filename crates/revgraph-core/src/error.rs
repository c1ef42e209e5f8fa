//! Centralized error types for revgraph.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for core operations.
#[derive(Error, Debug)]
pub enum RevgraphError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read config file {path}: {source}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Similarity cache I/O error on {path}: {source}")]
    CacheIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed similarity cache {path}: {reason}")]
    CacheFormat { path: PathBuf, reason: String },

    #[error("Invalid sample size {requested}: population has {available} products")]
    InvalidSampleSize { requested: usize, available: usize },

    #[error("Similarity matrix is not square over its reviewers: {0}")]
    MatrixShape(String),

    #[error("Unknown reviewer in similarity input: {0}")]
    UnknownEntity(String),
}

/// Result type for core operations.
pub type RevgraphResult<T> = Result<T, RevgraphError>;

impl RevgraphError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn cache_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CacheIo { path: path.into(), source }
    }

    pub(crate) fn cache_format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::CacheFormat { path: path.into(), reason: reason.into() }
    }
}
