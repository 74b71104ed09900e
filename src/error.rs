use std::path::PathBuf;
use thiserror::Error;

/// Per-frame detector failures. None of these stop the stream.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("invalid frame: {width}x{height}")]
    InvalidFrame { width: u32, height: u32 },

    #[error("preprocessing failed: {0}")]
    Preprocess(String),

    #[error("scorer failed: {0}")]
    Scorer(anyhow::Error),

    #[error("model output error: {0}")]
    ModelOutput(String),
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to open frame source {}: {reason}", path.display())]
    Init { path: PathBuf, reason: String },

    #[error("failed to read frame: {0}")]
    Read(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}
