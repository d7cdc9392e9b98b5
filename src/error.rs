//! Crate error type
//!
//! Only boundary operations return these. Failures inside the capture and
//! render ticks degrade to "no hand" instead of propagating.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced at the crate boundary
#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] serde_json::Error),
    #[error("Capture device unavailable: {0}")]
    CaptureUnavailable(String),
    #[error("Failed to spawn inference worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),
    #[error("Landmark detection failed: {0}")]
    Detection(String),
}

/// Crate result alias
pub type Result<T> = std::result::Result<T, Error>;
