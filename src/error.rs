// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Failures at the edges of the simulation: configuration, input scripts and
/// snapshot output. The per-tick force model itself never fails.
#[derive(Debug, Error)]
pub enum DriftError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid vehicle constant `{field}`: {reason}")]
    InvalidConstant { field: &'static str, reason: String },

    #[error("failed to read input script {path}: {source}")]
    ScriptIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed input script: {0}")]
    ScriptFormat(#[from] serde_json::Error),

    #[error("failed to write snapshot: {0}")]
    Present(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DriftError>;
