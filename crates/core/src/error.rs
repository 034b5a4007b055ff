use std::path::PathBuf;

use thiserror::Error;

/// Missing or invalid run parameters. Always fatal before any task is scheduled.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("cannot load board from {path}: {reason}")]
    BoardSource { path: PathBuf, reason: String },
}

/// Failures reported by an expansion service. Never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpansionError {
    #[error("cannot parse board: {0}")]
    Parse(String),

    #[error("invalid board handle: {0}")]
    InvalidHandle(String),

    #[error("malformed expansion result: {0}")]
    Malformed(String),

    #[error("expansion service unavailable: {0}")]
    Unavailable(String),
}
