// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

use crate::graph::AssetKind;

#[derive(Error, Debug)]
pub enum PlugbuildError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// A tracker operation referenced a key that was never registered.
    ///
    /// This always indicates broken graph construction, never user input,
    /// so it is propagated instead of being ignored.
    #[error("Unknown job key: {0}")]
    UnknownJob(String),

    #[error("Cycle detected in plugin dependencies: {0}")]
    DependencyCycle(String),

    #[error("{kind} build failed for plugin '{plugin}' (exit code {code})")]
    JobFailed {
        kind: AssetKind,
        plugin: String,
        code: i32,
    },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PlugbuildError>;
