//! Error types for fql configuration.

use std::{io, path::PathBuf};

use fql_query::SchemaError;
use thiserror::Error;
use toml::de;

/// Errors that can occur when loading a field schema.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("failed to parse config file {path}: {source}")]
    ParseToml {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: de::Error,
    },

    /// The merged schema cannot be turned into a registry.
    #[error("invalid schema: {0}")]
    InvalidSchema(#[from] SchemaError),
}
