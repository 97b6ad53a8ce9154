//! Field schema configuration for fql.
//!
//! fql reads its field schema from TOML files named `.fql.toml`. Files are found by walking
//! up the directory tree from the current working directory, then loading `~/.fql.toml` as
//! the global config with lowest precedence. When no file exists, the built-in movie catalog
//! schema is used.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::path::{Path, PathBuf};

pub use discovery::{CONFIG_FILENAME, discover_layers, global_config_path};
pub use error::ConfigError;
use fql_query::FieldSchemaRegistry;
pub use merge::{MergedConfig, merge_layers};
pub use parse::{FieldType, RawConfig, SchemaLayer, parse_config_file, parse_config_str};
pub use templates::init_template;
use tracing::{debug, warn};
pub use validate::{SchemaWarning, validate_schema};

/// Name reported for the built-in schema in place of a file path.
pub const BUILTIN_SOURCE: &str = "<built-in>";

/// A loaded, validated field schema.
#[derive(Debug, Clone)]
pub struct Schema {
    /// The registry handed to the query parser.
    pub registry: FieldSchemaRegistry,
    /// Files the schema was merged from, highest precedence first. Empty for the built-in
    /// schema.
    pub sources: Vec<PathBuf>,
    /// Non-fatal problems found while loading.
    pub warnings: Vec<SchemaWarning>,
}

impl Schema {
    /// Loads the schema by discovering and merging all relevant `.fql.toml` files.
    ///
    /// Falls back to [`Schema::builtin`] if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        Self::from_layers(&discover_layers(cwd)?)
    }

    /// Loads the schema from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    /// Falls back to [`Schema::builtin`] if the list is empty.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let layers = files
            .iter()
            .map(|path| SchemaLayer::read(path, false))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_layers(&layers)
    }

    /// Builds the schema from already parsed layers, highest precedence first.
    ///
    /// Falls back to [`Schema::builtin`] if there are no layers.
    pub fn from_layers(layers: &[SchemaLayer]) -> Result<Self, ConfigError> {
        if layers.is_empty() {
            debug!("no schema layers found, using built-in schema");
            return Self::builtin();
        }
        let sources = layers.iter().map(|layer| layer.path.clone()).collect();
        Self::merge(layers, sources)
    }

    /// The built-in movie and TV catalog schema.
    ///
    /// This is the same schema `fql init` writes.
    pub fn builtin() -> Result<Self, ConfigError> {
        let layer = SchemaLayer {
            path: PathBuf::from(BUILTIN_SOURCE),
            config: parse_config_str(templates::DEFAULT_TEMPLATE, Path::new(BUILTIN_SOURCE))?,
            global: false,
        };
        Self::merge(&[layer], Vec::new())
    }

    /// Returns true if no configuration file contributed to this schema.
    pub fn is_builtin(&self) -> bool {
        self.sources.is_empty()
    }

    /// Merges layers, validates the result and builds the registry.
    fn merge(layers: &[SchemaLayer], sources: Vec<PathBuf>) -> Result<Self, ConfigError> {
        let merged = merge_layers(layers);
        let warnings = validate_schema(&merged);
        for warning in &warnings {
            warn!("{warning}");
        }
        let registry = merged.to_registry()?;

        Ok(Self {
            registry,
            sources,
            warnings,
        })
    }
}
