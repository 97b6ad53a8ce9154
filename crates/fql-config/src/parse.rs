//! Configuration file parsing.
//!
//! Parses individual `.fql.toml` files into intermediate `RawConfig` structures
//! that preserve the optional nature of all keys before merging.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use fql_query::{FieldKind, NumericType};
use serde::Deserialize;
#[cfg(test)]
use toml::de::Error as TomlError;

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
///
/// All keys are optional to support partial configs that will be merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfig {
    /// When true, stop discovery here - ignore parent and global configs.
    pub root: Option<bool>,
    /// Fields matched by free text, highest priority first.
    pub default_fields: Option<Vec<String>>,
    /// Field declarations: name -> type.
    pub fields: Option<BTreeMap<String, FieldType>>,
}

/// A field type as spelled in TOML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// `"text"`
    Text,
    /// `"integer"`
    Integer,
    /// `"float"`
    Float,
}

impl From<FieldType> for FieldKind {
    fn from(ty: FieldType) -> Self {
        match ty {
            FieldType::Text => Self::Text,
            FieldType::Integer => Self::Numeric(NumericType::Integer),
            FieldType::Float => Self::Numeric(NumericType::Float),
        }
    }
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses configuration from a TOML string without path context.
#[cfg(test)]
pub fn parse_config(contents: &str) -> Result<RawConfig, TomlError> {
    toml::from_str(contents)
}

/// One `.fql.toml` file as it takes part in a merge.
#[derive(Debug, Clone)]
pub struct SchemaLayer {
    /// Where the layer was read from.
    pub path: PathBuf,
    /// The declarations it carries.
    pub config: RawConfig,
    /// True for `~/.fql.toml`.
    pub global: bool,
}

impl SchemaLayer {
    /// Reads and parses the layer at `path`.
    pub fn read(path: &Path, global: bool) -> Result<Self, ConfigError> {
        Ok(Self {
            path: path.to_path_buf(),
            config: parse_config_file(path)?,
            global,
        })
    }

    /// Whether this layer sets `root = true`, hiding every layer above it.
    pub fn is_root(&self) -> bool {
        self.config.root == Some(true)
    }

    /// Number of fields this layer declares.
    pub fn field_count(&self) -> usize {
        self.config.fields.as_ref().map_or(0, BTreeMap::len)
    }
}
