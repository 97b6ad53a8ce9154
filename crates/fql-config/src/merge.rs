//! Configuration merging.
//!
//! Folds the discovered schema layers into one field table and one
//! default-field list, applying precedence rules.

use std::collections::BTreeMap;

use fql_query::{FieldSchemaRegistry, SchemaError};

use crate::parse::{FieldType, SchemaLayer};

/// The result of merging every layer, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedConfig {
    /// Declared fields, closest declaration wins.
    pub fields: BTreeMap<String, FieldType>,
    /// Default fields as written by the closest file that sets them.
    pub default_fields: Vec<String>,
}

impl MergedConfig {
    /// Builds the registry. Undeclared default fields become text and repeats are dropped.
    pub fn to_registry(&self) -> Result<FieldSchemaRegistry, SchemaError> {
        let builder = self
            .fields
            .iter()
            .fold(FieldSchemaRegistry::builder(), |builder, (name, ty)| {
                builder.field(name.as_str(), (*ty).into())
            });
        self.default_fields
            .iter()
            .fold(builder, |builder, name| builder.default_field(name.as_str()))
            .build()
    }
}

/// Merges schema layers given in precedence order, highest first.
///
/// Merge rules:
/// - Fields: merged by name, the first definition of each name wins
/// - Default fields: taken whole from the first file that sets them
pub fn merge_layers(layers: &[SchemaLayer]) -> MergedConfig {
    let mut fields = BTreeMap::new();
    // Lowest precedence first so closer files overwrite.
    for layer in layers.iter().rev() {
        if let Some(declared) = &layer.config.fields {
            fields.extend(declared.iter().map(|(name, ty)| (name.clone(), *ty)));
        }
    }

    let default_fields = layers
        .iter()
        .find_map(|layer| layer.config.default_fields.clone())
        .unwrap_or_default();

    MergedConfig {
        fields,
        default_fields,
    }
}
