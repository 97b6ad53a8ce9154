//! Field schema registry.
//!
//! Maps field names to their [`FieldKind`] and records the ordered set of
//! default fields that free-text clauses are matched against. A registry is
//! immutable once built and can be shared freely between threads.

use std::{collections::BTreeMap, fmt};

use serde::Serialize;
use thiserror::Error;

/// Storage representation of a numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericType {
    /// Whole numbers. Strict comparisons are normalized to closed bounds.
    Integer,
    /// Floating-point numbers. Strict comparisons keep open bounds.
    Float,
}

/// How a field's values are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text: terms and phrases.
    Text,
    /// Numbers: exact values, comparisons and ranges.
    Numeric(NumericType),
}

impl FieldKind {
    /// Returns true for numeric fields.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Numeric(_))
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Numeric(NumericType::Integer) => f.write_str("integer"),
            Self::Numeric(NumericType::Float) => f.write_str("float"),
        }
    }
}

/// Errors from building a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Free text is never numeric, so a numeric default field is unusable.
    #[error("default field '{field}' is {kind}, but default fields must be text")]
    NumericDefaultField {
        /// The offending field.
        field: String,
        /// Its declared kind.
        kind: FieldKind,
    },

    /// Free-text clauses need at least one field to match against.
    #[error("no default fields declared")]
    NoDefaultFields,
}

/// Static mapping from field name to kind, plus the default free-text fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSchemaRegistry {
    /// Declared fields, ordered by name.
    fields: BTreeMap<String, FieldKind>,
    /// Fields searched by free text, in priority order.
    default_fields: Vec<String>,
}

impl FieldSchemaRegistry {
    /// Starts building a registry.
    pub fn builder() -> FieldSchemaBuilder {
        FieldSchemaBuilder::default()
    }

    /// Returns the kind of a field. Unregistered fields are treated as text.
    pub fn kind_of(&self, field: &str) -> FieldKind {
        self.get(field).unwrap_or(FieldKind::Text)
    }

    /// Returns the declared kind of a field, or `None` if it is not registered.
    pub fn get(&self, field: &str) -> Option<FieldKind> {
        self.fields.get(field).copied()
    }

    /// Returns true if the field is registered.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// The fields free-text clauses are matched against, highest priority first.
    pub fn default_fields(&self) -> &[String] {
        &self.default_fields
    }

    /// Returns the highest-priority default field.
    pub fn primary_field(&self) -> &str {
        // Non-empty by construction.
        &self.default_fields[0]
    }

    /// Iterates over all registered fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, FieldKind)> {
        self.fields.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    /// Number of registered fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no fields are registered.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builder for [`FieldSchemaRegistry`].
#[derive(Debug, Clone, Default)]
pub struct FieldSchemaBuilder {
    /// Fields declared so far. A later declaration replaces an earlier one.
    fields: BTreeMap<String, FieldKind>,
    /// Default fields in declaration order.
    default_fields: Vec<String>,
}

impl FieldSchemaBuilder {
    /// Declares a field of the given kind.
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.insert(name.into(), kind);
        self
    }

    /// Declares a text field.
    pub fn text(self, name: impl Into<String>) -> Self {
        self.field(name, FieldKind::Text)
    }

    /// Declares an integer field.
    pub fn integer(self, name: impl Into<String>) -> Self {
        self.field(name, FieldKind::Numeric(NumericType::Integer))
    }

    /// Declares a floating-point field.
    pub fn float(self, name: impl Into<String>) -> Self {
        self.field(name, FieldKind::Numeric(NumericType::Float))
    }

    /// Appends a default free-text field. Repeats are ignored.
    pub fn default_field(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.default_fields.contains(&name) {
            self.default_fields.push(name);
        }
        self
    }

    /// Validates and builds the registry.
    ///
    /// Default fields that were never declared are registered as text.
    pub fn build(mut self) -> Result<FieldSchemaRegistry, SchemaError> {
        if self.default_fields.is_empty() {
            return Err(SchemaError::NoDefaultFields);
        }

        for name in &self.default_fields {
            let kind = *self.fields.entry(name.clone()).or_insert(FieldKind::Text);
            if kind.is_numeric() {
                return Err(SchemaError::NumericDefaultField {
                    field: name.clone(),
                    kind,
                });
            }
        }

        Ok(FieldSchemaRegistry {
            fields: self.fields,
            default_fields: self.default_fields,
        })
    }
}
