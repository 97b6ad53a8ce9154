//! Schema validation.
//!
//! Reports non-fatal problems in a merged schema. Fatal problems surface as a
//! `SchemaError` when the registry is built.

use std::{collections::HashSet, fmt};

use crate::merge::MergedConfig;

/// A non-fatal warning about the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaWarning {
    /// A default field has no entry in `[fields]`; it is treated as text.
    UndeclaredDefaultField {
        /// The field name.
        field: String,
    },
    /// A default field is listed more than once; later repeats are dropped.
    DuplicateDefaultField {
        /// The field name.
        field: String,
    },
}

impl fmt::Display for SchemaWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndeclaredDefaultField { field } => {
                write!(f, "default field '{field}' is not declared in [fields], treating it as text")
            }
            Self::DuplicateDefaultField { field } => {
                write!(f, "default field '{field}' is listed more than once")
            }
        }
    }
}

/// Validates a merged schema and returns any warnings, in default-field order.
pub fn validate_schema(merged: &MergedConfig) -> Vec<SchemaWarning> {
    let mut warnings = Vec::new();
    let mut seen = HashSet::new();

    for field in &merged.default_fields {
        if !seen.insert(field.as_str()) {
            warnings.push(SchemaWarning::DuplicateDefaultField {
                field: field.clone(),
            });
        } else if !merged.fields.contains_key(field) {
            warnings.push(SchemaWarning::UndeclaredDefaultField {
                field: field.clone(),
            });
        }
    }

    warnings
}
