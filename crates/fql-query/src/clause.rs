//! Clause building.
//!
//! Turns one non-connective token into a typed [`Clause`]: a `field:value`
//! token becomes a [`Clause::FieldTerm`] interpreted against the field's kind,
//! anything else becomes [`Clause::FreeText`] interpreted as text.

use crate::{
    ast::Clause,
    error::{QueryError, QueryErrorKind},
    lexer::{Token, TokenKind},
    schema::{FieldKind, FieldSchemaRegistry},
    value::{ValueError, interpret},
};

/// Builds the clause for a single token.
pub fn build_clause(token: &Token, registry: &FieldSchemaRegistry) -> Result<Clause, QueryError> {
    match &token.kind {
        TokenKind::Quoted(text) => free_text(text, true, token.position),
        TokenKind::Bare(text) => match split_field(text) {
            Some((field, value)) => field_term(field, value, registry, token.position),
            None => {
                let (value, quoted) = unquote(text);
                free_text(value, quoted, token.position)
            }
        },
    }
}

/// Builds a `field:value` clause.
fn field_term(
    field: &str,
    raw: &str,
    registry: &FieldSchemaRegistry,
    position: usize,
) -> Result<Clause, QueryError> {
    // Byte offset of the value, just past the colon.
    let value_position = position + field.len() + 1;

    if field.is_empty() {
        return Err(QueryError::new(QueryErrorKind::EmptyField {
            value: raw.to_string(),
        })
        .at(position));
    }

    let (value, quoted) = unquote(raw);
    let kind = registry.kind_of(field);

    match interpret(value, quoted, kind) {
        Ok(spec) => Ok(Clause::field(field, spec)),
        Err(ValueError::Empty) => Err(QueryError::new(QueryErrorKind::EmptyValue {
            field: Some(field.to_string()),
        })
        .at(value_position)),
        Err(reason) => Err(QueryError::new(QueryErrorKind::InvalidValue {
            field: field.to_string(),
            value: reason.offending(value).to_string(),
            reason,
        })
        .at(value_position)),
    }
}

/// Builds a free-text clause. Free text is never numeric.
fn free_text(value: &str, quoted: bool, position: usize) -> Result<Clause, QueryError> {
    match interpret(value, quoted, FieldKind::Text) {
        Ok(spec) => Ok(Clause::FreeText(spec)),
        Err(_) => Err(QueryError::new(QueryErrorKind::EmptyValue { field: None }).at(position)),
    }
}

/// Splits `field:value` at the first colon outside double quotes.
fn split_field(text: &str) -> Option<(&str, &str)> {
    let mut in_quotes = false;
    for (idx, ch) in text.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ':' if !in_quotes => return Some((&text[..idx], &text[idx + 1..])),
            _ => {}
        }
    }
    None
}

/// Strips one pair of surrounding double quotes, reporting whether it did.
fn unquote(value: &str) -> (&str, bool) {
    match value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
    {
        Some(inner) => (inner, true),
        None => (value, false),
    }
}
