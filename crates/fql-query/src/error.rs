//! Error and warning types for query parsing.
//!
//! Fatal problems abort AST construction and surface as a single [`QueryError`].
//! Non-fatal observations are collected as [`QueryWarning`]s and returned next to
//! a valid AST.

use std::{error::Error, fmt};

use thiserror::Error;

use crate::{lexer::Connective, value::ValueError};

/// The specific kind of query error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryErrorKind {
    /// A `"` was opened but never closed.
    #[error("unterminated quote")]
    UnterminatedQuote,

    /// A connective keyword that the grammar does not know.
    ///
    /// Never produced: unrecognized bare words are values, not connectives.
    #[error("unknown connective '{keyword}'")]
    UnknownConnective {
        /// The offending keyword.
        keyword: String,
    },

    /// A `:value` with nothing before the colon.
    #[error("missing field name before ':{value}'")]
    EmptyField {
        /// The value that followed the colon.
        value: String,
    },

    /// A `field:` with nothing after the colon, or an empty quoted phrase.
    #[error("{}", empty_value_message(field.as_deref()))]
    EmptyValue {
        /// The field name, or `None` for free text.
        field: Option<String>,
    },

    /// A value that cannot be interpreted according to its field's kind.
    #[error("invalid value '{value}' for field '{field}': {reason}")]
    InvalidValue {
        /// The field whose kind rejected the value.
        field: String,
        /// The offending raw text.
        value: String,
        /// Why the value was rejected.
        reason: ValueError,
    },
}

/// Formats the message for [`QueryErrorKind::EmptyValue`].
fn empty_value_message(field: Option<&str>) -> String {
    match field {
        Some(field) => format!("field '{field}' has no value"),
        None => "empty phrase".to_string(),
    }
}

/// A query parse failure with enough context to point at the problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    /// What went wrong.
    pub kind: QueryErrorKind,
    /// Byte offset in the query where the problem starts.
    pub position: Option<usize>,
    /// The original query string (if available).
    pub query: Option<String>,
}

impl QueryError {
    /// Creates an error with no position or query context.
    pub fn new(kind: QueryErrorKind) -> Self {
        Self {
            kind,
            position: None,
            query: None,
        }
    }

    /// Sets the byte offset the error points at.
    pub fn at(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    /// Sets the query string for this error.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Returns the error message without context.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Returns a suggestion for common errors.
    pub fn suggestion(&self) -> Option<&'static str> {
        match &self.kind {
            QueryErrorKind::UnterminatedQuote => {
                Some("Add a closing quote (\") to complete the phrase")
            }
            QueryErrorKind::EmptyField { .. } => Some("Write the field name before ':'"),
            QueryErrorKind::EmptyValue { field: Some(_) } => {
                Some("Put a value directly after ':', e.g. 'genres:horror'")
            }
            QueryErrorKind::InvalidValue {
                reason: ValueError::MalformedRange(_),
                ..
            } => Some("Ranges look like '[low TO high]'; leave a side empty or use '*' for no bound"),
            QueryErrorKind::InvalidValue {
                reason: ValueError::NotAnInteger(_),
                ..
            } => Some("This field stores whole numbers"),
            _ => None,
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "query error: {}", self.kind)?;

        if let Some(query) = &self.query {
            writeln!(f, "  {query}")?;
            if let Some(pos) = self.position {
                let clamped = pos.min(query.len());
                let column = query[..clamped].chars().count();
                writeln!(f, "  {}^", " ".repeat(column))?;
            }
        }

        if let Some(suggestion) = self.suggestion() {
            write!(f, "hint: {suggestion}")?;
        }

        Ok(())
    }
}

impl Error for QueryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            QueryErrorKind::InvalidValue { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

impl From<QueryErrorKind> for QueryError {
    fn from(kind: QueryErrorKind) -> Self {
        Self::new(kind)
    }
}

/// A non-fatal observation made while building an AST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryWarning {
    /// A connective ended the query with no clause for it to apply to.
    TrailingConnective {
        /// The dropped connective.
        connective: Connective,
        /// Byte offset of the connective.
        position: usize,
    },
    /// Two connectives appeared in a row; only the later one applies.
    ReplacedConnective {
        /// The connective that was discarded.
        replaced: Connective,
        /// The connective that took effect.
        by: Connective,
        /// Byte offset of the later connective.
        position: usize,
    },
    /// A `field:` names a field the registry does not know; it is matched as text.
    UnknownField {
        /// The unregistered field name.
        field: String,
        /// Byte offset of the clause.
        position: usize,
    },
}

impl QueryWarning {
    /// Byte offset in the query the warning refers to.
    pub fn position(&self) -> usize {
        match self {
            Self::TrailingConnective { position, .. }
            | Self::ReplacedConnective { position, .. }
            | Self::UnknownField { position, .. } => *position,
        }
    }
}

impl fmt::Display for QueryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TrailingConnective { connective, .. } => {
                write!(f, "trailing {connective} has no clause after it and was ignored")
            }
            Self::ReplacedConnective { replaced, by, .. } => {
                write!(f, "{replaced} immediately followed by {by}; only {by} applies")
            }
            Self::UnknownField { field, .. } => {
                write!(f, "unknown field '{field}' is matched as text")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unterminated_quote_display() {
        let err = QueryError::new(QueryErrorKind::UnterminatedQuote)
            .at(6)
            .with_query("title:\"blade runner");
        let display = err.to_string();
        assert!(display.contains("unterminated quote"));
        assert!(display.contains("title:\"blade runner"));
        assert!(display.contains("        ^"));
        assert!(display.contains("hint:"));
    }

    #[test]
    fn caret_counts_characters_not_bytes() {
        let err = QueryError::new(QueryErrorKind::UnterminatedQuote)
            .at("café ".len())
            .with_query("café \"x");
        let display = err.to_string();
        assert!(display.contains("\n       ^"));
    }

    #[test]
    fn invalid_value_names_field_and_value() {
        let err = QueryError::new(QueryErrorKind::InvalidValue {
            field: "release_year".into(),
            value: "abc".into(),
            reason: ValueError::NotAnInteger("abc".into()),
        });
        let message = err.message();
        assert!(message.contains("release_year"));
        assert!(message.contains("'abc'"));
        assert!(err.source().is_some());
    }

    #[test]
    fn empty_value_message_mentions_field() {
        let err = QueryError::new(QueryErrorKind::EmptyValue {
            field: Some("genres".into()),
        });
        assert_eq!(err.message(), "field 'genres' has no value");
        assert!(err.suggestion().is_some());

        let free = QueryError::new(QueryErrorKind::EmptyValue { field: None });
        assert_eq!(free.message(), "empty phrase");
    }

    #[test]
    fn error_without_query_has_no_caret() {
        let err = QueryError::new(QueryErrorKind::UnterminatedQuote).at(3);
        assert!(!err.to_string().contains('^'));
    }

    #[test]
    fn warning_display() {
        let warning = QueryWarning::ReplacedConnective {
            replaced: Connective::And,
            by: Connective::Not,
            position: 4,
        };
        assert_eq!(
            warning.to_string(),
            "AND immediately followed by NOT; only NOT applies"
        );
        assert_eq!(warning.position(), 4);
    }
}
