//! Query parser.
//!
//! Assembles tokens into a [`QueryAst`] in a single left-to-right pass.
//!
//! # Connectives
//!
//! `AND`, `OR` and `NOT` set the occurrence of the one clause that follows
//! them and nothing else:
//!
//! ```text
//! horror OR thriller        → Must(horror), Should(thriller)
//! NOT horror comedy         → MustNot(horror), Must(comedy)
//! ```
//!
//! A connective never reaches back to the clause before it, and there is no
//! precedence or grouping. Clauses without a connective are `Must`.

use tracing::{debug, trace};

use crate::{
    ast::{Clause, Occurrence, QueryAst},
    clause::build_clause,
    error::{QueryError, QueryWarning},
    lexer::{Connective, Token, tokenize},
    schema::FieldSchemaRegistry,
};

/// A successfully parsed query and any non-fatal warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuery {
    /// The assembled clauses.
    pub ast: QueryAst,
    /// Problems that did not prevent building the AST.
    pub warnings: Vec<QueryWarning>,
}

/// Parses queries against a field schema.
///
/// Holds no state between calls; one parser may be shared across threads.
#[derive(Debug, Clone, Copy)]
pub struct QueryParser<'a> {
    /// Field kinds and default fields.
    registry: &'a FieldSchemaRegistry,
}

impl<'a> QueryParser<'a> {
    /// Creates a parser for the given registry.
    pub fn new(registry: &'a FieldSchemaRegistry) -> Self {
        Self { registry }
    }

    /// The registry clauses are built against.
    pub fn registry(&self) -> &'a FieldSchemaRegistry {
        self.registry
    }

    /// Parses a query string.
    ///
    /// Empty input yields an empty AST. Any fatal error aborts the whole query;
    /// no partial AST is returned.
    pub fn parse(&self, input: &str) -> Result<ParsedQuery, QueryError> {
        let tokens = tokenize(input)?;
        trace!(count = tokens.len(), "tokenized query");

        Assembler::new(self.registry)
            .run(&tokens)
            .map_err(|err| err.with_query(input))
    }
}

/// A connective waiting for the clause it applies to.
#[derive(Debug, Clone, Copy)]
struct Pending {
    /// The connective keyword.
    connective: Connective,
    /// Where it appeared.
    position: usize,
}

/// One-pass boolean assembler.
struct Assembler<'a> {
    /// Field kinds and default fields.
    registry: &'a FieldSchemaRegistry,
    /// The connective for the next clause, if one was given.
    pending: Option<Pending>,
    /// Clauses emitted so far.
    clauses: Vec<(Clause, Occurrence)>,
    /// Warnings collected so far.
    warnings: Vec<QueryWarning>,
}

impl<'a> Assembler<'a> {
    /// Creates an assembler with no pending connective.
    fn new(registry: &'a FieldSchemaRegistry) -> Self {
        Self {
            registry,
            pending: None,
            clauses: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Consumes all tokens and returns the assembled query.
    fn run(mut self, tokens: &[Token]) -> Result<ParsedQuery, QueryError> {
        for token in tokens {
            match token.connective() {
                Some(connective) => self.set_connective(connective, token.position),
                None => self.push_clause(token)?,
            }
        }

        if let Some(Pending {
            connective,
            position,
        }) = self.pending
        {
            self.warn(QueryWarning::TrailingConnective {
                connective,
                position,
            });
        }

        Ok(ParsedQuery {
            ast: QueryAst::from(self.clauses),
            warnings: self.warnings,
        })
    }

    /// Records a connective for the next clause.
    fn set_connective(&mut self, connective: Connective, position: usize) {
        if let Some(previous) = self.pending {
            self.warn(QueryWarning::ReplacedConnective {
                replaced: previous.connective,
                by: connective,
                position,
            });
        }
        debug!(%connective, position, "connective");
        self.pending = Some(Pending {
            connective,
            position,
        });
    }

    /// Builds a clause, tags it with the pending occurrence, and resets to `Must`.
    fn push_clause(&mut self, token: &Token) -> Result<(), QueryError> {
        let clause = build_clause(token, self.registry)?;

        if let Some(field) = clause.field_name()
            && !self.registry.contains(field)
        {
            self.warn(QueryWarning::UnknownField {
                field: field.to_string(),
                position: token.position,
            });
        }

        let occurrence = self
            .pending
            .take()
            .map_or(Occurrence::Must, |p| p.connective.occurrence());
        debug!(?clause, %occurrence, "clause");
        self.clauses.push((clause, occurrence));
        Ok(())
    }

    /// Records a warning.
    fn warn(&mut self, warning: QueryWarning) {
        debug!(%warning, "query warning");
        self.warnings.push(warning);
    }
}

/// Parses a query string against a registry.
///
/// Shorthand for [`QueryParser::new`] followed by [`QueryParser::parse`].
pub fn parse(input: &str, registry: &FieldSchemaRegistry) -> Result<ParsedQuery, QueryError> {
    QueryParser::new(registry).parse(input)
}
