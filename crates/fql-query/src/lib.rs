//! Filter query parsing and a backend-neutral AST.
//!
//! The query language is shared by every search backend:
//!
//! - **Terms**: `dracula` - matched against the default fields
//! - **Phrases**: `"vampire romance"` - ordered terms
//! - **Fields**: `genres:horror`, `title:"blade runner"`
//! - **Comparisons**: `release_year:>=2000`, `average_rating:<5`
//! - **Ranges**: `average_rating:[7 TO 9]`, `release_year:[2000 TO ]`
//! - **Connectives**: `AND`, `OR`, `NOT` - each applies to the next clause only
//!
//! Parsing needs a [`FieldSchemaRegistry`] that says which fields are numeric and
//! which fields free text is matched against.
//!
//! # Example
//!
//! ```
//! use fql_query::{Clause, FieldSchemaRegistry, Occurrence, ValueSpec, parse};
//!
//! let registry = FieldSchemaRegistry::builder()
//!     .text("title")
//!     .text("genres")
//!     .integer("release_year")
//!     .default_field("title")
//!     .build()
//!     .unwrap();
//!
//! let parsed = parse("genres:horror OR release_year:>=2000", &registry).unwrap();
//! let (first, occurrence) = &parsed.ast.clauses()[0];
//! assert_eq!(first, &Clause::field("genres", ValueSpec::text("horror")));
//! assert_eq!(*occurrence, Occurrence::Must);
//! ```

#![warn(missing_docs)]

mod ast;
mod clause;
mod error;
mod lexer;
mod parser;
mod schema;
mod value;

pub use ast::{Clause, Occurrence, QueryAst};
pub use clause::build_clause;
pub use error::{QueryError, QueryErrorKind, QueryWarning};
pub use lexer::{Connective, Token, TokenKind, tokenize};
pub use parser::{ParsedQuery, QueryParser, parse};
pub use schema::{FieldKind, FieldSchemaBuilder, FieldSchemaRegistry, NumericType, SchemaError};
pub use value::{Literal, Number, Operator, ValueError, ValueSpec, interpret};
