//! Query abstract syntax tree.
//!
//! A [`QueryAst`] is a flat, ordered list of clauses, each tagged with the
//! [`Occurrence`] it plays in the combined query. There is no grouping: clause
//! order only matters for debugging output.

use std::{fmt, slice, vec};

use serde::Serialize;

use crate::{schema::FieldSchemaRegistry, value::ValueSpec};

/// The boolean role of a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Occurrence {
    /// The clause must match.
    Must,
    /// The clause should match.
    Should,
    /// The clause must not match.
    MustNot,
}

impl Occurrence {
    /// The connective keyword that produces this occurrence.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Must => "AND",
            Self::Should => "OR",
            Self::MustNot => "NOT",
        }
    }
}

impl fmt::Display for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Must => "Must",
            Self::Should => "Should",
            Self::MustNot => "MustNot",
        };
        f.write_str(name)
    }
}

/// One semantic filter unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Clause {
    /// An explicit `field:value`.
    FieldTerm(String, ValueSpec),
    /// A value with no field, matched against the registry's default fields.
    FreeText(ValueSpec),
}

impl Clause {
    /// Creates a field clause.
    pub fn field(field: impl Into<String>, value: ValueSpec) -> Self {
        Self::FieldTerm(field.into(), value)
    }

    /// Returns the explicit field name, if any.
    pub fn field_name(&self) -> Option<&str> {
        match self {
            Self::FieldTerm(field, _) => Some(field),
            Self::FreeText(_) => None,
        }
    }

    /// Returns the clause's value.
    pub fn value(&self) -> &ValueSpec {
        match self {
            Self::FieldTerm(_, value) | Self::FreeText(value) => value,
        }
    }

    /// The fields this clause is matched against.
    ///
    /// Free text targets every default field, any of which may match.
    pub fn target_fields<'a>(&'a self, registry: &'a FieldSchemaRegistry) -> Vec<&'a str> {
        match self {
            Self::FieldTerm(field, _) => vec![field.as_str()],
            Self::FreeText(_) => registry.default_fields().iter().map(String::as_str).collect(),
        }
    }

    /// Formats the clause in query syntax.
    pub fn to_query_string(&self) -> String {
        match self {
            Self::FieldTerm(field, value) => format!("{field}:{}", value.to_query_string()),
            Self::FreeText(value) => value.to_query_string(),
        }
    }
}

/// An ordered list of clauses with their occurrences.
///
/// Built once per request and consumed by a single backend translator.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct QueryAst {
    /// Clauses in input order.
    clauses: Vec<(Clause, Occurrence)>,
}

impl QueryAst {
    /// Returns the clauses in input order.
    pub fn clauses(&self) -> &[(Clause, Occurrence)] {
        &self.clauses
    }

    /// Iterates over the clauses in input order.
    pub fn iter(&self) -> slice::Iter<'_, (Clause, Occurrence)> {
        self.clauses.iter()
    }

    /// Iterates over the clauses with the given occurrence.
    pub fn with_occurrence(&self, occurrence: Occurrence) -> impl Iterator<Item = &Clause> {
        self.clauses
            .iter()
            .filter(move |(_, occ)| *occ == occurrence)
            .map(|(clause, _)| clause)
    }

    /// Number of clauses.
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Returns true if the query has no clauses.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Formats the AST as a query string that parses back to an equal AST.
    ///
    /// This produces output like: `title:"blade runner" OR genres:scifi NOT horror`
    pub fn to_query_string(&self) -> String {
        let parts: Vec<String> = self
            .clauses
            .iter()
            .map(|(clause, occurrence)| match occurrence {
                Occurrence::Must => clause.to_query_string(),
                other => format!("{} {}", other.keyword(), clause.to_query_string()),
            })
            .collect();
        parts.join(" ")
    }

    /// Formats one clause as a tree node.
    fn fmt_clause(f: &mut fmt::Formatter<'_>, clause: &Clause, occurrence: Occurrence) -> fmt::Result {
        match clause {
            Clause::FieldTerm(field, value) => {
                writeln!(f, "{occurrence} FieldTerm({field:?})")?;
                writeln!(f, "  {value:?}")
            }
            Clause::FreeText(value) => {
                writeln!(f, "{occurrence} FreeText")?;
                writeln!(f, "  {value:?}")
            }
        }
    }
}

impl From<Vec<(Clause, Occurrence)>> for QueryAst {
    fn from(clauses: Vec<(Clause, Occurrence)>) -> Self {
        Self { clauses }
    }
}

impl FromIterator<(Clause, Occurrence)> for QueryAst {
    fn from_iter<I: IntoIterator<Item = (Clause, Occurrence)>>(iter: I) -> Self {
        Self {
            clauses: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for QueryAst {
    type Item = (Clause, Occurrence);
    type IntoIter = vec::IntoIter<(Clause, Occurrence)>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.into_iter()
    }
}

impl<'a> IntoIterator for &'a QueryAst {
    type Item = &'a (Clause, Occurrence);
    type IntoIter = slice::Iter<'a, (Clause, Occurrence)>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.iter()
    }
}

impl fmt::Display for QueryAst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (clause, occurrence) in &self.clauses {
            Self::fmt_clause(f, clause, *occurrence)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Number, Operator};

    fn sample() -> QueryAst {
        QueryAst::from(vec![
            (
                Clause::field("title", ValueSpec::phrase(["blade", "runner"])),
                Occurrence::Must,
            ),
            (Clause::FreeText(ValueSpec::text("horror")), Occurrence::Should),
            (
                Clause::field(
                    "release_year",
                    ValueSpec::Comparison(Operator::Ge, Number::Integer(2000)),
                ),
                Occurrence::MustNot,
            ),
        ])
    }

    fn registry() -> FieldSchemaRegistry {
        FieldSchemaRegistry::builder()
            .default_field("title")
            .default_field("genres")
            .build()
            .unwrap()
    }

    #[test]
    fn query_string() {
        assert_eq!(
            sample().to_query_string(),
            "title:\"blade runner\" OR horror NOT release_year:>=2000"
        );
    }

    #[test]
    fn filter_by_occurrence() {
        let ast = sample();
        let should: Vec<&Clause> = ast.with_occurrence(Occurrence::Should).collect();
        assert_eq!(should, vec![&Clause::FreeText(ValueSpec::text("horror"))]);
        assert_eq!(ast.with_occurrence(Occurrence::Must).count(), 1);
    }

    #[test]
    fn target_fields() {
        let registry = registry();
        let free = Clause::FreeText(ValueSpec::text("x"));
        assert_eq!(free.target_fields(&registry), vec!["title", "genres"]);

        let field = Clause::field("type", ValueSpec::text("movie"));
        assert_eq!(field.target_fields(&registry), vec!["type"]);
        assert_eq!(field.field_name(), Some("type"));
    }

    #[test]
    fn tree_display() {
        let display = sample().to_string();
        assert!(display.starts_with("Must FieldTerm(\"title\")\n"));
        assert!(display.contains("Should FreeText\n"));
        assert!(display.contains("MustNot FieldTerm(\"release_year\")"));
    }

    #[test]
    fn empty_ast() {
        let ast = QueryAst::default();
        assert!(ast.is_empty());
        assert_eq!(ast.to_query_string(), "");
        assert_eq!(ast.to_string(), "");
    }

    #[test]
    fn serializes_as_pairs() {
        let ast = QueryAst::from(vec![(
            Clause::FreeText(ValueSpec::text("dracula")),
            Occurrence::Must,
        )]);
        let json = serde_json::to_value(&ast).unwrap();
        assert_eq!(
            json,
            serde_json::json!([[{"free_text": {"literal": "dracula"}}, "must"]])
        );
    }
}
