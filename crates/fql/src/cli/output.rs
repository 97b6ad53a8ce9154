//! Rendering and JSON serialization for CLI output.

use std::process::ExitCode;

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use fql_query::{FieldSchemaRegistry, ParsedQuery, QueryAst, QueryWarning};
use serde::Serialize;

/// JSON output for `fql parse --json`.
#[derive(Serialize)]
struct JsonParseOutput<'a> {
    /// The query as given.
    query: &'a str,
    /// The canonical form of the query.
    canonical: String,
    /// Clauses with their occurrences.
    clauses: &'a QueryAst,
    /// Non-fatal problems.
    warnings: Vec<JsonWarning>,
}

/// A warning in JSON output.
#[derive(Serialize)]
struct JsonWarning {
    /// Human-readable message.
    message: String,
    /// Byte offset into the query.
    position: usize,
}

impl From<&QueryWarning> for JsonWarning {
    fn from(warning: &QueryWarning) -> Self {
        Self {
            message: warning.to_string(),
            position: warning.position(),
        }
    }
}

/// Prints a parsed query as JSON.
pub fn print_json(query: &str, parsed: &ParsedQuery) -> ExitCode {
    let output = JsonParseOutput {
        query,
        canonical: parsed.ast.to_query_string(),
        clauses: &parsed.ast,
        warnings: parsed.warnings.iter().map(JsonWarning::from).collect(),
    };
    match serde_json::to_string_pretty(&output) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Prints a parsed query as an indented tree followed by its canonical form.
pub fn print_tree(parsed: &ParsedQuery, registry: &FieldSchemaRegistry) {
    if parsed.ast.is_empty() {
        println!("(empty query)");
        return;
    }

    for (clause, occurrence) in &parsed.ast {
        let target = clause.target_fields(registry).join(", ");
        println!("{occurrence} {}", clause.to_query_string());
        println!("  fields: {target}");
        println!("  value:  {:?}", clause.value());
    }
    println!();
    println!("canonical: {}", parsed.ast.to_query_string());
}

/// Prints query warnings to stderr.
pub fn print_warnings(warnings: &[QueryWarning]) {
    for warning in warnings {
        eprintln!("warning: {warning} (at byte {})", warning.position());
    }
}

/// Builds the schema table: one row per field with its kind and default-field priority.
pub fn schema_table(registry: &FieldSchemaRegistry) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Field", "Kind", "Default"]);

    for (name, kind) in registry.fields() {
        let priority = registry
            .default_fields()
            .iter()
            .position(|field| field == name)
            .map_or_else(String::new, |idx| (idx + 1).to_string());
        table.add_row(vec![Cell::new(name), Cell::new(kind.to_string()), Cell::new(priority)]);
    }

    table
}
