//! Implementation of `fql check`.

use std::process::ExitCode;

use fql_config::SchemaWarning;

use crate::cli::{args::SchemaArgs, context::CommandContext};

/// Exit codes for `fql check`.
mod exit_codes {
    use std::process::ExitCode;

    /// Schema is valid with no warnings.
    pub const OK: ExitCode = ExitCode::SUCCESS;
    /// Schema has warnings but is usable.
    pub const WARNINGS: ExitCode = ExitCode::FAILURE;
}

/// Loads and validates the schema, reporting any issues.
pub fn run(ctx: &CommandContext, args: &SchemaArgs) -> ExitCode {
    println!("Checking schema...");
    println!();

    let schema = match ctx.schema(args) {
        Ok(schema) => schema,
        Err(code) => return code,
    };

    if schema.is_builtin() {
        println!("No schema files found, using the built-in default.");
        println!();
        println!("Run 'fql init' to create a schema file.");
    } else {
        println!("Schema files:");
        for path in &schema.sources {
            println!("  {}", path.display());
        }
    }
    println!();

    let registry = &schema.registry;
    println!(
        "Fields: {} ({} default: {})",
        registry.len(),
        registry.default_fields().len(),
        registry.default_fields().join(", ")
    );
    println!();

    if schema.warnings.is_empty() {
        println!("No issues found.");
        return exit_codes::OK;
    }

    println!("Warnings ({}):", schema.warnings.len());
    for warning in &schema.warnings {
        println!("  - {warning}");
    }
    println!();

    print_hints(&schema.warnings);

    exit_codes::WARNINGS
}

/// Prints hints for resolving common warnings.
fn print_hints(warnings: &[SchemaWarning]) {
    let mut hints: Vec<&str> = warnings
        .iter()
        .map(|warning| match warning {
            SchemaWarning::UndeclaredDefaultField { .. } => {
                "Declare every default field in [fields] with type \"text\"."
            }
            SchemaWarning::DuplicateDefaultField { .. } => {
                "Remove repeated names from default_fields."
            }
        })
        .collect();

    hints.sort_unstable();
    hints.dedup();

    println!("Hints:");
    for hint in hints {
        println!("  - {hint}");
    }
}
