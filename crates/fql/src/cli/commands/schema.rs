//! Implementation of `fql schema`.

use std::process::ExitCode;

use crate::cli::{args::SchemaArgs, context::CommandContext, output::schema_table};

/// Shows the effective field schema.
pub fn run(ctx: &CommandContext, args: &SchemaArgs) -> ExitCode {
    let schema = match ctx.schema(args) {
        Ok(schema) => schema,
        Err(code) => return code,
    };

    if schema.is_builtin() {
        println!("Schema: built-in default");
    } else {
        println!("Schema files (highest precedence first):");
        for path in &schema.sources {
            println!("  {}", path.display());
        }
    }
    println!();
    println!("{}", schema_table(&schema.registry));

    for warning in &schema.warnings {
        eprintln!("warning: {warning}");
    }

    ExitCode::SUCCESS
}

