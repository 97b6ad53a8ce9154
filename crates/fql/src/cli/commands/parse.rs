//! Implementation of `fql parse`.

use std::process::ExitCode;

use fql_query::QueryParser;

use crate::cli::{
    args::ParseCommand,
    context::CommandContext,
    output::{print_json, print_tree, print_warnings},
};

/// Parses a query against the effective schema and prints the clauses.
pub fn run(ctx: &CommandContext, cmd: &ParseCommand) -> ExitCode {
    let schema = match ctx.schema(&cmd.schema) {
        Ok(schema) => schema,
        Err(code) => return code,
    };

    let parser = QueryParser::new(&schema.registry);
    let parsed = match parser.parse(&cmd.query) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    print_warnings(&parsed.warnings);

    if cmd.json {
        print_json(&cmd.query, &parsed)
    } else {
        print_tree(&parsed, parser.registry());
        ExitCode::SUCCESS
    }
}
