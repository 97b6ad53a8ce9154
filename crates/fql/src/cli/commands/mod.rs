//! Command implementations and dispatch.

pub mod check;
pub mod init;
pub mod parse;
pub mod schema;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Parse(cmd) => parse::run(ctx, &cmd),
        Commands::Schema(args) => schema::run(ctx, &args),
        Commands::Check(args) => check::run(ctx, &args),
        Commands::Init(cmd) => init::run(ctx, &cmd),
    }
}
