//! Clap argument definitions for the `fql` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "fql")]
#[command(about = "Filter query language - parse and check field-aware search queries")]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared flag selecting the schema file.
#[derive(Args, Debug, Clone, Default)]
pub struct SchemaArgs {
    /// Read the schema from this file instead of discovering .fql.toml
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Arguments for `fql parse`.
#[derive(Args, Debug, Clone)]
pub struct ParseCommand {
    /// Query to parse
    #[arg(allow_hyphen_values = true)]
    pub query: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    /// Schema selection.
    pub schema: SchemaArgs,
}

/// Arguments for `fql init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `fql` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Parse a query and print its clauses
    Parse(ParseCommand),

    /// Show the effective field schema
    Schema(SchemaArgs),

    /// Validate the field schema and report issues
    Check(SchemaArgs),

    /// Write a .fql.toml schema in the current directory
    Init(InitCommand),
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_accepts_leading_connective() {
        let cli = Cli::try_parse_from(["fql", "parse", "NOT horror"]).unwrap();
        let Commands::Parse(cmd) = cli.command else {
            panic!("expected parse command");
        };
        assert_eq!(cmd.query, "NOT horror");
        assert!(!cmd.json);
        assert!(cmd.schema.config.is_none());
    }

    #[test]
    fn schema_accepts_config_path() {
        let cli = Cli::try_parse_from(["fql", "schema", "--config", "catalog.toml"]).unwrap();
        let Commands::Schema(args) = cli.command else {
            panic!("expected schema command");
        };
        assert_eq!(args.config, Some(PathBuf::from("catalog.toml")));
    }
}
