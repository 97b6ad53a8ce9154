//! Shared context for running CLI commands.

use std::{env, path::PathBuf, process::ExitCode};

use fql_config::Schema;

use crate::cli::args::SchemaArgs;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
}

impl CommandContext {
    /// Loads the current directory.
    pub fn load() -> Result<Self, ExitCode> {
        let cwd = env::current_dir().map_err(|e| {
            eprintln!("error: could not determine current directory: {e}");
            ExitCode::FAILURE
        })?;
        Ok(Self { cwd })
    }

    /// Loads the schema from `--config` if given, otherwise by discovery from the working
    /// directory.
    pub fn schema(&self, args: &SchemaArgs) -> Result<Schema, ExitCode> {
        let loaded = match &args.config {
            Some(path) => Schema::load_from_files(&[self.cwd.join(path)]),
            None => Schema::load(&self.cwd),
        };
        loaded.map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        })
    }
}
