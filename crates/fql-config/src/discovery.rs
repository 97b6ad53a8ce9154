//! Schema layer discovery.
//!
//! Every directory from the working directory up to the filesystem root may hold a
//! `.fql.toml`. Each one found is parsed as it is reached, so the `root` flag that ends the
//! walk is read from the same parse the merge later uses.

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use tracing::debug;

use crate::{ConfigError, parse::SchemaLayer};

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".fql.toml";

/// Collects the schema layers that apply to `cwd`, closest first.
///
/// A layer with `root = true` is the last one taken and suppresses `~/.fql.toml`.
/// Otherwise the global file, when present and not already on the walk, is appended as the
/// lowest-precedence layer. A layer that cannot be read or parsed fails the whole discovery.
pub fn discover_layers(cwd: &Path) -> Result<Vec<SchemaLayer>, ConfigError> {
    let mut layers = Vec::new();

    for dir in cwd.ancestors() {
        let path = dir.join(CONFIG_FILENAME);
        if !path.is_file() {
            continue;
        }
        let layer = SchemaLayer::read(&path, false)?;
        let root = layer.is_root();
        debug!(path = %path.display(), fields = layer.field_count(), root, "found schema layer");
        layers.push(layer);
        if root {
            return Ok(layers);
        }
    }

    if let Some(global) = global_config_path().filter(|path| path.is_file())
        && !layers.iter().any(|layer| layer.path == global)
    {
        let layer = SchemaLayer::read(&global, true)?;
        debug!(path = %global.display(), fields = layer.field_count(), "found global schema layer");
        layers.push(layer);
    }

    Ok(layers)
}

/// Returns the path to the global configuration file (`~/.fql.toml`).
///
/// Returns `None` if the home directory cannot be determined.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}
