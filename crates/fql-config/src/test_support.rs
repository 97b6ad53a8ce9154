//! Temporary directory trees of schema layers for unit tests.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

use crate::discovery::CONFIG_FILENAME;

/// A scratch tree, removed on drop.
pub struct TestDir {
    /// Backing temporary directory.
    root: TempDir,
}

impl TestDir {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    /// The tree's root directory.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Creates `rel_path` under the root and returns it.
    pub fn dir(&self, rel_path: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Writes a `.fql.toml` holding `toml` into `rel_dir` and returns its path.
    pub fn layer(&self, rel_dir: &str, toml: &str) -> PathBuf {
        let path = self.dir(rel_dir).join(CONFIG_FILENAME);
        fs::write(&path, toml).unwrap();
        path
    }
}
