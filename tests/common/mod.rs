//! Shared test utilities for integration and E2E tests.
//!
//! Provides a fixture builder for on-disk skeleton repositories and a
//! helper to write a config file pointing at them, so tests never touch
//! the user's real configuration or the network.

use std::fs;
use std::path::{Path, PathBuf};

use assert_fs::TempDir;

/// Re-export commonly used test dependencies for convenience.
#[allow(unused_imports)]
pub mod prelude {
    pub use assert_cmd::Command;
    pub use assert_fs::prelude::*;
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    pub use super::{write_config, SkeletonRepoFixture};
}

/// A temporary skeleton repository on disk.
///
/// The layout matches what the loader expects: a `skeletons/` directory
/// with one subdirectory per skeleton.
pub struct SkeletonRepoFixture {
    temp: TempDir,
}

#[allow(dead_code)]
impl SkeletonRepoFixture {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Locator string resolving to this repository.
    pub fn locator(&self) -> String {
        self.temp.path().to_string_lossy().into_owned()
    }

    /// Ensure a skeleton directory exists.
    pub fn skeleton(&self, name: &str) -> &Self {
        fs::create_dir_all(self.skeleton_dir(name)).unwrap();
        self
    }

    /// Add a file to a skeleton. Parent directories are created as needed.
    pub fn file(&self, skeleton: &str, path: &str, content: &str) -> &Self {
        let full = self.skeleton_dir(skeleton).join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
        self
    }

    /// Write a skeleton's `.skelly.yaml` values declaration.
    pub fn values(&self, skeleton: &str, yaml: &str) -> &Self {
        self.file(skeleton, ".skelly.yaml", yaml)
    }

    fn skeleton_dir(&self, name: &str) -> PathBuf {
        self.temp.path().join("skeletons").join(name)
    }
}

/// Write a skelly config file into `dir` configuring the given
/// repositories and a default owner, and return its path.
#[allow(dead_code)]
pub fn write_config(dir: &Path, owner: &str, repositories: &[(&str, &str)]) -> PathBuf {
    let mut contents = format!("project:\n  owner: {owner}\nrepositories:\n");
    for (name, locator) in repositories {
        contents.push_str(&format!("  {name}: {locator}\n"));
    }

    let path = dir.join("config.yaml");
    fs::write(&path, contents).unwrap();
    path
}
