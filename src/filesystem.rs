//! # Filesystem Abstraction
//!
//! Materialization writes through the [`Filesystem`] trait instead of
//! touching the host filesystem directly. Two implementations exist:
//!
//! - [`DiskFs`] writes for real, applying file modes on Unix.
//! - [`MemoryFs`] keeps everything in memory, which is what `--dry-run`
//!   swaps in: the walk behaves identically but the host filesystem is
//!   never read or written.
//!
//! The surface is swapped wholesale per materialization call and never
//! mid-walk.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

/// Abstract read/write surface used by the materializer.
pub trait Filesystem {
    /// Check whether a file or directory exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Create a directory and all missing ancestors. Idempotent.
    fn create_dir_all(&mut self, path: &Path) -> io::Result<()>;

    /// Write a file, replacing any previous content. `mode` carries the
    /// Unix permission bits of the source file.
    fn write(&mut self, path: &Path, content: &[u8], mode: u32) -> io::Result<()>;
}

/// The host filesystem.
#[derive(Debug, Default)]
pub struct DiskFs;

impl Filesystem for DiskFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&mut self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn write(&mut self, path: &Path, content: &[u8], mode: u32) -> io::Result<()> {
        std::fs::write(path, content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))?;
        }
        #[cfg(not(unix))]
        let _ = mode;

        Ok(())
    }
}

/// A file held by [`MemoryFs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub content: Vec<u8>,
    pub mode: u32,
}

/// In-memory filesystem used for dry runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    files: HashMap<PathBuf, File>,
    dirs: HashSet<PathBuf>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a file by path.
    pub fn file(&self, path: impl AsRef<Path>) -> Option<&File> {
        self.files.get(path.as_ref())
    }

    /// Get a file's content as UTF-8, if present.
    pub fn file_string(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files
            .get(path.as_ref())
            .map(|file| String::from_utf8_lossy(&file.content).into_owned())
    }

    /// Check whether `path` was created as a directory.
    pub fn is_dir(&self, path: impl AsRef<Path>) -> bool {
        self.dirs.contains(path.as_ref())
    }

    /// Number of files (directories excluded).
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Filesystem for MemoryFs {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.dirs.contains(path)
    }

    fn create_dir_all(&mut self, path: &Path) -> io::Result<()> {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.dirs.insert(current.clone());
        }
        Ok(())
    }

    fn write(&mut self, path: &Path, content: &[u8], mode: u32) -> io::Result<()> {
        self.files.insert(
            path.to_path_buf(),
            File {
                content: content.to_vec(),
                mode,
            },
        );
        Ok(())
    }
}
