//! # Skeleton Loading
//!
//! A skeleton is a named template project inside a skeleton repository: a
//! file tree plus an optional declaration of default values. The loader
//! reads both into an in-memory [`Skeleton`] descriptor.
//!
//! File entries are produced in lexical path order with forward-slash
//! relative paths, which is what makes merge and materialization
//! reproducible across platforms. Files named with the `.skel` suffix are
//! flagged as templates and the suffix is stripped from the path they
//! materialize to: `README.md.skel` renders to `README.md`.

use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::path::to_slash;
use crate::reporef::RepoRef;
use crate::template::{self, Values};

/// Name of the file declaring a skeleton's default values. Optional;
/// absence means empty values.
pub const VALUES_FILE: &str = ".skelly.yaml";

/// Filename suffix marking a file as a template to be rendered rather
/// than copied verbatim.
pub const TEMPLATE_SUFFIX: &str = ".skel";

#[cfg(not(unix))]
const DEFAULT_FILE_MODE: u32 = 0o644;
#[cfg(not(unix))]
const DEFAULT_DIR_MODE: u32 = 0o755;

/// One directory or file of a skeleton's tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path relative to the skeleton root, forward-slash separated, with
    /// the template suffix already stripped.
    pub relative_path: String,
    /// Absolute path of the source file inside the repository.
    pub source_path: PathBuf,
    pub is_dir: bool,
    pub is_template: bool,
    /// Unix permission bits of the source.
    pub mode: u32,
}

/// In-memory descriptor of a loaded skeleton.
#[derive(Debug, Clone)]
pub struct Skeleton {
    /// Name the skeleton was requested under.
    pub name: String,
    /// Repository the skeleton was loaded from.
    pub repo_ref: RepoRef,
    /// Declared default values.
    pub values: Values,
    /// File entries in lexical path order.
    pub files: Vec<FileEntry>,
}

/// Load the skeleton rooted at `dir` into a descriptor.
pub fn load(repo_ref: &RepoRef, dir: &Path, name: &str) -> Result<Skeleton> {
    let values = load_values_file(&dir.join(VALUES_FILE))?;
    let files = walk(dir)?;

    debug!(
        "loaded skeleton {:?} from {} ({} entries)",
        name,
        dir.display(),
        files.len()
    );

    Ok(Skeleton {
        name: name.to_string(),
        repo_ref: repo_ref.clone(),
        values,
        files,
    })
}

fn load_values_file(path: &Path) -> Result<Values> {
    if !path.exists() {
        return Ok(Values::new());
    }

    let raw = std::fs::read_to_string(path).map_err(|err| Error::SkeletonLoad {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;

    template::parse_values(&raw).map_err(|err| Error::SkeletonLoad {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

fn walk(dir: &Path) -> Result<Vec<FileEntry>> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|err| Error::SkeletonLoad {
            path: dir.to_path_buf(),
            message: err.to_string(),
        })?;

        let relative = entry
            .path()
            .strip_prefix(dir)
            .map_err(|err| Error::SkeletonLoad {
                path: dir.to_path_buf(),
                message: err.to_string(),
            })?;

        // The values declaration describes the skeleton, it is not part of
        // the materialized tree.
        if relative == Path::new(VALUES_FILE) {
            continue;
        }

        let is_dir = entry.file_type().is_dir();
        let mut relative_path = to_slash(relative);

        let mut is_template = false;
        if !is_dir {
            if let Some(stripped) = relative_path.strip_suffix(TEMPLATE_SUFFIX) {
                if !stripped.is_empty() && !stripped.ends_with('/') {
                    relative_path = stripped.to_string();
                    is_template = true;
                }
            }
        }

        entries.push(FileEntry {
            relative_path,
            source_path: entry.path().to_path_buf(),
            is_dir,
            is_template,
            mode: entry_mode(&entry, is_dir)?,
        });
    }

    Ok(entries)
}

#[cfg(unix)]
fn entry_mode(entry: &walkdir::DirEntry, _is_dir: bool) -> Result<u32> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = entry.metadata().map_err(|err| Error::SkeletonLoad {
        path: entry.path().to_path_buf(),
        message: err.to_string(),
    })?;

    Ok(metadata.permissions().mode() & 0o777)
}

#[cfg(not(unix))]
fn entry_mode(_entry: &walkdir::DirEntry, is_dir: bool) -> Result<u32> {
    Ok(if is_dir { DEFAULT_DIR_MODE } else { DEFAULT_FILE_MODE })
}

/// Scaffold a new skeleton at `dir`: a values declaration and a templated
/// README to start from. Fails if `dir` already exists.
pub fn create(dir: &Path) -> Result<()> {
    if dir.exists() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("skeleton directory {} already exists", dir.display()),
        )));
    }

    std::fs::create_dir_all(dir)?;

    std::fs::write(
        dir.join(VALUES_FILE),
        "# Default values available to templates as {{values.<key>}}.\n",
    )?;

    std::fs::write(
        dir.join(format!("README.md{}", TEMPLATE_SUFFIX)),
        "# {{project.name}}\n",
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn repo_ref() -> RepoRef {
        RepoRef {
            name: "default".to_string(),
            url: String::new(),
            path: PathBuf::from("/tmp/repo"),
            revision: None,
        }
    }

    fn write(dir: &Path, path: &str, content: &str) {
        let full = dir.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }

    #[test]
    fn test_load_walks_in_lexical_order() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "b.txt", "b");
        write(temp.path(), "a/nested.txt", "n");
        write(temp.path(), "a.txt", "a");

        let skeleton = load(&repo_ref(), temp.path(), "demo").unwrap();
        let paths: Vec<&str> = skeleton
            .files
            .iter()
            .map(|entry| entry.relative_path.as_str())
            .collect();

        assert_eq!(paths, vec!["a", "a/nested.txt", "a.txt", "b.txt"]);
    }

    #[test]
    fn test_load_reads_values_file_and_excludes_it() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), VALUES_FILE, "language: rust\n");
        write(temp.path(), "README.md", "# readme");

        let skeleton = load(&repo_ref(), temp.path(), "demo").unwrap();

        assert_eq!(
            skeleton.values,
            template::parse_values("language: rust").unwrap()
        );
        let paths: Vec<&str> = skeleton
            .files
            .iter()
            .map(|entry| entry.relative_path.as_str())
            .collect();
        assert_eq!(paths, vec!["README.md"]);
    }

    #[test]
    fn test_load_missing_values_file_is_empty_values() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "file.txt", "x");

        let skeleton = load(&repo_ref(), temp.path(), "demo").unwrap();
        assert!(skeleton.values.is_empty());
    }

    #[test]
    fn test_load_malformed_values_file_fails() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), VALUES_FILE, "invalid: [unclosed");

        let err = load(&repo_ref(), temp.path(), "demo").unwrap_err();
        assert!(matches!(err, Error::SkeletonLoad { .. }));
    }

    #[test]
    fn test_template_suffix_is_stripped_and_flagged() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "README.md.skel", "# {{project.name}}");
        write(temp.path(), "plain.txt", "plain");

        let skeleton = load(&repo_ref(), temp.path(), "demo").unwrap();

        let readme = skeleton
            .files
            .iter()
            .find(|entry| entry.relative_path == "README.md")
            .unwrap();
        assert!(readme.is_template);
        assert!(readme.source_path.ends_with("README.md.skel"));

        let plain = skeleton
            .files
            .iter()
            .find(|entry| entry.relative_path == "plain.txt")
            .unwrap();
        assert!(!plain.is_template);
    }

    #[test]
    fn test_directories_become_entries() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "src/main.rs", "fn main() {}");

        let skeleton = load(&repo_ref(), temp.path(), "demo").unwrap();
        let src = skeleton
            .files
            .iter()
            .find(|entry| entry.relative_path == "src")
            .unwrap();
        assert!(src.is_dir);
        assert!(!src.is_template);
    }

    #[test]
    fn test_create_scaffolds_skeleton() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("default");

        create(&dir).unwrap();

        assert!(dir.join(VALUES_FILE).exists());
        assert!(dir.join("README.md.skel").exists());

        // A second create must not clobber the existing skeleton.
        assert!(create(&dir).is_err());
    }
}
