//! # Skeleton Composition
//!
//! Multiple skeletons can be composed into one logical skeleton. The merge
//! is last-wins and order-sensitive: values deep-merge left-to-right
//! through [`crate::template::merge_values`], and file trees overlay by
//! relative path. A later skeleton's entry replaces an earlier one **in
//! place**, so the materialization order is the order each path was first
//! introduced, not the order of the last override.
//!
//! Re-declaring a directory is a no-op; declaring the same path as a file
//! in one skeleton and a directory in another is a structural error.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::skeleton::{FileEntry, Skeleton};
use crate::template::{merge_values, Values};

/// Result of composing one or more skeletons. The source repository is no
/// longer meaningful here since composition may span repositories.
#[derive(Debug, Clone)]
pub struct MergedSkeleton {
    pub values: Values,
    pub files: Vec<FileEntry>,
}

/// Merge skeletons in the given order into one logical skeleton.
pub fn merge_skeletons(skeletons: &[Skeleton]) -> Result<MergedSkeleton> {
    if skeletons.is_empty() {
        return Err(Error::EmptyMerge);
    }

    let mut values = Values::new();
    let mut files: Vec<FileEntry> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for skeleton in skeletons {
        merge_values(&mut values, &skeleton.values);

        for entry in &skeleton.files {
            match index.get(&entry.relative_path) {
                Some(&position) => {
                    if files[position].is_dir != entry.is_dir {
                        return Err(Error::FileTypeConflict {
                            path: entry.relative_path.clone(),
                        });
                    }
                    // Directories are identity on re-declaration; files are
                    // replaced at their original position.
                    if !entry.is_dir {
                        files[position] = entry.clone();
                    }
                }
                None => {
                    index.insert(entry.relative_path.clone(), files.len());
                    files.push(entry.clone());
                }
            }
        }
    }

    Ok(MergedSkeleton { values, files })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporef::RepoRef;
    use crate::template::parse_values;
    use std::path::PathBuf;

    fn file_entry(relative_path: &str, source: &str) -> FileEntry {
        FileEntry {
            relative_path: relative_path.to_string(),
            source_path: PathBuf::from(source),
            is_dir: false,
            is_template: false,
            mode: 0o644,
        }
    }

    fn dir_entry(relative_path: &str) -> FileEntry {
        FileEntry {
            relative_path: relative_path.to_string(),
            source_path: PathBuf::from(format!("/src/{relative_path}")),
            is_dir: true,
            is_template: false,
            mode: 0o755,
        }
    }

    fn skeleton(name: &str, values: &str, files: Vec<FileEntry>) -> Skeleton {
        Skeleton {
            name: name.to_string(),
            repo_ref: RepoRef {
                name: "default".to_string(),
                url: String::new(),
                path: PathBuf::from("/repo"),
                revision: None,
            },
            values: parse_values(values).unwrap(),
            files,
        }
    }

    #[test]
    fn test_merge_empty_sequence_fails() {
        assert!(matches!(merge_skeletons(&[]), Err(Error::EmptyMerge)));
    }

    #[test]
    fn test_merge_values_order_sensitivity() {
        let a = skeleton("a", "key: 1", vec![]);
        let b = skeleton("b", "key: 2", vec![]);

        let ab = merge_skeletons(&[a.clone(), b.clone()]).unwrap();
        assert_eq!(ab.values, parse_values("key: 2").unwrap());

        let ba = merge_skeletons(&[b, a]).unwrap();
        assert_eq!(ba.values, parse_values("key: 1").unwrap());
    }

    #[test]
    fn test_merge_values_deep_combine() {
        let a = skeleton("a", "a:\n  x: 1", vec![]);
        let b = skeleton("b", "a:\n  y: 2", vec![]);

        let merged = merge_skeletons(&[a, b]).unwrap();
        assert_eq!(merged.values, parse_values("a:\n  x: 1\n  y: 2").unwrap());
    }

    #[test]
    fn test_file_overlay_last_wins_at_first_position() {
        let a = skeleton(
            "a",
            "",
            vec![
                file_entry("README.md", "/a/README.md"),
                file_entry("a-only.txt", "/a/a-only.txt"),
            ],
        );
        let b = skeleton(
            "b",
            "",
            vec![
                file_entry("b-only.txt", "/b/b-only.txt"),
                file_entry("README.md", "/b/README.md"),
            ],
        );

        let merged = merge_skeletons(&[a, b]).unwrap();
        let paths: Vec<&str> = merged
            .files
            .iter()
            .map(|entry| entry.relative_path.as_str())
            .collect();

        // README.md keeps the position skeleton a introduced it at, but
        // carries skeleton b's source.
        assert_eq!(paths, vec!["README.md", "a-only.txt", "b-only.txt"]);
        assert_eq!(merged.files[0].source_path, PathBuf::from("/b/README.md"));
    }

    #[test]
    fn test_directory_redeclaration_is_identity() {
        let a = skeleton("a", "", vec![dir_entry("src")]);
        let b = skeleton("b", "", vec![dir_entry("src")]);

        let merged = merge_skeletons(&[a, b]).unwrap();
        assert_eq!(merged.files.len(), 1);
        assert!(merged.files[0].is_dir);
    }

    #[test]
    fn test_type_conflict_fails() {
        let a = skeleton("a", "", vec![dir_entry("src")]);
        let b = skeleton("b", "", vec![file_entry("src", "/b/src")]);

        let err = merge_skeletons(&[a, b]).unwrap_err();
        match err {
            Error::FileTypeConflict { path } => assert_eq!(path, "src"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_single_skeleton_passes_through() {
        let a = skeleton("a", "key: 1", vec![file_entry("x", "/a/x")]);
        let merged = merge_skeletons(std::slice::from_ref(&a)).unwrap();

        assert_eq!(merged.values, a.values);
        assert_eq!(merged.files, a.files);
    }
}
