//! Path manipulation utilities for skelly

use std::path::Path;

use glob::Pattern;

use crate::error::Result;

/// Convert a relative path to its forward-slash form.
///
/// Skeleton file entries always use `/` as the separator regardless of
/// platform so that merge and materialization behave identically everywhere.
pub fn to_slash(path: &Path) -> String {
    let parts: Vec<String> = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    parts.join("/")
}

/// Match a relative path against a set of glob patterns, considering the
/// path itself and every ancestor directory of it.
///
/// A pattern that names a directory therefore also covers all files
/// contained in it, which is the contract for `--skip-file` and
/// `--overwrite-file`.
pub fn matches_path_or_ancestor(patterns: &[String], path: &str) -> Result<bool> {
    for raw in patterns {
        let pattern = Pattern::new(raw.trim_end_matches('/'))?;

        let mut current = Some(path);
        while let Some(candidate) = current {
            if pattern.matches(candidate) {
                return Ok(true);
            }
            current = candidate.rsplit_once('/').map(|(parent, _)| parent);
        }
    }

    Ok(false)
}
