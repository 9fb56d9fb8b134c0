//! # Project Materialization
//!
//! The materializer walks a merged skeleton's file entries in order and
//! writes them into the output directory under an explicit, deterministic
//! conflict policy. Per path the policy rules are evaluated top to bottom:
//!
//! 1. skip-pattern match (path or ancestor) — never touched,
//! 2. target missing — create,
//! 3. overwrite-pattern match — overwrite,
//! 4. global overwrite flag — overwrite,
//! 5. default — skip the existing file.
//!
//! Template entries are rendered against the merged value namespace;
//! rendering failures abort the whole walk. A configured license or
//! gitignore template is materialized through the exact same rules after
//! the tree, superseding skeleton-provided files of the same name.
//!
//! The walk is fail-fast and non-transactional: the first unexpected error
//! is returned as-is, files written before it remain in place and no
//! result report is produced.

use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::path::Path;

use log::debug;

use crate::error::Result;
use crate::filesystem::Filesystem;
use crate::gitignore::GitignoreTemplate;
use crate::license::License;
use crate::merge::MergedSkeleton;
use crate::path::matches_path_or_ancestor;
use crate::template::{merge_values, ProjectInfo, Renderer, Values};

/// Relative path the synthesized license materializes to.
pub const LICENSE_FILE: &str = "LICENSE";

/// Relative path the synthesized gitignore template materializes to.
pub const GITIGNORE_FILE: &str = ".gitignore";

const SYNTHESIZED_FILE_MODE: u32 = 0o644;

/// What happened to one path during materialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// The path did not exist and was written.
    Create,
    /// The path existed and was overwritten due to the global flag.
    Overwrite,
    /// The path existed and matched an overwrite pattern.
    OverwriteFile,
    /// The path matched a skip pattern and was never touched.
    Skip,
    /// The path existed and was left alone.
    SkipExisting,
}

impl Action {
    fn writes(self) -> bool {
        matches!(self, Action::Create | Action::Overwrite | Action::OverwriteFile)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::Create => "create",
            Action::Overwrite | Action::OverwriteFile => "overwrite",
            Action::Skip => "skip",
            Action::SkipExisting => "skip (exists)",
        };
        f.write_str(label)
    }
}

/// Options for one materialization call. Created fresh per invocation.
pub struct CreateConfig<'a> {
    pub project: ProjectInfo,
    /// Overwrite any existing file.
    pub overwrite: bool,
    /// Patterns of files to overwrite even without the global flag.
    pub overwrite_files: Vec<String>,
    /// Patterns of files to never write.
    pub skip_files: Vec<String>,
    /// Value overrides layered over the skeleton's values.
    pub values: Values,
    /// Synthesized `LICENSE` content.
    pub license: Option<License>,
    /// Synthesized `.gitignore` content.
    pub gitignore: Option<GitignoreTemplate>,
    /// Write surface; swap in a [`crate::filesystem::MemoryFs`] for a dry
    /// run.
    pub filesystem: &'a mut dyn Filesystem,
    /// Sink for human-readable per-path progress lines.
    pub output: &'a mut dyn Write,
}

/// One walked path and the action taken for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionEntry {
    pub path: String,
    pub action: Action,
}

/// Outcome report of a materialization, built incrementally during the
/// walk and immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct CreateResult {
    /// Number of paths per action kind.
    pub stats: HashMap<Action, usize>,
    /// Every walked path with its action, in walk order.
    pub entries: Vec<ActionEntry>,
}

impl CreateResult {
    pub fn count(&self, action: Action) -> usize {
        self.stats.get(&action).copied().unwrap_or(0)
    }
}

/// Materialize a merged skeleton into `output_dir`.
pub fn create(
    skeleton: &MergedSkeleton,
    output_dir: &Path,
    config: CreateConfig<'_>,
) -> Result<CreateResult> {
    let CreateConfig {
        project,
        overwrite,
        overwrite_files,
        skip_files,
        values,
        license,
        gitignore,
        filesystem,
        output,
    } = config;

    // Config-level values take precedence over the skeleton's own.
    let mut merged_values = skeleton.values.clone();
    merge_values(&mut merged_values, &values);

    let mut walk = Walk {
        output_dir,
        overwrite,
        overwrite_files: &overwrite_files,
        skip_files: &skip_files,
        renderer: Renderer::new(&project, &merged_values),
        filesystem,
        output,
        result: CreateResult::default(),
    };

    debug!(
        "materializing {} entries into {}",
        skeleton.files.len(),
        output_dir.display()
    );

    walk.filesystem.create_dir_all(output_dir)?;

    for entry in &skeleton.files {
        // A skeleton-provided LICENSE or .gitignore is superseded by the
        // synthesized one materialized below.
        if !entry.is_dir
            && ((license.is_some() && entry.relative_path == LICENSE_FILE)
                || (gitignore.is_some() && entry.relative_path == GITIGNORE_FILE))
        {
            continue;
        }

        if entry.is_dir {
            walk.process_dir(&entry.relative_path)?;
        } else {
            let content = if entry.is_template {
                Content::Template(&entry.source_path)
            } else {
                Content::Raw(&entry.source_path)
            };
            walk.process_file(&entry.relative_path, content, entry.mode)?;
        }
    }

    if let Some(license) = &license {
        walk.process_file(
            LICENSE_FILE,
            Content::Literal(&license.body),
            SYNTHESIZED_FILE_MODE,
        )?;
    }

    if let Some(gitignore) = &gitignore {
        walk.process_file(
            GITIGNORE_FILE,
            Content::Literal(&gitignore.content),
            SYNTHESIZED_FILE_MODE,
        )?;
    }

    Ok(walk.result)
}

enum Content<'a> {
    /// Copy bytes verbatim from the source file.
    Raw(&'a Path),
    /// Render the source file as a template.
    Template(&'a Path),
    /// Synthesized content written as-is.
    Literal(&'a str),
}

struct Walk<'a> {
    output_dir: &'a Path,
    overwrite: bool,
    overwrite_files: &'a [String],
    skip_files: &'a [String],
    renderer: Renderer,
    filesystem: &'a mut dyn Filesystem,
    output: &'a mut dyn Write,
    result: CreateResult,
}

impl Walk<'_> {
    fn process_dir(&mut self, relative_path: &str) -> Result<()> {
        if matches_path_or_ancestor(self.skip_files, relative_path)? {
            return self.record(relative_path, Action::Skip);
        }

        let target = self.output_dir.join(relative_path);
        if !self.filesystem.exists(&target) {
            self.filesystem.create_dir_all(&target)?;
            return self.record(relative_path, Action::Create);
        }

        // Pre-existing directories do not show up in the report.
        Ok(())
    }

    fn process_file(&mut self, relative_path: &str, content: Content<'_>, mode: u32) -> Result<()> {
        if matches_path_or_ancestor(self.skip_files, relative_path)? {
            return self.record(relative_path, Action::Skip);
        }

        let target = self.output_dir.join(relative_path);
        let action = self.decide(&target, relative_path)?;

        if action.writes() {
            if let Some(parent) = target.parent() {
                self.filesystem.create_dir_all(parent)?;
            }

            let bytes = match content {
                Content::Raw(source) => std::fs::read(source)?,
                Content::Template(source) => {
                    let raw = std::fs::read_to_string(source)?;
                    self.renderer.render(relative_path, &raw)?.into_bytes()
                }
                Content::Literal(text) => text.as_bytes().to_vec(),
            };

            self.filesystem.write(&target, &bytes, mode)?;
        }

        self.record(relative_path, action)
    }

    /// Ordered policy evaluation; the first matching rule decides.
    fn decide(&self, target: &Path, relative_path: &str) -> Result<Action> {
        if !self.filesystem.exists(target) {
            return Ok(Action::Create);
        }
        if matches_path_or_ancestor(self.overwrite_files, relative_path)? {
            return Ok(Action::OverwriteFile);
        }
        if self.overwrite {
            return Ok(Action::Overwrite);
        }
        Ok(Action::SkipExisting)
    }

    fn record(&mut self, path: &str, action: Action) -> Result<()> {
        writeln!(self.output, "{} {}", action, path)?;

        *self.result.stats.entry(action).or_insert(0) += 1;
        self.result.entries.push(ActionEntry {
            path: path.to_string(),
            action,
        });

        Ok(())
    }
}
