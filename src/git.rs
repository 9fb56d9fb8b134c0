//! # Git Collaborator
//!
//! Version-control mechanics live behind the [`GitClient`] trait so tests
//! can substitute a mock and the rest of the crate never shells out
//! directly. The default implementation, [`SystemGit`], drives the `git`
//! binary.
//!
//! Both operations are idempotent: fetching an already-present
//! `(url, revision)` is a cheap update check, and initializing a directory
//! that already is a repository reports
//! [`InitOutcome::AlreadyRepository`] instead of failing.

use std::path::Path;
use std::process::Command;

use log::debug;

use crate::error::{Error, Result};

/// Outcome of [`GitClient::init`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// A fresh repository was initialized.
    Initialized,
    /// The directory already is a git repository; nothing was done.
    AlreadyRepository,
}

/// Interface to the version-control system.
pub trait GitClient: Send + Sync {
    /// Ensure `revision` of the repository at `url` is present at `dest`.
    ///
    /// Clones on first use; on subsequent calls for the same destination
    /// it refreshes the checkout instead of failing.
    fn fetch_or_update(&self, url: &str, revision: &str, dest: &Path) -> Result<()>;

    /// Initialize a git repository at `path`.
    fn init(&self, path: &Path) -> Result<InitOutcome>;
}

/// [`GitClient`] implementation shelling out to the system `git` binary.
#[derive(Debug, Default)]
pub struct SystemGit;

impl GitClient for SystemGit {
    fn fetch_or_update(&self, url: &str, revision: &str, dest: &Path) -> Result<()> {
        if dest.join(".git").exists() {
            debug!("updating {} at {}", url, dest.display());
            let dest = dest.to_string_lossy();
            run(&["-C", &dest, "fetch", "--depth", "1", "origin", revision])?;
            return run(&["-C", &dest, "checkout", "--detach", "FETCH_HEAD"]);
        }

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }

        debug!("cloning {}@{} into {}", url, revision, dest.display());
        let dest = dest.to_string_lossy();

        // A shallow clone works for branches and tags. Commit SHAs cannot
        // be passed to --branch, so fall back to a full clone plus
        // checkout.
        let shallow = run(&["clone", "--depth", "1", "--branch", revision, url, &dest]);
        if shallow.is_ok() {
            return Ok(());
        }

        debug!("shallow clone of {}@{} failed, retrying full clone", url, revision);
        run(&["clone", url, &dest])?;
        run(&["-C", &dest, "checkout", "--detach", revision])
    }

    fn init(&self, path: &Path) -> Result<InitOutcome> {
        if path.join(".git").exists() {
            return Ok(InitOutcome::AlreadyRepository);
        }

        run(&["init", &path.to_string_lossy()])?;
        Ok(InitOutcome::Initialized)
    }
}

fn run(args: &[&str]) -> Result<()> {
    let output = Command::new("git")
        .args(args)
        .output()
        .map_err(|err| Error::Git {
            command: args.join(" "),
            stderr: err.to_string(),
        })?;

    if !output.status.success() {
        return Err(Error::Git {
            command: args.join(" "),
            stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
        });
    }

    Ok(())
}
