//! # Skeleton Repositories
//!
//! A skeleton repository is a directory with a `skeletons/` subdirectory
//! in which every child directory is one skeleton. [`Repository`] is
//! polymorphic over the two places such a directory can come from:
//!
//! - [`Repository::Local`] reads a directory on disk.
//! - [`Repository::Remote`] ensures the requested revision is fetched into
//!   the deterministic cache path, then delegates to an internally
//!   constructed local repository rooted there, so the file-tree logic
//!   exists exactly once.
//!
//! The [`Resolver`] front-ends both variants with an explicit in-process
//! cache keyed by `(name, locator)`: within one run, each distinct pair is
//! parsed and fetched at most once. Cache population happens atomically
//! with resolution rather than holding a lock around the whole
//! resolve-and-fetch sequence, so genuinely concurrent callers racing on
//! the same key could still fetch twice; the single-threaded reference
//! flow never does.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use log::debug;

use crate::error::{Error, Result};
use crate::git::GitClient;
use crate::reporef::{RepoRef, DEFAULT_REVISION};
use crate::skeleton::{self, Skeleton};

/// Subdirectory of a repository that holds the skeletons.
pub const SKELETONS_DIR: &str = "skeletons";

/// A resolved skeleton repository.
#[derive(Debug)]
pub enum Repository {
    Local(LocalRepository),
    Remote(RemoteRepository),
}

impl Repository {
    /// The reference this repository was resolved from.
    pub fn repo_ref(&self) -> &RepoRef {
        match self {
            Repository::Local(local) => &local.repo_ref,
            Repository::Remote(remote) => &remote.local.repo_ref,
        }
    }

    /// Names of all skeletons in the repository, in lexical order.
    pub fn list_skeleton_names(&self) -> Result<Vec<String>> {
        match self {
            Repository::Local(local) => local.list_skeleton_names(),
            Repository::Remote(remote) => remote.local.list_skeleton_names(),
        }
    }

    /// Load the named skeleton into a descriptor.
    pub fn load_skeleton(&self, name: &str) -> Result<Skeleton> {
        match self {
            Repository::Local(local) => local.load_skeleton(name),
            Repository::Remote(remote) => remote.local.load_skeleton(name),
        }
    }
}

/// Repository backed by a directory on the local filesystem.
#[derive(Debug)]
pub struct LocalRepository {
    repo_ref: RepoRef,
}

impl LocalRepository {
    fn new(repo_ref: RepoRef) -> Self {
        Self { repo_ref }
    }

    fn skeletons_root(&self) -> PathBuf {
        self.repo_ref.path.join(SKELETONS_DIR)
    }

    fn list_skeleton_names(&self) -> Result<Vec<String>> {
        let root = self.skeletons_root();
        if !root.is_dir() {
            return Err(Error::InvalidRepository {
                path: self.repo_ref.path.clone(),
                message: format!("missing {}/ directory", SKELETONS_DIR),
            });
        }

        let mut names = Vec::new();
        for entry in std::fs::read_dir(&root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }

        names.sort();
        Ok(names)
    }

    fn load_skeleton(&self, name: &str) -> Result<Skeleton> {
        let dir = self.skeletons_root().join(name);
        if !dir.is_dir() {
            return Err(Error::SkeletonNotFound {
                name: name.to_string(),
                repo: self.repo_ref.display_name(),
            });
        }

        skeleton::load(&self.repo_ref, &dir, name)
    }
}

/// Repository backed by a remote git repository, materialized into the
/// local cache and served through a local repository from there.
#[derive(Debug)]
pub struct RemoteRepository {
    local: LocalRepository,
}

impl RemoteRepository {
    fn new(repo_ref: RepoRef) -> Self {
        Self {
            local: LocalRepository::new(repo_ref),
        }
    }
}

/// Cache key for resolved repositories.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    name: String,
    locator: String,
}

/// In-process cache of resolved repositories, keyed by `(name, locator)`.
#[derive(Debug, Clone, Default)]
pub struct RepoCache {
    cache: Arc<Mutex<HashMap<CacheKey, Arc<Repository>>>>,
}

impl RepoCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&self, key: &CacheKey) -> Result<Option<Arc<Repository>>> {
        let cache = self.cache.lock().map_err(|_| Error::LockPoisoned {
            context: "repository cache".to_string(),
        })?;
        Ok(cache.get(key).cloned())
    }

    fn insert(&self, key: CacheKey, repo: Arc<Repository>) -> Result<()> {
        let mut cache = self.cache.lock().map_err(|_| Error::LockPoisoned {
            context: "repository cache".to_string(),
        })?;
        cache.insert(key, repo);
        Ok(())
    }

    /// Number of cached repositories.
    pub fn len(&self) -> Result<usize> {
        let cache = self.cache.lock().map_err(|_| Error::LockPoisoned {
            context: "repository cache".to_string(),
        })?;
        Ok(cache.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// Resolves locators into repositories, owning the in-process cache and
/// the git collaborator. Constructed once per run and threaded through
/// calls.
pub struct Resolver {
    cache: RepoCache,
    git: Arc<dyn GitClient>,
    cache_root: PathBuf,
}

impl Resolver {
    pub fn new(git: Arc<dyn GitClient>, cache_root: PathBuf) -> Self {
        Self {
            cache: RepoCache::new(),
            git,
            cache_root,
        }
    }

    /// Resolve a named locator into a repository.
    ///
    /// A cache hit returns the cached instance without re-parsing or
    /// re-fetching, guaranteeing at-most-one resolution (and fetch) per
    /// distinct `(name, locator)` pair per run.
    pub fn resolve(&self, name: &str, locator: &str) -> Result<Arc<Repository>> {
        let key = CacheKey {
            name: name.to_string(),
            locator: locator.to_string(),
        };

        if let Some(repo) = self.cache.get(&key)? {
            debug!("repository cache hit for {:?} ({})", name, locator);
            return Ok(repo);
        }

        let mut repo_ref = RepoRef::parse(locator, &self.cache_root)?;
        repo_ref.name = name.to_string();

        let repo = if repo_ref.is_remote() {
            let revision = repo_ref.revision.as_deref().unwrap_or(DEFAULT_REVISION);
            self.git
                .fetch_or_update(&repo_ref.url, revision, &repo_ref.path)?;
            Repository::Remote(RemoteRepository::new(repo_ref))
        } else {
            Repository::Local(LocalRepository::new(repo_ref))
        };

        let repo = Arc::new(repo);
        self.cache.insert(key, Arc::clone(&repo))?;

        Ok(repo)
    }
}

/// Load the requested skeletons, in the order given, from the configured
/// repositories.
///
/// A name may be qualified as `repo:skeleton` to pin the repository; an
/// unqualified name is searched across all configured repositories in
/// repository-name order, first hit wins.
pub fn load_skeletons(
    resolver: &Resolver,
    repositories: &BTreeMap<String, String>,
    names: &[String],
) -> Result<Vec<Skeleton>> {
    let mut skeletons = Vec::with_capacity(names.len());

    for name in names {
        let skeleton = match name.split_once(':') {
            Some((repo_name, skeleton_name)) => {
                let locator =
                    repositories
                        .get(repo_name)
                        .ok_or_else(|| Error::UnknownRepository {
                            name: repo_name.to_string(),
                        })?;
                resolver.resolve(repo_name, locator)?.load_skeleton(skeleton_name)?
            }
            None => find_skeleton(resolver, repositories, name)?,
        };

        skeletons.push(skeleton);
    }

    Ok(skeletons)
}

/// Create a new skeleton repository at `path`, seeded with a skeleton
/// named `skeleton_name`.
pub fn create_repository(path: &Path, skeleton_name: &str) -> Result<()> {
    let skeletons_dir = path.join(SKELETONS_DIR);
    std::fs::create_dir_all(&skeletons_dir)?;

    skeleton::create(&skeletons_dir.join(skeleton_name))
}

fn find_skeleton(
    resolver: &Resolver,
    repositories: &BTreeMap<String, String>,
    name: &str,
) -> Result<Skeleton> {
    for (repo_name, locator) in repositories {
        match resolver.resolve(repo_name, locator)?.load_skeleton(name) {
            Ok(skeleton) => return Ok(skeleton),
            Err(Error::SkeletonNotFound { .. }) => continue,
            Err(err) => return Err(err),
        }
    }

    Err(Error::SkeletonNotFound {
        name: name.to_string(),
        repo: "any configured repository".to_string(),
    })
}
