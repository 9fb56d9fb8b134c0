//! # Error Handling
//!
//! Centralized error handling for skelly, built on `thiserror`. The `Error`
//! enum covers every anticipated failure mode with enough context (locator,
//! path or skeleton name) for the caller to act on. None of these errors are
//! retried internally; retry policy, if any, belongs to the external
//! collaborators (e.g. the git fetch).
//!
//! The `Result<T>` alias is used throughout the library to keep signatures
//! short.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for skelly operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A skeleton-source locator could not be parsed as a local path or
    /// remote URL.
    #[error("invalid repository locator {locator:?}: {message}")]
    InvalidLocator { locator: String, message: String },

    /// The query string of a remote locator is malformed.
    #[error("invalid locator query {query:?}: {message}")]
    InvalidQuery { query: String, message: String },

    /// A skeleton name was qualified with a repository name that is not
    /// configured.
    #[error("no repository configured with name {name:?}")]
    UnknownRepository { name: String },

    /// A resolved repository path does not look like a skeleton repository.
    #[error("invalid skeleton repository at {path}: {message}", path = .path.display())]
    InvalidRepository { path: PathBuf, message: String },

    /// No skeleton with the requested name exists in the repository.
    #[error("skeleton {name:?} not found in repository {repo:?}")]
    SkeletonNotFound { name: String, repo: String },

    /// A skeleton directory could not be read into a descriptor.
    #[error("failed to load skeleton from {path}: {message}", path = .path.display())]
    SkeletonLoad { path: PathBuf, message: String },

    /// Merge was invoked with an empty skeleton sequence.
    #[error("cannot merge an empty list of skeletons")]
    EmptyMerge,

    /// Two skeletons declare the same path with different entry types.
    #[error("file type conflict at {path:?}: declared as both file and directory")]
    FileTypeConflict { path: String },

    /// Rendering a templated file failed. Fails the whole materialization,
    /// no partial output is written for the entry.
    #[error("failed to render template {path:?}: {message}")]
    TemplateRender { path: String, message: String },

    /// A `--set` style value assignment could not be parsed.
    #[error("invalid value assignment {expr:?}: {message}")]
    ValueParse { expr: String, message: String },

    /// The user configuration file could not be loaded.
    #[error("failed to load config from {path}: {message}", path = .path.display())]
    Config { path: PathBuf, message: String },

    /// A git collaborator command failed.
    #[error("git {command} failed: {stderr}")]
    Git { command: String, stderr: String },

    /// A license or gitignore lookup failed.
    #[error("request to {url} failed: {message}")]
    Http { url: String, message: String },

    /// A mutex guarding shared state has been poisoned.
    #[error("lock poisoned: {context}")]
    LockPoisoned { context: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
