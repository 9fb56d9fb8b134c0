//! # Skelly Library
//!
//! This library provides the core functionality for creating new projects
//! from reusable skeleton templates. It is designed to be used by the
//! `skelly` command-line tool but can also be integrated into other
//! applications that want to scaffold file trees from versioned templates.
//!
//! ## Quick Example
//!
//! ```
//! use skelly::filesystem::{Filesystem, MemoryFs};
//! use skelly::template;
//! use std::path::Path;
//!
//! // Dry runs stage writes into an in-memory filesystem.
//! let mut fs = MemoryFs::new();
//! fs.write(Path::new("README.md"), b"# My Project", 0o644).unwrap();
//! assert!(fs.exists(Path::new("README.md")));
//!
//! // Values merge with last-wins semantics, nested maps combine.
//! let mut values = template::parse_values("a: {x: 1}").unwrap();
//! let overrides = template::parse_values("a: {y: 2}").unwrap();
//! template::merge_values(&mut values, &overrides);
//! assert_eq!(values, template::parse_values("a: {x: 1, y: 2}").unwrap());
//! ```
//!
//! ## Core Concepts
//!
//! - **Repository references (`reporef`)**: parse a locator string (local
//!   path or remote URL with optional revision) into a normalized
//!   reference with a deterministic cache location.
//! - **Repositories (`repository`)**: local directories or remote git
//!   repositories holding skeletons, resolved through an in-process cache
//!   so each `(name, locator)` pair is fetched at most once per run.
//! - **Skeletons (`skeleton`)**: a named template file tree plus declared
//!   default values, loaded into an in-memory descriptor.
//! - **Composition (`merge`)**: multiple skeletons overlay into one
//!   logical skeleton with deterministic last-wins semantics.
//! - **Materialization (`project`)**: the merged tree is written into an
//!   output directory under an explicit conflict policy, rendering
//!   templates and synthesizing LICENSE/.gitignore files.
//! - **Filesystem abstraction (`filesystem`)**: materialization writes
//!   through a swappable surface, enabling side-effect-free dry runs.
//!
//! ## Execution Flow
//!
//! 1. Resolve the configured repositories (`repository::Resolver`).
//! 2. Load the requested skeletons (`repository::load_skeletons`).
//! 3. Merge them in user order (`merge::merge_skeletons`).
//! 4. Materialize the result (`project::create`) and report per-path
//!    actions and counts.

pub mod config;
pub mod error;
pub mod filesystem;
pub mod git;
pub mod gitignore;
pub mod license;
pub mod merge;
pub mod output;
pub mod path;
pub mod project;
pub mod reporef;
pub mod repository;
pub mod skeleton;
pub mod template;
