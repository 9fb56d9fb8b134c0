//! Skeletons command implementation
//!
//! Lists the skeletons available in the configured repositories, one
//! `<repo>:<name>` row per skeleton.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use skelly::config::{self, Config};
use skelly::git::SystemGit;
use skelly::output::OutputConfig;
use skelly::repository::Resolver;

/// Arguments for the skeletons command
#[derive(Args, Debug)]
pub struct SkeletonsArgs {
    /// Add or override a skeleton repository for this invocation
    #[arg(long = "repository", value_name = "NAME=LOCATOR")]
    pub repositories: Vec<String>,

    /// Path to the config file
    #[arg(long, value_name = "PATH", env = "SKELLY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Repository cache root directory
    #[arg(long, value_name = "PATH", env = "SKELLY_CACHE")]
    pub cache_root: Option<PathBuf>,
}

/// Execute the skeletons command
pub fn execute(args: SkeletonsArgs, output: &OutputConfig) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };

    let mut repositories = config.repositories.clone();
    for raw in &args.repositories {
        let (name, locator) = raw
            .split_once('=')
            .context("--repository expects NAME=LOCATOR")?;
        repositories.insert(name.to_string(), locator.to_string());
    }

    let cache_root = args
        .cache_root
        .clone()
        .unwrap_or_else(config::default_cache_root);
    let resolver = Resolver::new(Arc::new(SystemGit), cache_root);

    for (repo_name, locator) in &repositories {
        let repo = resolver.resolve(repo_name, locator)?;
        for skeleton in repo.list_skeleton_names()? {
            println!("{}:{}", output.cyan(repo_name), skeleton);
        }
    }

    Ok(())
}
