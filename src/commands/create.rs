//! Create command implementation
//!
//! Loads the requested skeletons from the configured repositories, merges
//! them in the given order and materializes the result into the project
//! directory. `--dry-run` swaps the write surface for an in-memory
//! filesystem so nothing touches disk.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;

use skelly::config::{self, Config};
use skelly::filesystem::{DiskFs, Filesystem, MemoryFs};
use skelly::git::{GitClient, SystemGit};
use skelly::gitignore::GitignoreClient;
use skelly::license::LicenseClient;
use skelly::merge::merge_skeletons;
use skelly::output::OutputConfig;
use skelly::project::{self, Action, CreateConfig};
use skelly::repository::{load_skeletons, Resolver};
use skelly::template::{self, ProjectInfo};

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Name of the project to create
    pub name: String,

    /// Skeletons to compose, in order; may be qualified as <repo>:<skeleton>
    #[arg(required = true)]
    pub skeletons: Vec<String>,

    /// Custom project directory (defaults to $PWD/<name>)
    #[arg(short = 'd', long, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// Project repository host
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Project repository owner, e.g. a GitHub user or organization
    #[arg(long, value_name = "OWNER")]
    pub owner: Option<String>,

    /// License to populate the LICENSE file with
    #[arg(long, value_name = "NAME")]
    pub license: Option<String>,

    /// Comma-separated gitignore templates to populate .gitignore with
    #[arg(long, value_name = "QUERY")]
    pub gitignore: Option<String>,

    /// Load custom values from a YAML file; may be given multiple times
    #[arg(long = "values", value_name = "FILE")]
    pub values_files: Vec<PathBuf>,

    /// Set custom values of the form key1=value1 or deeply.nested.key=value
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,

    /// Overwrite files that are already present in the output directory
    #[arg(long)]
    pub overwrite: bool,

    /// Overwrite a specific file in the output directory, if present.
    /// If the path is a directory, files contained in it are overwritten too
    #[arg(long = "overwrite-file", value_name = "PATH")]
    pub overwrite_files: Vec<String>,

    /// Skip writing a specific file to the output directory.
    /// If the path is a directory, files contained in it are skipped too
    #[arg(long = "skip-file", value_name = "PATH")]
    pub skip_files: Vec<String>,

    /// Only print what would be done
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Create into an already existing output directory
    #[arg(long)]
    pub force: bool,

    /// Initialize git in the project directory
    #[arg(long)]
    pub init_git: bool,

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

/// Execute the create command
pub fn execute(args: CreateArgs, output: &OutputConfig) -> Result<()> {
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

    let project_dir = match &args.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?.join(&args.name),
    };

    if project_dir.exists() && !args.force {
        bail!(
            "project directory {} already exists, add --force to create into it",
            project_dir.display()
        );
    }

    let host = args.host.clone().unwrap_or(config.project.host);

    let owner = args
        .owner
        .clone()
        .or_else(|| (!config.project.owner.is_empty()).then(|| config.project.owner.clone()));
    let Some(owner) = owner else {
        bail!("--owner needs to be set as it could not be inferred from the config");
    };

    let license_name = args
        .license
        .clone()
        .or_else(|| (!config.project.license.is_empty()).then(|| config.project.license.clone()))
        .filter(|name| name != skelly::license::NO_LICENSE);

    let gitignore_query = args
        .gitignore
        .clone()
        .or_else(|| {
            (!config.project.gitignore.is_empty()).then(|| config.project.gitignore.clone())
        })
        .filter(|query| query != skelly::gitignore::NO_GITIGNORE);

    let mut values = config.values.clone();
    for path in &args.values_files {
        let loaded = template::load_values(path)?;
        template::merge_values(&mut values, &loaded);
    }
    for expr in &args.set_values {
        template::set_value(&mut values, expr)?;
    }

    let cache_root = args
        .cache_root
        .clone()
        .unwrap_or_else(config::default_cache_root);
    let resolver = Resolver::new(Arc::new(SystemGit), cache_root);

    let skeletons = load_skeletons(&resolver, &repositories, &args.skeletons)?;
    let skeleton = merge_skeletons(&skeletons)?;

    let license = match &license_name {
        Some(name) => Some(LicenseClient::new().get(name)?),
        None => None,
    };

    let gitignore = match &gitignore_query {
        Some(query) => Some(GitignoreClient::new().get(query)?),
        None => None,
    };

    println!(
        "{}       {}",
        output.bold("Name"),
        output.cyan(&args.name)
    );
    println!(
        "{}  {}",
        output.bold("Directory"),
        output.cyan(&project_dir.display().to_string())
    );
    println!("{}      {}/{}", output.bold("Owner"), host, owner);
    println!(
        "{}  {}",
        output.bold("Skeletons"),
        output.cyan(&args.skeletons.join(" "))
    );
    if let Some(license) = &license {
        println!("{}    {}", output.bold("License"), license.name);
    }
    if let Some(gitignore) = &gitignore {
        println!("{}  {}", output.bold("Gitignore"), gitignore.query);
    }
    println!();

    let mut memory;
    let mut disk;
    let filesystem: &mut dyn Filesystem = if args.dry_run {
        memory = MemoryFs::new();
        &mut memory
    } else {
        disk = DiskFs;
        &mut disk
    };

    let mut stdout = io::stdout();
    let result = project::create(
        &skeleton,
        &project_dir,
        CreateConfig {
            project: ProjectInfo {
                name: args.name.clone(),
                host: host.clone(),
                owner: owner.clone(),
            },
            overwrite: args.overwrite,
            overwrite_files: args.overwrite_files.clone(),
            skip_files: args.skip_files.clone(),
            values,
            license,
            gitignore,
            filesystem,
            output: &mut stdout,
        },
    )?;

    if result.count(Action::SkipExisting) > 0 {
        println!(
            "\n{} Some targets were skipped because they already exist, use --overwrite or --overwrite-file to overwrite them",
            output.yellow("!")
        );
    }

    if args.dry_run {
        println!(
            "\n{} Project {} would be created in {}, no files were written",
            output.cyan("✓ dry-run"),
            output.bold(&args.name),
            output.bold(&project_dir.display().to_string())
        );
        return Ok(());
    }

    println!(
        "\n{} Project {} created in {}",
        output.green("✓"),
        output.bold(&args.name),
        output.bold(&project_dir.display().to_string())
    );

    if args.init_git {
        // Idempotent: an already initialized directory is fine.
        SystemGit.init(&project_dir)?;
    }

    Ok(())
}
