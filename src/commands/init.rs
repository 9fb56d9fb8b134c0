//! Init command implementation
//!
//! Creates a new skeleton repository: a `skeletons/` directory seeded with
//! one skeleton to start from.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use skelly::output::OutputConfig;
use skelly::repository;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to create the skeleton repository in
    pub path: PathBuf,

    /// Name of the initial skeleton
    #[arg(long, value_name = "NAME", default_value = "default")]
    pub skeleton_name: String,
}

/// Execute the init command
pub fn execute(args: InitArgs, output: &OutputConfig) -> Result<()> {
    repository::create_repository(&args.path, &args.skeleton_name)?;

    println!(
        "{} Created skeleton repository in {} with skeleton {}",
        output.green("✓"),
        output.bold(&args.path.display().to_string()),
        output.cyan(&args.skeleton_name)
    );

    Ok(())
}
