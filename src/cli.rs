//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;

use crate::commands;
use skelly::output::OutputConfig;

/// Skelly - Create projects from skeleton repositories
#[derive(Parser, Debug)]
#[command(name = "skelly")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a project from one or more skeletons
    Create(commands::create::CreateArgs),
    /// List skeletons available in the configured repositories
    Skeletons(commands::skeletons::SkeletonsArgs),
    /// Create a new skeleton repository
    Init(commands::init::InitArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::from_env(Env::default().default_filter_or(&self.log_level))
            .format_timestamp(None)
            .init();

        let output = OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::Create(args) => commands::create::execute(args, &output),
            Commands::Skeletons(args) => commands::skeletons::execute(args, &output),
            Commands::Init(args) => commands::init::execute(args, &output),
        }
    }
}
