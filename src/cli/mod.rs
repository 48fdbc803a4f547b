//! Command-line interface

pub mod commands;
pub mod output;
pub mod prompt;

use clap::{Parser, Subcommand};
use commands::{DeployCommand, EnvsCommand, ValidateCommand};
use std::ffi::OsString;

/// Roll out serverless functions behind an API gateway
#[derive(Debug, Parser, Clone)]
#[command(name = "rollout")]
#[command(author = "Rollout Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Publish, alias and expose functions for one environment at a time", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Deploy every function to an environment
    Deploy(DeployCommand),

    /// Validate project and environment configuration
    Validate(ValidateCommand),

    /// List configured environments
    Envs(EnvsCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
