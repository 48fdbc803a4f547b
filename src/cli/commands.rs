//! CLI command definitions

use crate::core::config::DEFAULT_CONFIG_FILE;
use crate::core::environment::DEFAULT_ENV_FILE;
use clap::Args;

/// Deploy every function to an environment
#[derive(Debug, Args, Clone)]
pub struct DeployCommand {
    /// Environment to deploy to (prompts when omitted)
    #[arg(short, long)]
    pub env: Option<String>,

    /// Path to the project configuration
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Path to the environment definitions
    #[arg(long, default_value = DEFAULT_ENV_FILE)]
    pub env_file: String,

    /// Functions rolled out at the same time (overrides the config)
    #[arg(long, value_parser = clap::value_parser!(usize))]
    pub concurrency: Option<usize>,

    /// Print the deployment result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Validate project and environment configuration
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to the project configuration
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Path to the environment definitions
    #[arg(long, default_value = DEFAULT_ENV_FILE)]
    pub env_file: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// List configured environments
#[derive(Debug, Args, Clone)]
pub struct EnvsCommand {
    /// Path to the environment definitions
    #[arg(long, default_value = DEFAULT_ENV_FILE)]
    pub env_file: String,
}
