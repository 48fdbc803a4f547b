//! Project configuration from YAML

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Conventional location of the project configuration
pub const DEFAULT_CONFIG_FILE: &str = "rollout.yaml";

/// Top-level project configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// API Gateway REST API identifier
    pub api_id: String,

    /// Region hosting both the functions and the API
    pub region: String,

    /// Prefix applied to packaged function names
    #[serde(default)]
    pub function_namespace: String,

    /// Directory whose subdirectories are the functions to deploy
    #[serde(default = "default_functions_dir")]
    pub functions_dir: PathBuf,

    /// Shell command that packages and uploads one function
    #[serde(default)]
    pub package_command: Option<String>,

    /// Timeout for a single packaging command (in seconds)
    #[serde(default = "default_package_timeout")]
    pub package_timeout_secs: u64,

    /// Maximum number of functions rolled out at the same time
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_functions_dir() -> PathBuf {
    PathBuf::from("functions")
}

fn default_package_timeout() -> u64 {
    600
}

fn default_concurrency() -> usize {
    4
}

impl ProjectConfig {
    /// Load project configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read project config {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Invalid project config {}", path.display()))
    }

    /// Parse project configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: ProjectConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the project configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_id.trim().is_empty() {
            anyhow::bail!("api_id must not be empty");
        }
        if self.region.trim().is_empty() {
            anyhow::bail!("region must not be empty");
        }
        if self.concurrency == 0 {
            anyhow::bail!("concurrency must be at least 1");
        }
        if let Some(command) = &self.package_command {
            if command.trim().is_empty() {
                anyhow::bail!("package_command must not be blank when set");
            }
        }
        Ok(())
    }

    /// Resolve the functions root against a working directory
    pub fn functions_root(&self, working_dir: &Path) -> PathBuf {
        if self.functions_dir.is_absolute() {
            self.functions_dir.clone()
        } else {
            working_dir.join(&self.functions_dir)
        }
    }
}
