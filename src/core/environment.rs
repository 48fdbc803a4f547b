//! Environment definitions loaded from the working directory

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

/// Conventional location of the environment definitions
pub const DEFAULT_ENV_FILE: &str = "env.yaml";

/// A named deployment target and its opaque configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Environment {
    /// Environment name, also used as alias name and stage name
    pub name: String,

    /// Configuration handed to the artifact producer as-is
    pub config: Value,
}

impl Environment {
    pub fn new(name: impl Into<String>, config: Value) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }
}

/// All environments known to the project, in file order
#[derive(Debug, Clone, Default, Serialize)]
pub struct EnvironmentRegistry {
    environments: Vec<Environment>,
}

impl EnvironmentRegistry {
    /// Load environment definitions from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read environment file {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Invalid environment file {}", path.display()))
    }

    /// Parse environment definitions from a YAML mapping of name to config
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let document: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        let mapping = match document {
            serde_yaml::Value::Mapping(mapping) => mapping,
            serde_yaml::Value::Null => anyhow::bail!("No environments defined"),
            _ => anyhow::bail!("Expected a mapping of environment name to configuration"),
        };

        let mut environments = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            let name = match key {
                serde_yaml::Value::String(name) => name,
                other => anyhow::bail!("Environment name must be a string, got {:?}", other),
            };
            let config = serde_json::to_value(&value)
                .with_context(|| format!("Environment '{}' has unsupported configuration", name))?;
            environments.push(Environment::new(name, config));
        }

        if environments.is_empty() {
            anyhow::bail!("No environments defined");
        }

        Ok(Self { environments })
    }

    pub fn from_environments(environments: Vec<Environment>) -> Self {
        Self { environments }
    }

    /// Environment names in definition order
    pub fn names(&self) -> Vec<&str> {
        self.environments.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Environment> {
        self.environments.iter().find(|e| e.name == name)
    }

    /// Look up an environment, failing with the list of known names
    pub fn select(&self, name: &str) -> Result<&Environment> {
        self.get(name).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown environment '{}' (available: {})",
                name,
                self.names().join(", ")
            )
        })
    }

    pub fn len(&self) -> usize {
        self.environments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }
}
