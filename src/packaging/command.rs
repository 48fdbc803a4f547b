//! Artifact producer that shells out to a project packaging command

use crate::core::{Environment, PackagedFunction};
use crate::packaging::{default_function_name, ArtifactProducer, PackageError};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Optional JSON object a packaging command may print as its last line
#[derive(Debug, Default, Deserialize)]
struct PackagerReport {
    #[serde(default)]
    function_name: Option<String>,
    #[serde(default)]
    artifact: Option<String>,
}

/// Runs a shell command once per function directory
///
/// The command runs inside the function directory with these variables set:
/// `ROLLOUT_FUNCTION_DIR`, `ROLLOUT_FUNCTION`, `ROLLOUT_NAMESPACE`,
/// `ROLLOUT_ENVIRONMENT` and `ROLLOUT_ENV_CONFIG` (the environment
/// configuration as JSON). Without a command, functions are only named and
/// their code is assumed to be uploaded already.
#[derive(Debug, Clone)]
pub struct CommandArtifactProducer {
    /// Shell command line, run through `sh -c`
    command: Option<String>,

    /// Timeout for one packaging run in seconds
    timeout_secs: u64,
}

impl CommandArtifactProducer {
    pub fn new(command: Option<String>, timeout_secs: u64) -> Self {
        Self {
            command,
            timeout_secs,
        }
    }

    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    async fn run(
        &self,
        command: &str,
        directory: &Path,
        function_name: &str,
        namespace: &str,
        environment: &Environment,
    ) -> Result<String, PackageError> {
        debug!("Packaging {} with `{}`", directory.display(), command);

        let env_config = serde_json::to_string(&environment.config).map_err(|e| {
            PackageError::Other {
                directory: directory.to_path_buf(),
                message: format!("cannot encode environment config: {}", e),
            }
        })?;

        let result = timeout(
            Duration::from_secs(self.timeout_secs),
            Command::new("sh")
                .arg("-c")
                .arg(command)
                .current_dir(directory)
                .env("ROLLOUT_FUNCTION_DIR", directory)
                .env("ROLLOUT_FUNCTION", function_name)
                .env("ROLLOUT_NAMESPACE", namespace)
                .env("ROLLOUT_ENVIRONMENT", &environment.name)
                .env("ROLLOUT_ENV_CONFIG", env_config)
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| PackageError::Timeout {
            directory: directory.to_path_buf(),
            timeout_secs: self.timeout_secs,
        })?;

        let output = result.map_err(|e| PackageError::Spawn {
            directory: directory.to_path_buf(),
            message: e.to_string(),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let exit_code = output.status.code().unwrap_or(-1);
            warn!(
                "Packaging command for {} exited with code {}: {}",
                directory.display(),
                exit_code,
                stderr.trim()
            );
            return Err(PackageError::CommandFailed {
                directory: directory.to_path_buf(),
                exit_code,
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Read the report from the last non-empty stdout line, if it is one
fn parse_report(stdout: &str) -> PackagerReport {
    stdout
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .filter(|line| line.starts_with('{'))
        .and_then(|line| serde_json::from_str(line).ok())
        .unwrap_or_default()
}

#[async_trait]
impl ArtifactProducer for CommandArtifactProducer {
    async fn package(
        &self,
        directory: &Path,
        namespace: &str,
        environment: &Environment,
    ) -> Result<PackagedFunction, PackageError> {
        let default_name = default_function_name(directory, namespace)?;

        let report = match &self.command {
            Some(command) => {
                let stdout = self
                    .run(command, directory, &default_name, namespace, environment)
                    .await?;
                parse_report(&stdout)
            }
            None => PackagerReport::default(),
        };

        Ok(PackagedFunction {
            directory: directory.to_path_buf(),
            function_name: report.function_name.unwrap_or(default_name),
            artifact: report.artifact,
        })
    }
}
