//! Packaging function sources into deployable artifacts

pub mod command;
pub mod discovery;

use crate::core::{Environment, PackagedFunction};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use command::CommandArtifactProducer;
pub use discovery::discover_functions;

/// Error types for packaging
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("Cannot read functions directory {path}: {source}")]
    Discovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid function directory {0}")]
    InvalidDirectory(PathBuf),

    #[error("Failed to run packaging command for {directory}: {message}")]
    Spawn { directory: PathBuf, message: String },

    #[error("Packaging command for {directory} exited with code {exit_code}: {stderr}")]
    CommandFailed {
        directory: PathBuf,
        exit_code: i32,
        stderr: String,
    },

    #[error("Packaging {directory} timed out after {timeout_secs} seconds")]
    Timeout { directory: PathBuf, timeout_secs: u64 },

    #[error("Packaging {directory} failed: {message}")]
    Other { directory: PathBuf, message: String },
}

/// Turns a function source directory into an uploaded artifact
#[async_trait]
pub trait ArtifactProducer: Send + Sync {
    async fn package(
        &self,
        directory: &Path,
        namespace: &str,
        environment: &Environment,
    ) -> Result<PackagedFunction, PackageError>;
}

/// Default function name for a directory: `<namespace>-<directory name>`
pub fn default_function_name(directory: &Path, namespace: &str) -> Result<String, PackageError> {
    let dir_name = directory
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| PackageError::InvalidDirectory(directory.to_path_buf()))?;

    if namespace.is_empty() {
        Ok(dir_name.to_string())
    } else {
        Ok(format!("{}-{}", namespace, dir_name))
    }
}
