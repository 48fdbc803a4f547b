//! Rollout error types

use crate::core::ArnError;
use crate::packaging::PackageError;
use crate::remote::RemoteError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Stage of a function's rollout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RolloutStage {
    Package,
    Publish,
    Alias,
    Authorize,
    Deploy,
}

impl fmt::Display for RolloutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RolloutStage::Package => "package",
            RolloutStage::Publish => "publish",
            RolloutStage::Alias => "alias",
            RolloutStage::Authorize => "authorize",
            RolloutStage::Deploy => "deploy",
        };
        f.write_str(name)
    }
}

/// Error types for a rollout
#[derive(Debug, Error)]
pub enum RolloutError {
    #[error("Packaging failed: {0}")]
    Package(#[from] PackageError),

    #[error("{stage} failed for {function}: {source}")]
    Remote {
        function: String,
        stage: RolloutStage,
        #[source]
        source: RemoteError,
    },

    #[error("Invalid alias ARN for {function}: {source}")]
    Arn {
        function: String,
        #[source]
        source: ArnError,
    },

    #[error("Gateway deployment failed: {0}")]
    Deployment(#[source] RemoteError),
}

impl RolloutError {
    pub fn stage(&self) -> RolloutStage {
        match self {
            RolloutError::Package(_) => RolloutStage::Package,
            RolloutError::Remote { stage, .. } => *stage,
            RolloutError::Arn { .. } => RolloutStage::Authorize,
            RolloutError::Deployment(_) => RolloutStage::Deploy,
        }
    }

    /// The underlying remote error, if the platform or gateway rejected a call
    pub fn remote(&self) -> Option<&RemoteError> {
        match self {
            RolloutError::Remote { source, .. } | RolloutError::Deployment(source) => Some(source),
            _ => None,
        }
    }
}
