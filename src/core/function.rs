//! Function descriptors as they move through a rollout

use crate::core::AliasArn;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output of the artifact producer for one function directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackagedFunction {
    /// Source directory the artifact was built from
    pub directory: PathBuf,

    /// Name of the function on the compute platform
    pub function_name: String,

    /// Opaque reference to the uploaded artifact, if the producer reports one
    #[serde(default)]
    pub artifact: Option<String>,
}

/// A function being rolled out
///
/// Filled in stage by stage: publishing sets `version`, alias
/// reconciliation sets `alias_arn`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionDescriptor {
    pub directory: PathBuf,
    pub function_name: String,
    pub artifact: Option<String>,
    pub version: Option<String>,
    pub alias_arn: Option<AliasArn>,
}

impl From<PackagedFunction> for FunctionDescriptor {
    fn from(packaged: PackagedFunction) -> Self {
        Self {
            directory: packaged.directory,
            function_name: packaged.function_name,
            artifact: packaged.artifact,
            version: None,
            alias_arn: None,
        }
    }
}

/// Final per-function record of a completed rollout
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployedFunction {
    pub function_name: String,
    pub version: String,
    pub alias_arn: AliasArn,
    /// Whether the alias was created by this run (as opposed to updated)
    pub alias_created: bool,
    /// Whether the invoke permission already existed
    pub permission_existed: bool,
}
