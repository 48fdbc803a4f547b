//! Compute platform and API gateway clients

pub mod aws;
pub mod error;
pub mod outcome;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use aws::{ApiGatewayClient, LambdaPlatform};
pub use error::{classify, RemoteError, RemoteErrorKind};
pub use outcome::{AliasLookup, GrantOutcome};

/// A newly published immutable function version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedVersion {
    pub function_name: String,
    pub version: String,
}

/// An alias as held by the compute platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRecord {
    pub name: String,
    pub function_version: String,
    pub alias_arn: String,
}

/// Allow-invoke statement attached to a function alias
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    pub function_name: String,
    pub qualifier: String,
    pub statement_id: String,
    pub action: String,
    pub principal: String,
    pub source_arn: String,
}

/// Request to put a gateway stage live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRequest {
    pub rest_api_id: String,
    pub stage_name: String,
    pub variables: BTreeMap<String, String>,
}

/// Deployment record returned by the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Operations the rollout needs from the serverless compute platform
///
/// Implementations report failures as [`RemoteError`] with the service's
/// error code intact; interpreting codes is left to [`outcome`].
#[async_trait]
pub trait ComputePlatform: Send + Sync {
    /// Publish a new immutable version of a function
    async fn publish_version(&self, function_name: &str) -> Result<PublishedVersion, RemoteError>;

    async fn get_alias(&self, function_name: &str, alias: &str) -> Result<AliasRecord, RemoteError>;

    async fn create_alias(
        &self,
        function_name: &str,
        alias: &str,
        version: &str,
    ) -> Result<AliasRecord, RemoteError>;

    async fn update_alias(
        &self,
        function_name: &str,
        alias: &str,
        version: &str,
    ) -> Result<AliasRecord, RemoteError>;

    async fn add_permission(&self, grant: &PermissionGrant) -> Result<(), RemoteError>;
}

/// Operations the rollout needs from the API gateway
#[async_trait]
pub trait ApiGateway: Send + Sync {
    async fn create_deployment(
        &self,
        request: &DeploymentRequest,
    ) -> Result<DeploymentRecord, RemoteError>;
}
