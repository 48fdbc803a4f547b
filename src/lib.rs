//! lambda-rollout - publish, alias and expose serverless functions per environment

pub mod cli;
pub mod core;
pub mod execution;
pub mod packaging;
pub mod remote;

// Re-export commonly used types
pub use crate::core::{AliasArn, Environment, EnvironmentRegistry, ProjectConfig};
pub use execution::{DeploymentResult, RolloutError, RolloutEvent, RolloutPipeline, RolloutRequest};
pub use packaging::{ArtifactProducer, CommandArtifactProducer, PackageError};
pub use remote::{ApiGateway, ComputePlatform, RemoteError, RemoteErrorKind};
