//! Rollout execution

pub mod authorizer;
pub mod error;
pub mod pipeline;
pub mod reconciler;

pub use authorizer::{authorize, invoke_grant, AuthorizeError};
pub use error::{RolloutError, RolloutStage};
pub use pipeline::{DeploymentResult, EventHandler, RolloutEvent, RolloutPipeline, RolloutRequest};
pub use reconciler::{reconcile, AliasAction, ReconciledAlias};
