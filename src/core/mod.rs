//! Core domain models for a rollout
//!
//! This module defines the project configuration, the environments a rollout
//! can target, and the descriptors that follow a function through the stages.

pub mod arn;
pub mod config;
pub mod environment;
pub mod function;

pub use arn::{AliasArn, ArnError};
pub use config::ProjectConfig;
pub use environment::{Environment, EnvironmentRegistry};
pub use function::{DeployedFunction, FunctionDescriptor, PackagedFunction};
