//! Collapsing expected remote failures into explicit outcomes
//!
//! A missing alias and an already existing invoke permission are both
//! reported by the platform as errors. They are ordinary control flow for a
//! rollout, so they are turned into variants here, in one place, and every
//! other error is passed through untouched.

use crate::remote::{AliasRecord, RemoteError, RemoteErrorKind};

/// Result of looking up an environment alias
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasLookup {
    Exists(AliasRecord),
    Absent,
}

impl AliasLookup {
    pub fn from_fetch(result: Result<AliasRecord, RemoteError>) -> Result<Self, RemoteError> {
        match result {
            Ok(alias) => Ok(AliasLookup::Exists(alias)),
            Err(err) if err.kind() == RemoteErrorKind::NotFound => Ok(AliasLookup::Absent),
            Err(err) => Err(err),
        }
    }
}

/// Result of submitting an invoke permission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantOutcome {
    Granted,
    AlreadyGranted,
}

impl GrantOutcome {
    pub fn from_submission(result: Result<(), RemoteError>) -> Result<Self, RemoteError> {
        match result {
            Ok(()) => Ok(GrantOutcome::Granted),
            Err(err) if err.kind() == RemoteErrorKind::Conflict => Ok(GrantOutcome::AlreadyGranted),
            Err(err) => Err(err),
        }
    }
}
