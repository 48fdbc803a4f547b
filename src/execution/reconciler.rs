//! Alias reconciliation - point the environment alias at a new version

use crate::remote::{AliasLookup, ComputePlatform, RemoteError};
use serde::Serialize;
use tracing::{debug, info};

/// What reconciliation did to the alias
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AliasAction {
    Created,
    Updated,
}

/// The alias after reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledAlias {
    pub alias_arn: String,
    pub function_version: String,
    pub action: AliasAction,
}

/// Decide what to do from the lookup outcome alone
pub fn next_action(lookup: &AliasLookup) -> AliasAction {
    match lookup {
        AliasLookup::Exists(_) => AliasAction::Updated,
        AliasLookup::Absent => AliasAction::Created,
    }
}

/// Make alias `environment` of `function_name` target `version`
///
/// Fetches the alias, then updates it when it exists or creates it when the
/// platform reports it missing. Any other lookup failure is returned as-is and
/// nothing is written. Another actor creating the alias between the lookup and
/// the create is not handled; the create then fails with the platform's
/// conflict error.
pub async fn reconcile<C>(
    platform: &C,
    function_name: &str,
    version: &str,
    environment: &str,
) -> Result<ReconciledAlias, RemoteError>
where
    C: ComputePlatform + ?Sized,
{
    let lookup = AliasLookup::from_fetch(platform.get_alias(function_name, environment).await)?;
    if let AliasLookup::Exists(current) = &lookup {
        debug!(
            "Alias {}:{} currently targets version {}",
            function_name, environment, current.function_version
        );
    }

    let action = next_action(&lookup);
    let alias = match action {
        AliasAction::Updated => {
            platform
                .update_alias(function_name, environment, version)
                .await?
        }
        AliasAction::Created => {
            platform
                .create_alias(function_name, environment, version)
                .await?
        }
    };

    info!(
        "Alias {}:{} {} -> version {}",
        function_name,
        environment,
        match action {
            AliasAction::Created => "created",
            AliasAction::Updated => "updated",
        },
        alias.function_version
    );

    Ok(ReconciledAlias {
        alias_arn: alias.alias_arn,
        function_version: alias.function_version,
        action,
    })
}
