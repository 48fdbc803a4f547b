//! Invocation authorization - let the gateway call an aliased function

use crate::core::{AliasArn, ArnError};
use crate::remote::{ComputePlatform, GrantOutcome, PermissionGrant, RemoteError};
use thiserror::Error;
use tracing::{info, warn};

pub const GATEWAY_PRINCIPAL: &str = "apigateway.amazonaws.com";
pub const INVOKE_ACTION: &str = "lambda:InvokeFunction";
pub const STATEMENT_ID: &str = "api-gateway-access";

/// Failure to authorize the gateway
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizeError {
    #[error(transparent)]
    Arn(#[from] ArnError),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Build the allow-invoke statement for an alias and API
///
/// The qualifier is the alias name (the environment); the source ARN
/// allows any stage, method and path of `api_id`.
pub fn invoke_grant(alias: &AliasArn, api_id: &str) -> PermissionGrant {
    PermissionGrant {
        function_name: alias.function_name.clone(),
        qualifier: alias.qualifier.clone(),
        statement_id: STATEMENT_ID.to_string(),
        action: INVOKE_ACTION.to_string(),
        principal: GATEWAY_PRINCIPAL.to_string(),
        source_arn: format!(
            "arn:{}:execute-api:{}:{}:{}/*",
            alias.partition, alias.region, alias.account_id, api_id
        ),
    }
}

/// Grant the gateway permission to invoke the function behind `alias_arn`
///
/// An existing equivalent grant counts as success.
pub async fn authorize<C>(
    platform: &C,
    alias_arn: &str,
    api_id: &str,
    region: &str,
) -> Result<GrantOutcome, AuthorizeError>
where
    C: ComputePlatform + ?Sized,
{
    let alias = AliasArn::parse_in_region(alias_arn, region)?;
    let grant = invoke_grant(&alias, api_id);

    let outcome = GrantOutcome::from_submission(platform.add_permission(&grant).await)?;
    match outcome {
        GrantOutcome::Granted => info!(
            "Granted {} invoke on {}:{}",
            api_id, alias.function_name, alias.qualifier
        ),
        GrantOutcome::AlreadyGranted => warn!(
            "Invoke permission for {} on {}:{} already exists",
            api_id, alias.function_name, alias.qualifier
        ),
    }

    Ok(outcome)
}
