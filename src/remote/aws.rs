//! AWS SDK adapters: Lambda as the compute platform, API Gateway as the gateway

use crate::remote::{
    AliasRecord, ApiGateway, ComputePlatform, DeploymentRecord, DeploymentRequest,
    PermissionGrant, PublishedVersion, RemoteError,
};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_lambda::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use std::collections::HashMap;
use tracing::debug;

/// Load shared SDK configuration (credentials, retries) pinned to `region`
pub async fn load_sdk_config(region: &str) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await
}

/// Convert an SDK failure, keeping the service error code when there is one
fn remote_error<E, R>(operation: &'static str, err: SdkError<E, R>) -> RemoteError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let code = err
        .as_service_error()
        .and_then(|service_err| service_err.code())
        .map(str::to_string);
    RemoteError::new(operation, code, DisplayErrorContext(&err).to_string())
}

fn alias_record(
    operation: &'static str,
    name: Option<&str>,
    function_version: Option<&str>,
    alias_arn: Option<&str>,
) -> Result<AliasRecord, RemoteError> {
    Ok(AliasRecord {
        name: name
            .ok_or_else(|| RemoteError::missing_field(operation, "Name"))?
            .to_string(),
        function_version: function_version
            .ok_or_else(|| RemoteError::missing_field(operation, "FunctionVersion"))?
            .to_string(),
        alias_arn: alias_arn
            .ok_or_else(|| RemoteError::missing_field(operation, "AliasArn"))?
            .to_string(),
    })
}

/// Compute platform backed by AWS Lambda
#[derive(Debug, Clone)]
pub struct LambdaPlatform {
    client: aws_sdk_lambda::Client,
}

impl LambdaPlatform {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_lambda::Client::new(sdk_config),
        }
    }

    /// Create from a pre-built client
    pub fn from_client(client: aws_sdk_lambda::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ComputePlatform for LambdaPlatform {
    async fn publish_version(&self, function_name: &str) -> Result<PublishedVersion, RemoteError> {
        debug!("PublishVersion {}", function_name);
        let output = self
            .client
            .publish_version()
            .function_name(function_name)
            .send()
            .await
            .map_err(|e| remote_error("PublishVersion", e))?;

        let version = output
            .version()
            .ok_or_else(|| RemoteError::missing_field("PublishVersion", "Version"))?;

        Ok(PublishedVersion {
            function_name: output.function_name().unwrap_or(function_name).to_string(),
            version: version.to_string(),
        })
    }

    async fn get_alias(&self, function_name: &str, alias: &str) -> Result<AliasRecord, RemoteError> {
        debug!("GetAlias {}:{}", function_name, alias);
        let output = self
            .client
            .get_alias()
            .function_name(function_name)
            .name(alias)
            .send()
            .await
            .map_err(|e| remote_error("GetAlias", e))?;

        alias_record(
            "GetAlias",
            output.name(),
            output.function_version(),
            output.alias_arn(),
        )
    }

    async fn create_alias(
        &self,
        function_name: &str,
        alias: &str,
        version: &str,
    ) -> Result<AliasRecord, RemoteError> {
        debug!("CreateAlias {}:{} -> {}", function_name, alias, version);
        let output = self
            .client
            .create_alias()
            .function_name(function_name)
            .name(alias)
            .function_version(version)
            .send()
            .await
            .map_err(|e| remote_error("CreateAlias", e))?;

        alias_record(
            "CreateAlias",
            output.name(),
            output.function_version(),
            output.alias_arn(),
        )
    }

    async fn update_alias(
        &self,
        function_name: &str,
        alias: &str,
        version: &str,
    ) -> Result<AliasRecord, RemoteError> {
        debug!("UpdateAlias {}:{} -> {}", function_name, alias, version);
        let output = self
            .client
            .update_alias()
            .function_name(function_name)
            .name(alias)
            .function_version(version)
            .send()
            .await
            .map_err(|e| remote_error("UpdateAlias", e))?;

        alias_record(
            "UpdateAlias",
            output.name(),
            output.function_version(),
            output.alias_arn(),
        )
    }

    async fn add_permission(&self, grant: &PermissionGrant) -> Result<(), RemoteError> {
        debug!(
            "AddPermission {}:{} for {}",
            grant.function_name, grant.qualifier, grant.source_arn
        );
        self.client
            .add_permission()
            .function_name(&grant.function_name)
            .qualifier(&grant.qualifier)
            .statement_id(&grant.statement_id)
            .action(&grant.action)
            .principal(&grant.principal)
            .source_arn(&grant.source_arn)
            .send()
            .await
            .map_err(|e| remote_error("AddPermission", e))?;

        Ok(())
    }
}

/// Gateway backed by Amazon API Gateway (REST APIs)
#[derive(Debug, Clone)]
pub struct ApiGatewayClient {
    client: aws_sdk_apigateway::Client,
}

impl ApiGatewayClient {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_apigateway::Client::new(sdk_config),
        }
    }

    /// Create from a pre-built client
    pub fn from_client(client: aws_sdk_apigateway::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ApiGateway for ApiGatewayClient {
    async fn create_deployment(
        &self,
        request: &DeploymentRequest,
    ) -> Result<DeploymentRecord, RemoteError> {
        debug!(
            "CreateDeployment {} stage {}",
            request.rest_api_id, request.stage_name
        );
        let variables: HashMap<String, String> = request
            .variables
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let output = self
            .client
            .create_deployment()
            .rest_api_id(&request.rest_api_id)
            .stage_name(&request.stage_name)
            .set_variables(Some(variables))
            .send()
            .await
            .map_err(|e| remote_error("CreateDeployment", e))?;

        let id = output
            .id()
            .ok_or_else(|| RemoteError::missing_field("CreateDeployment", "id"))?;

        Ok(DeploymentRecord {
            id: id.to_string(),
            description: output.description().map(str::to_string),
        })
    }
}
