//! Rollout pipeline - orchestrates a full environment rollout

use crate::{
    core::{AliasArn, DeployedFunction, Environment, FunctionDescriptor, PackagedFunction},
    execution::{
        authorize, reconcile, AliasAction, AuthorizeError, RolloutError, RolloutStage,
    },
    packaging::ArtifactProducer,
    remote::{ApiGateway, ComputePlatform, DeploymentRequest, GrantOutcome, RemoteError},
};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Stage variable the gateway integrations use to pick the alias
pub const ALIAS_STAGE_VARIABLE: &str = "functionAlias";

/// Events that can occur during a rollout
#[derive(Debug, Clone)]
pub enum RolloutEvent {
    RolloutStarted {
        run_id: Uuid,
        environment: String,
        function_count: usize,
    },
    PackagingStarted {
        function_count: usize,
    },
    FunctionPackaged {
        directory: PathBuf,
        function_name: String,
    },
    VersionPublished {
        function_name: String,
        version: String,
    },
    AliasReconciled {
        function_name: String,
        alias_arn: String,
        action: AliasAction,
    },
    InvocationAuthorized {
        function_name: String,
        outcome: GrantOutcome,
    },
    FunctionFailed {
        function: String,
        stage: RolloutStage,
        error: String,
    },
    AllFunctionsDeployed {
        function_count: usize,
    },
    DeploymentCreated {
        run_id: Uuid,
        deployment_id: String,
        stage: String,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(RolloutEvent) + Send + Sync>;

/// Everything a rollout needs to know about its target
#[derive(Debug, Clone)]
pub struct RolloutRequest {
    pub function_dirs: Vec<PathBuf>,
    pub namespace: String,
    pub environment: Environment,
    pub api_id: String,
    pub region: String,
}

/// Outcome of a completed rollout
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentResult {
    pub run_id: Uuid,
    pub environment: String,
    pub stage: String,
    pub deployment_id: String,
    pub functions: Vec<DeployedFunction>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

/// Rolls a set of functions out to one environment
///
/// All functions are packaged first. Each packaged function is then
/// published, aliased and authorized independently, up to `concurrency` at
/// a time. The single gateway deployment is only requested once every
/// function got through; the first failure stops the run before that point.
/// Nothing already done is undone.
pub struct RolloutPipeline<P, C, G> {
    producer: P,
    platform: C,
    gateway: G,
    concurrency: usize,
    event_handlers: Vec<EventHandler>,
}

impl<P, C, G> RolloutPipeline<P, C, G>
where
    P: ArtifactProducer,
    C: ComputePlatform,
    G: ApiGateway,
{
    pub fn new(producer: P, platform: C, gateway: G) -> Self {
        Self {
            producer,
            platform,
            gateway,
            concurrency: 1,
            event_handlers: Vec::new(),
        }
    }

    /// Maximum number of functions in flight at once (at least 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(RolloutEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
    }

    /// Emit an event to all handlers
    fn emit_event(&self, event: RolloutEvent) {
        for handler in &self.event_handlers {
            handler(event.clone());
        }
    }

    /// Run the whole rollout
    pub async fn rollout(&self, request: &RolloutRequest) -> Result<DeploymentResult, RolloutError> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let environment = request.environment.name.as_str();
        let function_count = request.function_dirs.len();

        info!(
            "Starting rollout {} of {} functions to {}",
            run_id, function_count, environment
        );
        self.emit_event(RolloutEvent::RolloutStarted {
            run_id,
            environment: environment.to_string(),
            function_count,
        });

        info!("Packaging functions...");
        self.emit_event(RolloutEvent::PackagingStarted { function_count });

        let mut packaged: Vec<(usize, PackagedFunction)> =
            stream::iter(request.function_dirs.iter().enumerate())
                .map(|(index, dir)| async move {
                    self.package_function(dir, request)
                        .await
                        .map(|packaged| (index, packaged))
                })
                .buffer_unordered(self.concurrency)
                .try_collect()
                .await?;
        packaged.sort_by_key(|(index, _)| *index);

        let mut functions: Vec<(usize, DeployedFunction)> = stream::iter(packaged)
            .map(|(index, packaged)| async move {
                self.deploy_function(FunctionDescriptor::from(packaged), request)
                    .await
                    .map(|deployed| (index, deployed))
            })
            .buffer_unordered(self.concurrency)
            .try_collect()
            .await?;
        functions.sort_by_key(|(index, _)| *index);

        info!("All functions deployed");
        self.emit_event(RolloutEvent::AllFunctionsDeployed { function_count });

        let deployment = self
            .gateway
            .create_deployment(&deployment_request(request))
            .await
            .map_err(|source| {
                error!("Deployment of {} to {} failed: {}", request.api_id, environment, source);
                RolloutError::Deployment(source)
            })?;

        info!("Deployment {} of stage {} complete", deployment.id, environment);
        self.emit_event(RolloutEvent::DeploymentCreated {
            run_id,
            deployment_id: deployment.id.clone(),
            stage: environment.to_string(),
        });

        Ok(DeploymentResult {
            run_id,
            environment: environment.to_string(),
            stage: environment.to_string(),
            deployment_id: deployment.id,
            functions: functions.into_iter().map(|(_, deployed)| deployed).collect(),
            started_at,
            completed_at: Utc::now(),
        })
    }

    async fn package_function(
        &self,
        directory: &Path,
        request: &RolloutRequest,
    ) -> Result<PackagedFunction, RolloutError> {
        match self
            .producer
            .package(directory, &request.namespace, &request.environment)
            .await
        {
            Ok(packaged) => {
                info!("Packaged {} as {}", directory.display(), packaged.function_name);
                self.emit_event(RolloutEvent::FunctionPackaged {
                    directory: directory.to_path_buf(),
                    function_name: packaged.function_name.clone(),
                });
                Ok(packaged)
            }
            Err(err) => {
                let err = RolloutError::from(err);
                self.report_failure(&directory.display().to_string(), &err);
                Err(err)
            }
        }
    }

    /// Publish, alias and authorize one function
    async fn deploy_function(
        &self,
        descriptor: FunctionDescriptor,
        request: &RolloutRequest,
    ) -> Result<DeployedFunction, RolloutError> {
        let function_name = descriptor.function_name.clone();
        let result = self.advance_function(descriptor, request).await;
        if let Err(err) = &result {
            self.report_failure(&function_name, err);
        }
        result
    }

    async fn advance_function(
        &self,
        mut descriptor: FunctionDescriptor,
        request: &RolloutRequest,
    ) -> Result<DeployedFunction, RolloutError> {
        let environment = request.environment.name.as_str();
        let remote_error = |stage: RolloutStage| {
            let function = descriptor.function_name.clone();
            move |source: RemoteError| RolloutError::Remote {
                function,
                stage,
                source,
            }
        };

        let published = self
            .platform
            .publish_version(&descriptor.function_name)
            .await
            .map_err(remote_error(RolloutStage::Publish))?;
        self.emit_event(RolloutEvent::VersionPublished {
            function_name: descriptor.function_name.clone(),
            version: published.version.clone(),
        });
        descriptor.version = Some(published.version.clone());

        let alias = reconcile(
            &self.platform,
            &descriptor.function_name,
            &published.version,
            environment,
        )
        .await
        .map_err(remote_error(RolloutStage::Alias))?;
        let alias_arn = AliasArn::parse(&alias.alias_arn).map_err(|source| RolloutError::Arn {
            function: descriptor.function_name.clone(),
            source,
        })?;
        self.emit_event(RolloutEvent::AliasReconciled {
            function_name: descriptor.function_name.clone(),
            alias_arn: alias.alias_arn.clone(),
            action: alias.action,
        });
        descriptor.alias_arn = Some(alias_arn.clone());

        let outcome = authorize(&self.platform, &alias.alias_arn, &request.api_id, &request.region)
            .await
            .map_err(|err| match err {
                AuthorizeError::Arn(source) => RolloutError::Arn {
                    function: descriptor.function_name.clone(),
                    source,
                },
                AuthorizeError::Remote(source) => RolloutError::Remote {
                    function: descriptor.function_name.clone(),
                    stage: RolloutStage::Authorize,
                    source,
                },
            })?;
        self.emit_event(RolloutEvent::InvocationAuthorized {
            function_name: descriptor.function_name.clone(),
            outcome,
        });

        debug!("Rolled out {:?}", descriptor);

        Ok(DeployedFunction {
            function_name: descriptor.function_name,
            version: published.version,
            alias_arn,
            alias_created: alias.action == AliasAction::Created,
            permission_existed: outcome == GrantOutcome::AlreadyGranted,
        })
    }

    fn report_failure(&self, function: &str, err: &RolloutError) {
        error!("Rollout of {} failed at {}: {}", function, err.stage(), err);
        self.emit_event(RolloutEvent::FunctionFailed {
            function: function.to_string(),
            stage: err.stage(),
            error: err.to_string(),
        });
    }
}

/// The single deployment that puts the stage live on the new aliases
pub fn deployment_request(request: &RolloutRequest) -> DeploymentRequest {
    let mut variables = BTreeMap::new();
    variables.insert(
        ALIAS_STAGE_VARIABLE.to_string(),
        request.environment.name.clone(),
    );

    DeploymentRequest {
        rest_api_id: request.api_id.clone(),
        stage_name: request.environment.name.clone(),
        variables,
    }
}
