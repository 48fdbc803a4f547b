use anyhow::{Context, Result};
use rollout::cli::commands::{DeployCommand, EnvsCommand, ValidateCommand};
use rollout::cli::output::*;
use rollout::cli::prompt::{ask_environment, choose_environment};
use rollout::cli::{Cli, Command};
use rollout::core::{EnvironmentRegistry, ProjectConfig};
use rollout::execution::{RolloutPipeline, RolloutRequest};
use rollout::packaging::{discover_functions, CommandArtifactProducer};
use rollout::remote::aws::load_sdk_config;
use rollout::remote::{ApiGatewayClient, LambdaPlatform};
use std::path::{Path, PathBuf};
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    // Execute command
    match &cli.command {
        Command::Deploy(cmd) => deploy(cmd).await?,
        Command::Validate(cmd) => validate(cmd)?,
        Command::Envs(cmd) => list_environments(cmd)?,
    }

    Ok(())
}

/// Discover the function directories for a project, requiring at least one
fn find_functions(config: &ProjectConfig) -> Result<Vec<PathBuf>> {
    let working_dir = std::env::current_dir().context("Cannot determine working directory")?;
    let root = config.functions_root(&working_dir);
    let functions = discover_functions(&root)?;
    if functions.is_empty() {
        anyhow::bail!("No functions found in {}", root.display());
    }
    Ok(functions)
}

async fn deploy(cmd: &DeployCommand) -> Result<()> {
    // Everything local is loaded and checked before the first remote call
    let config = ProjectConfig::from_file(&cmd.config)?;
    let registry = EnvironmentRegistry::from_file(&cmd.env_file)?;
    let function_dirs = find_functions(&config)?;

    let environment = choose_environment(&registry, cmd.env.as_deref(), ask_environment)?.clone();

    println!(
        "{} Deploying {} functions to {}",
        INFO,
        style(function_dirs.len()).cyan(),
        style(&environment.name).bold()
    );

    let producer = CommandArtifactProducer::new(
        config.package_command.clone(),
        config.package_timeout_secs,
    );
    if producer.command().is_none() {
        warn!("No package_command configured; function code is expected to be uploaded already");
    }

    let sdk_config = load_sdk_config(&config.region).await;
    let mut pipeline = RolloutPipeline::new(
        producer,
        LambdaPlatform::new(&sdk_config),
        ApiGatewayClient::new(&sdk_config),
    )
    .with_concurrency(cmd.concurrency.unwrap_or(config.concurrency));

    let progress = create_progress_bar(function_dirs.len());
    let handler_progress = progress.clone();
    pipeline.add_event_handler(move |event| {
        if completes_function(&event) {
            handler_progress.inc(1);
        }
        handler_progress.println(format_rollout_event(&event));
    });

    let request = RolloutRequest {
        function_dirs,
        namespace: config.function_namespace.clone(),
        environment,
        api_id: config.api_id.clone(),
        region: config.region.clone(),
    };

    let result = pipeline.rollout(&request).await;
    progress.finish_and_clear();

    match result {
        Ok(result) => {
            println!("\n{}", format_deployment_result(&result));
            if cmd.json {
                println!("\n{}", serde_json::to_string_pretty(&result)?);
            }
            Ok(())
        }
        Err(err) => {
            println!(
                "\n{} Rollout to {} {}",
                CROSS,
                style(&request.environment.name).bold(),
                style("failed").red()
            );
            error!("{}", err);
            std::process::exit(1);
        }
    }
}

fn validate(cmd: &ValidateCommand) -> Result<()> {
    println!("{} Validating configuration...", INFO);

    let result = load_for_validation(&cmd.config, &cmd.env_file);

    match result {
        Ok((config, registry, functions)) => {
            println!("{} Configuration is valid!", CHECK);
            println!("  API: {} ({})", style(&config.api_id).bold(), config.region);
            println!("  Environments: {}", style(registry.names().join(", ")).cyan());
            println!("  Functions: {}", style(functions.len()).cyan());

            if cmd.json {
                let json = serde_json::json!({
                    "config": config,
                    "environments": registry.names(),
                    "functions": functions,
                });
                println!("\n{}", serde_json::to_string_pretty(&json)?);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(format!("{:#}", e)).red());
            std::process::exit(1);
        }
    }
}

fn load_for_validation(
    config_path: &str,
    env_path: &str,
) -> Result<(ProjectConfig, EnvironmentRegistry, Vec<PathBuf>)> {
    let config = ProjectConfig::from_file(config_path)?;
    let registry = EnvironmentRegistry::from_file(env_path)?;
    let functions = find_functions(&config)?;
    Ok((config, registry, functions))
}

fn list_environments(cmd: &EnvsCommand) -> Result<()> {
    let registry = EnvironmentRegistry::from_file(Path::new(&cmd.env_file))?;

    println!("{} Environments:", INFO);
    for name in registry.names() {
        println!("  {}", style(name).bold());
    }

    Ok(())
}
