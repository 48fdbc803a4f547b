//! CLI output formatting

use crate::{
    execution::{AliasAction, DeploymentResult, RolloutEvent},
    remote::GrantOutcome,
};
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static PACKAGE: Emoji<'_, '_> = Emoji("📦 ", "# ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "!");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Create a progress bar over the functions of a rollout
pub fn create_progress_bar(total: usize) -> ProgressBar {
    let progress = ProgressBar::new(total as u64);
    if let Ok(template) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        progress.set_style(template.progress_chars("#>-"));
    }
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

/// Whether an event marks one more function as fully rolled out
pub fn completes_function(event: &RolloutEvent) -> bool {
    matches!(event, RolloutEvent::InvocationAuthorized { .. })
}

/// Format a rollout event for display
pub fn format_rollout_event(event: &RolloutEvent) -> String {
    match event {
        RolloutEvent::RolloutStarted {
            run_id,
            environment,
            function_count,
        } => format!(
            "{} Rolling out {} functions to {} ({})",
            ROCKET,
            style(function_count).cyan(),
            style(environment).bold(),
            style(&run_id.to_string()[..8]).dim()
        ),
        RolloutEvent::PackagingStarted { .. } => {
            format!("{} Packaging functions...", PACKAGE)
        }
        RolloutEvent::FunctionPackaged {
            directory,
            function_name,
        } => format!(
            "{} {} → {}",
            PACKAGE,
            style(directory.display()).dim(),
            style(function_name).cyan()
        ),
        RolloutEvent::VersionPublished {
            function_name,
            version,
        } => format!(
            "{} {} version {}",
            INFO,
            style(function_name).cyan(),
            style(version).bold()
        ),
        RolloutEvent::AliasReconciled {
            function_name,
            alias_arn,
            action,
        } => {
            let verb = match action {
                AliasAction::Created => "created",
                AliasAction::Updated => "updated",
            };
            format!(
                "{} {} alias {} ({})",
                INFO,
                style(function_name).cyan(),
                verb,
                style(alias_arn).dim()
            )
        }
        RolloutEvent::InvocationAuthorized {
            function_name,
            outcome,
        } => match outcome {
            GrantOutcome::Granted => format!(
                "{} {} invoke permission granted",
                CHECK,
                style(function_name).green()
            ),
            GrantOutcome::AlreadyGranted => format!(
                "{} {} invoke permission already present",
                CHECK,
                style(function_name).green()
            ),
        },
        RolloutEvent::FunctionFailed {
            function,
            stage,
            error,
        } => format!(
            "{} {} ({}): {}",
            CROSS,
            style(function).red(),
            stage,
            style(error).dim()
        ),
        RolloutEvent::AllFunctionsDeployed { function_count } => format!(
            "{} All functions deployed ({})",
            CHECK,
            style(function_count).cyan()
        ),
        RolloutEvent::DeploymentCreated {
            deployment_id,
            stage,
            ..
        } => format!(
            "{} Deployed complete! Stage {} is live (deployment {})",
            ROCKET,
            style(stage).bold(),
            style(deployment_id).dim()
        ),
    }
}

/// Format a finished rollout as a short table
pub fn format_deployment_result(result: &DeploymentResult) -> String {
    let mut lines = vec![format!(
        "{} Stage {} deployed as {}",
        CHECK,
        style(&result.stage).bold(),
        style(&result.deployment_id).cyan()
    )];

    for function in &result.functions {
        let alias_note = if function.alias_created {
            style("new alias").yellow().to_string()
        } else {
            style("alias moved").dim().to_string()
        };
        lines.push(format!(
            "  {} → v{} ({})",
            style(&function.function_name).bold(),
            function.version,
            alias_note
        ));
    }

    if let Ok(duration) = result
        .completed_at
        .signed_duration_since(result.started_at)
        .to_std()
    {
        lines.push(format!("  Took {}", style(format_duration(duration)).dim()));
    }

    lines.join("\n")
}

pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
