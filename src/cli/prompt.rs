//! Interactive environment selection

use crate::core::{Environment, EnvironmentRegistry};
use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Select};

/// Pick the target environment, asking only when none was requested
pub fn choose_environment<'a, F>(
    registry: &'a EnvironmentRegistry,
    requested: Option<&str>,
    ask: F,
) -> Result<&'a Environment>
where
    F: FnOnce(&[&str]) -> Result<usize>,
{
    if let Some(name) = requested {
        return registry.select(name);
    }

    let names = registry.names();
    let index = ask(&names)?;
    let name = names
        .get(index)
        .with_context(|| format!("No environment at position {}", index))?;
    registry.select(name)
}

/// Ask on the terminal which environment to deploy to
pub fn ask_environment(names: &[&str]) -> Result<usize> {
    Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Which environment?")
        .items(names)
        .default(0)
        .interact()
        .context("Environment selection aborted")
}
