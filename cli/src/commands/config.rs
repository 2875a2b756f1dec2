//! `mits config` — inspect the test configuration.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Load and validate the configuration
    Validate,
    /// Print where the configuration is read from
    Path,
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the config is missing or invalid.
pub fn run(app: &AppContext, cmd: &ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Validate => validate(app),
        ConfigCommand::Path => {
            println!("{}", app.config_store.path()?.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn validate(app: &AppContext) -> Result<ExitCode> {
    let config = app.config_store.load()?;
    let path = app.config_store.path()?.display().to_string();
    if app.is_json() {
        let enabled: Vec<&str> = config
            .selected_tests(&[])?
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        let out = serde_json::to_string_pretty(&serde_json::json!({
            "valid": true,
            "path": path,
            "api": config.api,
            "broker_name": config.broker_name,
            "enabled_tests": enabled,
        }))
        .context("JSON serialization failed")?;
        println!("{out}");
    } else {
        app.human().render_config(&config, &path);
    }
    Ok(ExitCode::SUCCESS)
}
