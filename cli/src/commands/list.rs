//! `mits list` — show the configured tests.

use std::process::ExitCode;

use anyhow::{Context, Result};

use crate::app::AppContext;
use crate::application::ports::ConfigStore;

/// Run the list command.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    let config = app.config_store.load()?;
    if app.is_json() {
        let tests: Vec<_> = config
            .tests
            .iter()
            .map(|(name, t)| {
                serde_json::json!({
                    "name": name,
                    "class": t.class,
                    "plan": t.plan,
                    "enabled": t.enabled,
                })
            })
            .collect();
        let out = serde_json::to_string_pretty(&serde_json::json!({ "tests": tests }))
            .context("JSON serialization failed")?;
        println!("{out}");
    } else {
        app.human().render_tests(&config);
    }
    Ok(ExitCode::SUCCESS)
}
