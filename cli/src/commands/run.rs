//! `mits run` — execute the configured scenarios against a live platform.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::application::services::suite::run_suite;
use crate::infra::{CfCli, Identity, TokioCommandRunner, TokioHostResolver};
use crate::output::TerminalReporter;
use crate::output::json::format_run_report;

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Run only this test (repeatable); may name a disabled test
    #[arg(long = "only", value_name = "NAME")]
    pub only: Vec<String>,
}

/// Entry point for `mits run`.
///
/// Each identity gets its own temporary `CF_HOME`, removed when the run ends.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded, the test selection is
/// invalid or the `CF_HOME` directories cannot be created.
pub async fn run(app: &AppContext, args: &RunArgs) -> Result<ExitCode> {
    let config = app.config_store.load()?;

    let admin_home = tempfile::Builder::new()
        .prefix("mits-admin-")
        .tempdir()
        .context("creating admin CF_HOME")?;
    let user_home = tempfile::Builder::new()
        .prefix("mits-user-")
        .tempdir()
        .context("creating user CF_HOME")?;
    let admin_identity = Identity::new("admin", admin_home.path());
    let user_identity = Identity::new("user", user_home.path());

    let admin = CfCli::for_identity(TokioCommandRunner, &admin_identity);
    let user = admin.as_identity(&user_identity);
    let reporter = TerminalReporter::new(&app.output);

    let report = run_suite(
        &admin,
        &user,
        &TokioHostResolver,
        &reporter,
        &config,
        &args.only,
    )
    .await?;

    if app.is_json() {
        println!("{}", format_run_report(&report)?);
    } else {
        app.human().render_run_report(&report);
    }

    if report.passed() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
