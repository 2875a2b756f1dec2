//! Reproducible suite setup: a throwaway org, space and user per run, and the
//! scenarios executed inside them.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::Result;
use serde::Serialize;
use tracing::Instrument as _;

use crate::application::ports::{HostResolver, PlatformCli, ProgressReporter, SessionOperations};
use crate::application::services::expect_success;
use crate::application::services::scenario::{
    Platform, ScenarioReport, ScenarioTarget, simple_app_and_service,
};
use crate::application::services::teardown::{TeardownReport, TeardownStack};
use crate::domain::names::random_suffix;
use crate::domain::{MitsConfig, SuiteNames};

/// Role granted to the test user in the test space.
pub const SPACE_ROLE: &str = "SpaceDeveloper";

/// Org, space and user the scenarios run as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteContext {
    pub org: String,
    pub space: String,
    pub user: String,
}

/// Outcome of a whole `mits run`.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub org: Option<String>,
    pub space: Option<String>,
    pub scenarios: Vec<ScenarioReport>,
    pub suite_teardown: TeardownReport,
    pub setup_error: Option<String>,
}

impl RunReport {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.setup_error.is_none() && self.scenarios.iter().all(|s| s.passed)
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.scenarios.iter().filter(|s| !s.passed).count()
    }
}

/// Log both identities in, create (or reuse) the org and space, create the
/// test user and open service access for every selected class.
///
/// Suite-level resources get their teardown pushed onto `stack` as soon as
/// they exist.
///
/// # Errors
///
/// Returns the first failing setup command.
pub async fn setup<'s, A, U>(
    admin: &'s A,
    user_cli: &U,
    reporter: &impl ProgressReporter,
    config: &MitsConfig,
    classes: &[&str],
    stack: &mut TeardownStack<'s>,
) -> Result<SuiteContext>
where
    A: SessionOperations,
    U: SessionOperations,
{
    let short = config.timeouts.short();
    let names = SuiteNames::generate(&config.name_prefix);
    let password = format!("{}{}", random_suffix(), random_suffix());

    reporter.step(&format!("logging in to {} as admin", config.api));
    expect_success(
        "cf api",
        admin
            .api(&config.api, config.skip_ssl_validation, short)
            .await?,
    )?;
    expect_success(
        "cf auth",
        admin
            .auth(&config.admin_user, &config.admin_password, short)
            .await?,
    )?;

    let (org, space) = if config.use_existing_organization {
        reporter.step(&format!(
            "using existing org {} and space {}",
            config.existing_organization, config.existing_space
        ));
        (
            config.existing_organization.clone(),
            config.existing_space.clone(),
        )
    } else {
        reporter.step(&format!("creating org {}", names.org));
        expect_success("cf create-org", admin.create_org(&names.org, short).await?)?;
        let org = names.org.clone();
        stack.push(format!("delete org {org}"), short, async move {
            expect_success("cf delete-org", admin.delete_org(&org, short).await?).map(|_| ())
        });

        reporter.step(&format!("creating space {}", names.space));
        expect_success(
            "cf create-space",
            admin.create_space(&names.org, &names.space, short).await?,
        )?;
        (names.org.clone(), names.space.clone())
    };

    reporter.step(&format!("creating user {}", names.user));
    expect_success(
        "cf create-user",
        admin.create_user(&names.user, &password, short).await?,
    )?;
    let user = names.user.clone();
    stack.push(format!("delete user {user}"), short, async move {
        expect_success("cf delete-user", admin.delete_user(&user, short).await?).map(|_| ())
    });

    expect_success(
        "cf set-space-role",
        admin
            .set_space_role(&names.user, &org, &space, SPACE_ROLE, short)
            .await?,
    )?;

    for class in classes {
        reporter.step(&format!("enabling service access to {class}"));
        expect_success(
            "cf enable-service-access",
            admin
                .enable_service_access(class, &config.broker_name, &org, short)
                .await?,
        )?;
    }

    reporter.step(&format!("logging in as {}", names.user));
    expect_success(
        "cf api",
        user_cli
            .api(&config.api, config.skip_ssl_validation, short)
            .await?,
    )?;
    expect_success("cf auth", user_cli.auth(&names.user, &password, short).await?)?;
    expect_success("cf target", user_cli.target(&org, &space, short).await?)?;

    Ok(SuiteContext {
        org,
        space,
        user: names.user,
    })
}

/// Run the selected scenarios inside a fresh suite and tear the suite down.
///
/// One failing scenario does not stop the next one. Suite teardown runs
/// even when setup failed halfway.
///
/// # Errors
///
/// Returns an error only if the test selection is invalid; platform
/// failures are recorded in the report.
pub async fn run_suite<A, U, H>(
    admin: &A,
    user_cli: &U,
    resolver: &H,
    reporter: &impl ProgressReporter,
    config: &MitsConfig,
    only: &[String],
) -> Result<RunReport>
where
    A: PlatformCli,
    U: PlatformCli,
    H: HostResolver,
{
    let selected = config.selected_tests(only)?;
    let mut classes: Vec<&str> = selected.iter().map(|(_, t)| t.class.as_str()).collect();
    classes.sort_unstable();
    classes.dedup();

    let mut stack = TeardownStack::new();
    let setup_result = setup(admin, user_cli, reporter, config, &classes, &mut stack)
        .instrument(tracing::info_span!("suite_setup"))
        .await;

    let mut report = RunReport {
        org: None,
        space: None,
        scenarios: Vec::new(),
        suite_teardown: TeardownReport::default(),
        setup_error: None,
    };

    match setup_result {
        Ok(ctx) => {
            report.org = Some(ctx.org.clone());
            report.space = Some(ctx.space.clone());
            let target = ScenarioTarget {
                org: &ctx.org,
                space: &ctx.space,
                broker: &config.broker_name,
            };
            let platform = Platform {
                cf: user_cli,
                admin,
                resolver,
            };
            for (name, test) in selected {
                reporter.step(&format!("running {name}"));
                let scenario = simple_app_and_service(
                    platform,
                    reporter,
                    &target,
                    &config.timeouts,
                    name,
                    test,
                )
                .await;
                report.scenarios.push(scenario);
            }
        }
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "suite setup failed");
            reporter.warn(&format!("suite setup failed: {e:#}"));
            report.setup_error = Some(format!("{e:#}"));
        }
    }

    report.suite_teardown = stack.run(reporter).await;
    Ok(report)
}
