//! `SimpleAppAndService`: push an app, bind it to a fresh service instance,
//! open network access to the instance and start the app.
//!
//! Apps perform their own assertions against the bound service and must only
//! start successfully once those assertions pass, so a successful `cf start`
//! is the pass criterion.
//!
//! Every resource gets its teardown registered right after it is created.
//! Whatever step fails, the registered teardown runs in reverse order.

use std::cell::RefCell;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::Instrument as _;

use crate::application::ports::{
    AppOperations, HostResolver, ProgressReporter, SecurityGroupOperations, ServiceOperations,
};
use crate::application::services::expect_success;
use crate::application::services::security_group::{rule_for_credentials, stage_rules};
use crate::application::services::service_instance::ServiceInstance;
use crate::application::services::teardown::{TeardownReport, TeardownStack};
use crate::domain::{Lifecycle, ScenarioNames, TestConfig, Timeouts};

/// Environment variable through which the test app learns its service name.
pub const SERVICE_NAME_ENV: &str = "SERVICE_NAME";

/// External collaborators of a scenario.
///
/// `cf` acts as the space developer; `admin` is the elevated identity used
/// for security groups.
pub struct Platform<'a, C, A, H> {
    pub cf: &'a C,
    pub admin: &'a A,
    pub resolver: &'a H,
}

impl<C, A, H> Clone for Platform<'_, C, A, H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C, A, H> Copy for Platform<'_, C, A, H> {}

/// Where a scenario runs and with which broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioTarget<'a> {
    pub org: &'a str,
    pub space: &'a str,
    pub broker: &'a str,
}

/// What a scenario run did, successful or not.
#[derive(Debug, Serialize)]
pub struct ScenarioReport {
    pub test: String,
    pub names: ScenarioNames,
    pub passed: bool,
    pub error: Option<String>,
    pub teardown: TeardownReport,
    /// Output of `cf logs --recent`, captured during teardown.
    pub recent_logs: Option<String>,
}

/// Run `SimpleAppAndService` for one configured test.
///
/// Never returns early without running teardown: the step error, if any,
/// is recorded in the report.
pub async fn simple_app_and_service<C, A, H>(
    platform: Platform<'_, C, A, H>,
    reporter: &impl ProgressReporter,
    target: &ScenarioTarget<'_>,
    timeouts: &Timeouts,
    test_name: &str,
    test: &TestConfig,
) -> ScenarioReport
where
    C: AppOperations + ServiceOperations,
    A: SecurityGroupOperations,
    H: HostResolver,
{
    let names = ScenarioNames::generate(&test.class);
    let span = tracing::info_span!("scenario", test = test_name, app = %names.app);

    let recent_logs = RefCell::new(None);
    let mut stack = TeardownStack::new();

    let result = forward_steps(
        platform,
        reporter,
        target,
        timeouts,
        test,
        &names,
        &recent_logs,
        &mut stack,
    )
    .instrument(span.clone())
    .await;

    if let Err(e) = &result {
        tracing::error!(error = %format!("{e:#}"), "scenario failed");
        reporter.warn(&format!("{test_name} failed: {e:#}"));
    }
    let teardown = stack.run(reporter).instrument(span).await;
    if result.is_ok() {
        reporter.success(&format!("{test_name} passed"));
    }

    ScenarioReport {
        test: test_name.to_string(),
        names,
        passed: result.is_ok(),
        error: result.err().map(|e| format!("{e:#}")),
        teardown,
        recent_logs: recent_logs.into_inner(),
    }
}

#[allow(clippy::too_many_arguments, clippy::too_many_lines)]
async fn forward_steps<'s, C, A, H>(
    platform: Platform<'s, C, A, H>,
    reporter: &impl ProgressReporter,
    target: &ScenarioTarget<'_>,
    timeouts: &Timeouts,
    test: &TestConfig,
    names: &ScenarioNames,
    recent_logs: &'s RefCell<Option<String>>,
    stack: &mut TeardownStack<'s>,
) -> Result<()>
where
    C: AppOperations + ServiceOperations,
    A: SecurityGroupOperations,
    H: HostResolver,
{
    let Platform {
        cf,
        admin,
        resolver,
    } = platform;
    let short = timeouts.short();
    let org = target.org.to_string();
    let space = target.space.to_string();

    reporter.step("pushing the test app without starting");
    let output = cf
        .push_without_start(&names.app, &test.app_path, timeouts.cf_push())
        .await?;
    expect_success("cf push", output)?;
    let app = names.app.clone();
    stack.push(format!("delete app {app}"), short, async move {
        expect_success("cf delete", cf.delete_app(&app, short).await?).map(|_| ())
    });

    reporter.step(&format!(
        "setting the {SERVICE_NAME_ENV} environment variable in the app"
    ));
    let output = cf
        .set_env(&names.app, SERVICE_NAME_ENV, &names.service, short)
        .await?;
    expect_success("cf set-env", output)?;

    let service = ServiceInstance::new(&names.service, target.broker, &test.class, &test.plan);

    reporter.step("creating the service instance");
    service
        .create(cf, &test.params, timeouts.cf_create_service())
        .await?;
    let instance = service.clone();
    stack.push(
        format!("delete service {}", instance.name()),
        short,
        async move { instance.destroy(cf, short).await },
    );

    reporter.step("waiting for the service instance to become ready");
    service
        .wait_for_create(cf, timeouts.cf_create_service(), timeouts.poll_interval())
        .await?;

    reporter.step("binding the service instance to the app");
    service.bind(cf, &names.app, short).await?;
    let (instance, app) = (service.clone(), names.app.clone());
    stack.push(
        format!("unbind service {} from {app}", instance.name()),
        short,
        async move { instance.unbind(cf, &app, short).await },
    );

    reporter.step("creating and binding a security-group for the service instance");
    let credentials = service.credentials(cf, short).await?;
    let rule = rule_for_credentials(resolver, &credentials, &names.service).await?;
    let rules_file = stage_rules(&names.service, std::slice::from_ref(&rule))?;

    let created = admin
        .create_security_group(&names.security_group, rules_file.path(), short)
        .await;
    if let Err(e) = rules_file.close() {
        tracing::warn!(error = %e, "could not remove security group file");
    }
    expect_success("cf create-security-group", created?)?;
    let group = names.security_group.clone();
    stack.push(format!("delete security group {group}"), short, async move {
        expect_success(
            "cf delete-security-group",
            admin.delete_security_group(&group, short).await?,
        )
        .map(|_| ())
    });

    let output = admin
        .bind_security_group(&names.security_group, &org, &space, Lifecycle::Running, short)
        .await?;
    expect_success("cf bind-security-group", output)?;
    let group = names.security_group.clone();
    stack.push(
        format!("unbind security group {group}"),
        short,
        async move {
            let output = admin
                .unbind_security_group(&group, &org, &space, Lifecycle::Running, short)
                .await?;
            expect_success("cf unbind-security-group", output).map(|_| ())
        },
    );

    let app = names.app.clone();
    stack.push(format!("recent logs of {app}"), short, async move {
        let output = cf.recent_logs(&app, short).await?;
        let logs = String::from_utf8_lossy(&output.stdout).into_owned();
        tracing::info!(app = %app, "recent logs:\n{logs}");
        *recent_logs.borrow_mut() = Some(logs);
        expect_success("cf logs", output).map(|_| ())
    });

    reporter.step("starting the app");
    let output = cf
        .start(&names.app, timeouts.cf_start())
        .await
        .context("starting the app")?;
    expect_success("cf start", output)?;
    Ok(())
}
