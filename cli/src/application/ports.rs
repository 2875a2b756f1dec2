//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::{Lifecycle, MitsConfig};

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program with extra environment variables and a timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned) and
    /// the error must downcast to `StepError::Timeout`.
    async fn run_with_env(
        &self,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<Output>;

    /// Run a program with the inherited environment.
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        self.run_with_env(program, args, &[], timeout).await
    }
}

impl<R: CommandRunner> CommandRunner for &R {
    async fn run_with_env(
        &self,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<Output> {
        (**self).run_with_env(program, args, env, timeout).await
    }
}

// ── Platform CLI Ports ────────────────────────────────────────────────────────
//
// Every method maps to exactly one `cf` invocation and returns its raw
// output. Exit codes are checked by the application services.

/// App lifecycle operations.
#[allow(async_fn_in_trait)]
pub trait AppOperations {
    /// Push an app from `path` without starting it.
    async fn push_without_start(&self, app: &str, path: &str, timeout: Duration)
    -> Result<Output>;
    async fn set_env(&self, app: &str, key: &str, value: &str, timeout: Duration)
    -> Result<Output>;
    async fn start(&self, app: &str, timeout: Duration) -> Result<Output>;
    /// Delete the app together with its routes.
    async fn delete_app(&self, app: &str, timeout: Duration) -> Result<Output>;
    async fn recent_logs(&self, app: &str, timeout: Duration) -> Result<Output>;
}

/// Parameters of a `create-service` call.
pub struct ServiceRequest<'a> {
    pub class: &'a str,
    pub plan: &'a str,
    pub name: &'a str,
    pub broker: &'a str,
    /// JSON object passed with `-c`.
    pub params_json: &'a str,
}

/// Service instance, binding and service key operations.
#[allow(async_fn_in_trait)]
pub trait ServiceOperations {
    async fn create_service(&self, request: &ServiceRequest<'_>, timeout: Duration)
    -> Result<Output>;
    /// Show the instance, including its last operation status.
    async fn service(&self, name: &str, timeout: Duration) -> Result<Output>;
    async fn delete_service(&self, name: &str, timeout: Duration) -> Result<Output>;
    async fn bind_service(&self, app: &str, service: &str, timeout: Duration) -> Result<Output>;
    async fn unbind_service(&self, app: &str, service: &str, timeout: Duration)
    -> Result<Output>;
    async fn create_service_key(&self, service: &str, key: &str, timeout: Duration)
    -> Result<Output>;
    async fn service_key(&self, service: &str, key: &str, timeout: Duration) -> Result<Output>;
    async fn delete_service_key(&self, service: &str, key: &str, timeout: Duration)
    -> Result<Output>;
}

/// Security group operations. These require an admin identity.
#[allow(async_fn_in_trait)]
pub trait SecurityGroupOperations {
    async fn create_security_group(&self, name: &str, rules_file: &Path, timeout: Duration)
    -> Result<Output>;
    async fn delete_security_group(&self, name: &str, timeout: Duration) -> Result<Output>;
    async fn bind_security_group(
        &self,
        name: &str,
        org: &str,
        space: &str,
        lifecycle: Lifecycle,
        timeout: Duration,
    ) -> Result<Output>;
    async fn unbind_security_group(
        &self,
        name: &str,
        org: &str,
        space: &str,
        lifecycle: Lifecycle,
        timeout: Duration,
    ) -> Result<Output>;
}

/// Session, org, space and user management used by the suite setup.
#[allow(async_fn_in_trait)]
pub trait SessionOperations {
    async fn api(&self, endpoint: &str, skip_ssl_validation: bool, timeout: Duration)
    -> Result<Output>;
    async fn auth(&self, user: &str, password: &str, timeout: Duration) -> Result<Output>;
    async fn target(&self, org: &str, space: &str, timeout: Duration) -> Result<Output>;
    async fn create_org(&self, org: &str, timeout: Duration) -> Result<Output>;
    async fn delete_org(&self, org: &str, timeout: Duration) -> Result<Output>;
    async fn create_space(&self, org: &str, space: &str, timeout: Duration) -> Result<Output>;
    async fn create_user(&self, user: &str, password: &str, timeout: Duration) -> Result<Output>;
    async fn delete_user(&self, user: &str, timeout: Duration) -> Result<Output>;
    async fn set_space_role(
        &self,
        user: &str,
        org: &str,
        space: &str,
        role: &str,
        timeout: Duration,
    ) -> Result<Output>;
    async fn enable_service_access(
        &self,
        class: &str,
        broker: &str,
        org: &str,
        timeout: Duration,
    ) -> Result<Output>;
}

/// Composite trait — any type implementing all four sub-traits is a `PlatformCli`.
pub trait PlatformCli:
    AppOperations + ServiceOperations + SecurityGroupOperations + SessionOperations
{
}

/// Blanket implementation: any type implementing all four sub-traits is a `PlatformCli`.
impl<T> PlatformCli for T where
    T: AppOperations + ServiceOperations + SecurityGroupOperations + SessionOperations
{
}

// ── Network Port ──────────────────────────────────────────────────────────────

/// Abstracts DNS resolution so scenarios can be tested without a resolver.
#[allow(async_fn_in_trait)]
pub trait HostResolver {
    /// Resolve `host` to every address it maps to.
    async fn resolve(&self, host: &str) -> Result<Vec<IpAddr>>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Announce a teardown action about to run.
    fn teardown(&self, label: &str) {
        self.step(&format!("teardown: {label}"));
    }
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts loading of the test configuration.
pub trait ConfigStore {
    /// Load and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable or invalid.
    fn load(&self) -> Result<MitsConfig>;
    /// Path the configuration is read from.
    ///
    /// # Errors
    ///
    /// Returns an error if no path can be determined.
    fn path(&self) -> Result<PathBuf>;
}
