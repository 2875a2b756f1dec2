//! Infrastructure implementation of the platform CLI port traits.
//!
//! `CfCli<R>` routes all `cf` CLI calls through a `CommandRunner`. Each
//! instance is bound to one identity: a `CF_HOME` directory holding that
//! identity's login session. `as_identity` gives a scoped view that runs the
//! same runner under another identity.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{
    AppOperations, CommandRunner, SecurityGroupOperations, ServiceOperations, ServiceRequest,
    SessionOperations,
};
use crate::domain::Lifecycle;

/// Name of the platform CLI binary.
pub const CF_BINARY: &str = "cf";

/// A login session, identified by the `CF_HOME` directory the CLI keeps its
/// config in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub home: PathBuf,
}

impl Identity {
    #[must_use]
    pub fn new(name: impl Into<String>, home: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            home: home.into(),
        }
    }
}

/// Infrastructure adapter that routes all `cf` calls through a `CommandRunner`.
///
/// Generic over `R: CommandRunner` so that tests can inject a mock runner
/// without spawning real processes.
pub struct CfCli<R: CommandRunner> {
    runner: R,
    home: Option<PathBuf>,
}

impl<R: CommandRunner> CfCli<R> {
    /// CLI using the caller's own `CF_HOME`.
    pub fn new(runner: R) -> Self {
        Self { runner, home: None }
    }

    /// CLI bound to `identity`.
    pub fn for_identity(runner: R, identity: &Identity) -> Self {
        Self {
            runner,
            home: Some(identity.home.clone()),
        }
    }

    /// Borrow the same runner under another identity.
    pub fn as_identity(&self, identity: &Identity) -> CfCli<&R> {
        CfCli {
            runner: &self.runner,
            home: Some(identity.home.clone()),
        }
    }

    async fn cf(&self, args: &[&str], timeout: Duration) -> Result<Output> {
        self.cf_with_env(args, &[], timeout).await
    }

    async fn cf_with_env(
        &self,
        args: &[&str],
        extra_env: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<Output> {
        let home = self.home.as_deref().map(Path::to_string_lossy);
        let mut env: Vec<(&str, &str)> = vec![("CF_COLOR", "false")];
        if let Some(home) = home.as_deref() {
            env.push(("CF_HOME", home));
        }
        env.extend_from_slice(extra_env);
        let sub = args.first().copied().unwrap_or_default();
        self.runner
            .run_with_env(CF_BINARY, args, &env, timeout)
            .await
            .with_context(|| format!("cf {sub}"))
    }
}

impl<R: CommandRunner> AppOperations for CfCli<R> {
    async fn push_without_start(
        &self,
        app: &str,
        path: &str,
        timeout: Duration,
    ) -> Result<Output> {
        self.cf(&["push", app, "--no-start", "-p", path], timeout)
            .await
    }

    async fn set_env(
        &self,
        app: &str,
        key: &str,
        value: &str,
        timeout: Duration,
    ) -> Result<Output> {
        self.cf(&["set-env", app, key, value], timeout).await
    }

    async fn start(&self, app: &str, timeout: Duration) -> Result<Output> {
        self.cf(&["start", app], timeout).await
    }

    async fn delete_app(&self, app: &str, timeout: Duration) -> Result<Output> {
        self.cf(&["delete", app, "-r", "-f"], timeout).await
    }

    async fn recent_logs(&self, app: &str, timeout: Duration) -> Result<Output> {
        self.cf(&["logs", app, "--recent"], timeout).await
    }
}

impl<R: CommandRunner> ServiceOperations for CfCli<R> {
    async fn create_service(
        &self,
        request: &ServiceRequest<'_>,
        timeout: Duration,
    ) -> Result<Output> {
        self.cf(
            &[
                "create-service",
                request.class,
                request.plan,
                request.name,
                "-b",
                request.broker,
                "-c",
                request.params_json,
            ],
            timeout,
        )
        .await
    }

    async fn service(&self, name: &str, timeout: Duration) -> Result<Output> {
        self.cf(&["service", name], timeout).await
    }

    async fn delete_service(&self, name: &str, timeout: Duration) -> Result<Output> {
        self.cf(&["delete-service", name, "-f"], timeout).await
    }

    async fn bind_service(&self, app: &str, service: &str, timeout: Duration) -> Result<Output> {
        self.cf(&["bind-service", app, service], timeout).await
    }

    async fn unbind_service(
        &self,
        app: &str,
        service: &str,
        timeout: Duration,
    ) -> Result<Output> {
        self.cf(&["unbind-service", app, service, "-f"], timeout)
            .await
    }

    async fn create_service_key(
        &self,
        service: &str,
        key: &str,
        timeout: Duration,
    ) -> Result<Output> {
        self.cf(&["create-service-key", service, key], timeout).await
    }

    async fn service_key(&self, service: &str, key: &str, timeout: Duration) -> Result<Output> {
        self.cf(&["service-key", service, key], timeout).await
    }

    async fn delete_service_key(
        &self,
        service: &str,
        key: &str,
        timeout: Duration,
    ) -> Result<Output> {
        self.cf(&["delete-service-key", service, key, "-f"], timeout)
            .await
    }
}

impl<R: CommandRunner> SecurityGroupOperations for CfCli<R> {
    async fn create_security_group(
        &self,
        name: &str,
        rules_file: &Path,
        timeout: Duration,
    ) -> Result<Output> {
        let path = rules_file.to_string_lossy().into_owned();
        self.cf(&["create-security-group", name, path.as_str()], timeout)
            .await
    }

    async fn delete_security_group(&self, name: &str, timeout: Duration) -> Result<Output> {
        self.cf(&["delete-security-group", name, "-f"], timeout)
            .await
    }

    async fn bind_security_group(
        &self,
        name: &str,
        org: &str,
        space: &str,
        lifecycle: Lifecycle,
        timeout: Duration,
    ) -> Result<Output> {
        self.cf(
            &[
                "bind-security-group",
                name,
                org,
                space,
                "--lifecycle",
                lifecycle.as_str(),
            ],
            timeout,
        )
        .await
    }

    async fn unbind_security_group(
        &self,
        name: &str,
        org: &str,
        space: &str,
        lifecycle: Lifecycle,
        timeout: Duration,
    ) -> Result<Output> {
        self.cf(
            &[
                "unbind-security-group",
                name,
                org,
                space,
                "--lifecycle",
                lifecycle.as_str(),
            ],
            timeout,
        )
        .await
    }
}

impl<R: CommandRunner> SessionOperations for CfCli<R> {
    async fn api(
        &self,
        endpoint: &str,
        skip_ssl_validation: bool,
        timeout: Duration,
    ) -> Result<Output> {
        let mut args = vec!["api", endpoint];
        if skip_ssl_validation {
            args.push("--skip-ssl-validation");
        }
        self.cf(&args, timeout).await
    }

    /// Credentials go through `CF_USERNAME`/`CF_PASSWORD`, keeping the
    /// admin password off the command line.
    async fn auth(&self, user: &str, password: &str, timeout: Duration) -> Result<Output> {
        self.cf_with_env(
            &["auth"],
            &[("CF_USERNAME", user), ("CF_PASSWORD", password)],
            timeout,
        )
        .await
    }

    async fn target(&self, org: &str, space: &str, timeout: Duration) -> Result<Output> {
        self.cf(&["target", "-o", org, "-s", space], timeout).await
    }

    async fn create_org(&self, org: &str, timeout: Duration) -> Result<Output> {
        self.cf(&["create-org", org], timeout).await
    }

    async fn delete_org(&self, org: &str, timeout: Duration) -> Result<Output> {
        self.cf(&["delete-org", org, "-f"], timeout).await
    }

    async fn create_space(&self, org: &str, space: &str, timeout: Duration) -> Result<Output> {
        self.cf(&["create-space", space, "-o", org], timeout).await
    }

    /// `cf create-user` only takes the password positionally, so it is
    /// visible in the process list while the command runs. Callers pass
    /// the generated per-suite password here, never the admin one.
    async fn create_user(&self, user: &str, password: &str, timeout: Duration) -> Result<Output> {
        self.cf(&["create-user", user, password], timeout).await
    }

    async fn delete_user(&self, user: &str, timeout: Duration) -> Result<Output> {
        self.cf(&["delete-user", user, "-f"], timeout).await
    }

    async fn set_space_role(
        &self,
        user: &str,
        org: &str,
        space: &str,
        role: &str,
        timeout: Duration,
    ) -> Result<Output> {
        self.cf(&["set-space-role", user, org, space, role], timeout)
            .await
    }

    async fn enable_service_access(
        &self,
        class: &str,
        broker: &str,
        org: &str,
        timeout: Duration,
    ) -> Result<Output> {
        self.cf(
            &["enable-service-access", class, "-b", broker, "-o", org],
            timeout,
        )
        .await
    }
}
