//! Lifecycle of one service instance provisioned through the broker under test.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::time::Instant;

use crate::application::ports::{ServiceOperations, ServiceRequest};
use crate::application::services::expect_success;
use crate::domain::{Credentials, ServiceError, ServiceStatus};

/// A service instance identified by its generated name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInstance {
    name: String,
    broker: String,
    class: String,
    plan: String,
}

impl ServiceInstance {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        broker: impl Into<String>,
        class: impl Into<String>,
        plan: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            broker: broker.into(),
            class: class.into(),
            plan: plan.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the key created to read credentials.
    #[must_use]
    pub fn key_name(&self) -> String {
        format!("{}-key", self.name)
    }

    /// Request the instance from the broker.
    ///
    /// # Errors
    ///
    /// Returns an error if the params cannot be encoded or `create-service` fails.
    pub async fn create(
        &self,
        cf: &impl ServiceOperations,
        params: &serde_json::Map<String, serde_json::Value>,
        timeout: Duration,
    ) -> Result<()> {
        let params_json = serde_json::to_string(params).context("encoding service params")?;
        let request = ServiceRequest {
            class: &self.class,
            plan: &self.plan,
            name: &self.name,
            broker: &self.broker,
            params_json: &params_json,
        };
        let output = cf.create_service(&request, timeout).await?;
        expect_success("cf create-service", output)?;
        Ok(())
    }

    /// Poll `cf service` until the create operation succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::CreateFailed`] if the broker reports a failed
    /// create, [`ServiceError::NotReady`] when `timeout` elapses, or the
    /// error of a failing `cf service` call.
    pub async fn wait_for_create(
        &self,
        cf: &impl ServiceOperations,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let output = cf
                .service(&self.name, remaining.max(Duration::from_secs(1)))
                .await?;
            let output = expect_success("cf service", output)?;
            let status = ServiceStatus::parse(&String::from_utf8_lossy(&output.stdout));
            tracing::debug!(service = %self.name, status = status.label(), "polled service status");

            match status {
                ServiceStatus::Ready => return Ok(()),
                ServiceStatus::Failed { message } => {
                    return Err(ServiceError::CreateFailed {
                        name: self.name.clone(),
                        message,
                    }
                    .into());
                }
                ServiceStatus::InProgress | ServiceStatus::Unknown(_) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        return Err(ServiceError::NotReady {
                            name: self.name.clone(),
                            waited: timeout,
                            last_status: status.label().to_string(),
                        }
                        .into());
                    }
                    tokio::time::sleep(poll_interval.min(remaining)).await;
                }
            }
        }
    }

    /// Bind the instance to `app`.
    ///
    /// # Errors
    ///
    /// Returns an error if `bind-service` fails.
    pub async fn bind(
        &self,
        cf: &impl ServiceOperations,
        app: &str,
        timeout: Duration,
    ) -> Result<()> {
        let output = cf.bind_service(app, &self.name, timeout).await?;
        expect_success("cf bind-service", output)?;
        Ok(())
    }

    /// Remove the binding to `app`.
    ///
    /// # Errors
    ///
    /// Returns an error if `unbind-service` fails.
    pub async fn unbind(
        &self,
        cf: &impl ServiceOperations,
        app: &str,
        timeout: Duration,
    ) -> Result<()> {
        let output = cf.unbind_service(app, &self.name, timeout).await?;
        expect_success("cf unbind-service", output)?;
        Ok(())
    }

    /// Read the instance credentials through a short-lived service key.
    ///
    /// The key is deleted again once it was created, whether reading it
    /// succeeded or not. A failed deletion is logged, not returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the key cannot be created or read, or the
    /// credentials lack a valid `host`/`port`.
    pub async fn credentials(
        &self,
        cf: &impl ServiceOperations,
        timeout: Duration,
    ) -> Result<Credentials> {
        let key = self.key_name();
        let output = cf.create_service_key(&self.name, &key, timeout).await?;
        expect_success("cf create-service-key", output)?;

        let read = async {
            let output = cf.service_key(&self.name, &key, timeout).await?;
            let output = expect_success("cf service-key", output)?;
            let credentials =
                Credentials::from_service_key_output(&String::from_utf8_lossy(&output.stdout))
                    .with_context(|| format!("credentials of service {}", self.name))?;
            anyhow::Ok(credentials)
        }
        .await;

        let deleted = match cf.delete_service_key(&self.name, &key, timeout).await {
            Ok(output) => expect_success("cf delete-service-key", output).map(|_| ()),
            Err(e) => Err(e),
        };
        if let Err(e) = deleted {
            tracing::warn!(service = %self.name, %key, error = %format!("{e:#}"), "could not delete service key");
        }

        read
    }

    /// Delete the instance.
    ///
    /// # Errors
    ///
    /// Returns an error if `delete-service` fails.
    pub async fn destroy(&self, cf: &impl ServiceOperations, timeout: Duration) -> Result<()> {
        let output = cf.delete_service(&self.name, timeout).await?;
        expect_success("cf delete-service", output)?;
        Ok(())
    }
}
