//! Domain types and validators for the mits test configuration.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration, usually stored in `~/.mits/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MitsConfig {
    /// Cloud controller API endpoint, e.g. `https://api.bosh-lite.com`.
    pub api: String,
    pub admin_user: String,
    pub admin_password: String,
    pub skip_ssl_validation: bool,
    /// Prefix for suite-level names (org, space, user).
    pub name_prefix: String,
    /// Name of the service broker under test.
    pub broker_name: String,
    pub use_existing_organization: bool,
    pub existing_organization: String,
    pub existing_space: String,
    pub timeouts: Timeouts,
    /// Per-service scenarios, keyed by test name.
    pub tests: BTreeMap<String, TestConfig>,
}

impl Default for MitsConfig {
    fn default() -> Self {
        Self {
            api: String::new(),
            admin_user: String::new(),
            admin_password: String::new(),
            skip_ssl_validation: false,
            name_prefix: "MITS".to_string(),
            broker_name: String::new(),
            use_existing_organization: false,
            existing_organization: String::new(),
            existing_space: String::new(),
            timeouts: Timeouts::default(),
            tests: BTreeMap::new(),
        }
    }
}

/// Timeouts in seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Timeouts {
    pub cf_push: u64,
    pub cf_create_service: u64,
    pub cf_start: u64,
    /// Budget for every short CLI call (set-env, bind, key lookups, teardown).
    pub short: u64,
    pub poll_interval: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            cf_push: 300,
            cf_create_service: 600,
            cf_start: 600,
            short: 60,
            poll_interval: 5,
        }
    }
}

impl Timeouts {
    #[must_use]
    pub fn cf_push(&self) -> Duration {
        Duration::from_secs(self.cf_push)
    }

    #[must_use]
    pub fn cf_create_service(&self) -> Duration {
        Duration::from_secs(self.cf_create_service)
    }

    #[must_use]
    pub fn cf_start(&self) -> Duration {
        Duration::from_secs(self.cf_start)
    }

    #[must_use]
    pub fn short(&self) -> Duration {
        Duration::from_secs(self.short)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval)
    }
}

/// One `SimpleAppAndService` scenario against a service class.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct TestConfig {
    pub enabled: bool,
    /// Service offering name, also the prefix of every resource the scenario creates.
    pub class: String,
    pub plan: String,
    /// Directory of the test app to push.
    pub app_path: String,
    /// Arbitrary parameters passed to `create-service -c`.
    pub params: serde_json::Map<String, serde_json::Value>,
}

// ── Validators ───────────────────────────────────────────────────────────────

impl MitsConfig {
    /// Validate required fields, timeouts and every enabled test.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require("api", &self.api)?;
        require("admin_user", &self.admin_user)?;
        require("broker_name", &self.broker_name)?;
        require("name_prefix", &self.name_prefix)?;
        if self.use_existing_organization {
            require("existing_organization", &self.existing_organization)?;
            require("existing_space", &self.existing_space)?;
        }

        let t = &self.timeouts;
        for (field, value) in [
            ("timeouts.cf_push", t.cf_push),
            ("timeouts.cf_create_service", t.cf_create_service),
            ("timeouts.cf_start", t.cf_start),
            ("timeouts.short", t.short),
            ("timeouts.poll_interval", t.poll_interval),
        ] {
            if value == 0 {
                return Err(invalid(field, "must be greater than zero"));
            }
        }

        for (name, test) in self.tests.iter().filter(|(_, t)| t.enabled) {
            require(&format!("tests.{name}.class"), &test.class)?;
            require(&format!("tests.{name}.plan"), &test.plan)?;
            require(&format!("tests.{name}.app_path"), &test.app_path)?;
        }
        Ok(())
    }

    /// Tests to run: every enabled test, or exactly the named ones.
    ///
    /// Naming a test explicitly runs it even when it is disabled.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownTest`] for a name not in the config.
    pub fn selected_tests<'a>(
        &'a self,
        only: &[String],
    ) -> Result<Vec<(&'a str, &'a TestConfig)>, ConfigError> {
        if only.is_empty() {
            return Ok(self
                .tests
                .iter()
                .filter(|(_, t)| t.enabled)
                .map(|(n, t)| (n.as_str(), t))
                .collect());
        }
        only.iter()
            .map(|name| {
                self.tests
                    .get_key_value(name)
                    .map(|(n, t)| (n.as_str(), t))
                    .ok_or_else(|| ConfigError::UnknownTest {
                        name: name.clone(),
                        known: self.tests.keys().cloned().collect::<Vec<_>>().join(", "),
                    })
            })
            .collect()
    }
}

fn require(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(invalid(field, "must not be empty"));
    }
    Ok(())
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
