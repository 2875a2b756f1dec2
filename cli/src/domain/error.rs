//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs` or `std::process`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::time::Duration;

use thiserror::Error;

// ── Step errors ───────────────────────────────────────────────────────────────

/// Failure of a single external command invoked by a scenario step.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("`{command}` exited with {}: {stderr}", code.map_or_else(|| "a signal".to_string(), |c| format!("code {c}")))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("`{command}` timed out after {}s", timeout.as_secs())]
    Timeout { command: String, timeout: Duration },
}

// ── Credential errors ─────────────────────────────────────────────────────────

/// The credentials returned for a service instance do not have the expected shape.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("credentials are missing required field '{0}'")]
    MissingField(&'static str),

    #[error("credentials field '{field}' is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("credentials are not a JSON object")]
    NotAnObject,

    #[error("cannot parse credentials: {0}")]
    Unparseable(String),
}

// ── Service instance errors ───────────────────────────────────────────────────

/// Errors related to service instance readiness.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("service instance '{name}' failed to create: {message}")]
    CreateFailed { name: String, message: String },

    #[error("service instance '{name}' not ready after {}s (last status: {last_status})", waited.as_secs())]
    NotReady {
        name: String,
        waited: Duration,
        last_status: String,
    },
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to loading and validating the test configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No config file at {0}. Pass --config or set MITS_CONFIG.")]
    Missing(String),

    #[error("Invalid config field '{field}': {reason}")]
    Invalid { field: String, reason: String },

    #[error("Unknown test '{name}'\n\nConfigured tests: {known}")]
    UnknownTest { name: String, known: String },
}
