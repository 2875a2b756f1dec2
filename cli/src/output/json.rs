//! JSON output helpers for `--json` code paths.

use anyhow::{Context, Result};

use crate::application::services::suite::RunReport;
use crate::domain::{ConfigError, CredentialsError, ServiceError, StepError};

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Machine-readable code for the outermost typed error in `err`'s chain.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    for cause in err.chain() {
        if cause.is::<ConfigError>() {
            return "CONFIG_ERROR";
        }
        if cause.is::<StepError>() {
            return "STEP_FAILED";
        }
        if cause.is::<ServiceError>() {
            return "SERVICE_ERROR";
        }
        if cause.is::<CredentialsError>() {
            return "CREDENTIALS_ERROR";
        }
    }
    "ERROR"
}

/// Format the full run report, including teardown outcomes and captured logs.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_run_report(report: &RunReport) -> Result<String> {
    let mut value = serde_json::to_value(report).context("JSON serialization failed")?;
    if let Some(obj) = value.as_object_mut() {
        obj.insert("passed".to_string(), serde_json::Value::Bool(report.passed()));
    }
    serde_json::to_string_pretty(&value).context("JSON serialization failed")
}
