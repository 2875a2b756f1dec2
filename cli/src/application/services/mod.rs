//! Application services — use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports` — never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

use std::process::Output;

use anyhow::Result;

use crate::domain::StepError;

pub mod scenario;
pub mod security_group;
pub mod service_instance;
pub mod suite;
pub mod teardown;

/// Turn a non-zero exit into a [`StepError::CommandFailed`].
///
/// # Errors
///
/// Returns an error if the command did not exit with status 0.
pub fn expect_success(command: &str, output: Output) -> Result<Output> {
    if output.status.success() {
        return Ok(output);
    }
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    // cf prints most failures on stdout.
    let detail = if stderr.is_empty() {
        last_lines(&String::from_utf8_lossy(&output.stdout), 5)
    } else {
        stderr
    };
    Err(StepError::CommandFailed {
        command: command.to_string(),
        code: output.status.code(),
        stderr: detail,
    }
    .into())
}

fn last_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.trim().lines().collect();
    lines[lines.len().saturating_sub(n)..].join("\n")
}
