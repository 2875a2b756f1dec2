//! Stacked cleanup of externally created resources.
//!
//! A teardown action is pushed only once the resource it removes exists.
//! Actions are lazy futures: nothing runs until [`TeardownStack::run`],
//! which drains them last-registered first.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

use crate::application::ports::ProgressReporter;

type Action<'a> = Pin<Box<dyn Future<Output = Result<()>> + 'a>>;

struct Registered<'a> {
    label: String,
    timeout: Duration,
    action: Action<'a>,
}

/// LIFO stack of pending teardown actions.
#[derive(Default)]
pub struct TeardownStack<'a> {
    actions: Vec<Registered<'a>>,
}

/// Result of one teardown action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum TeardownOutcome {
    Succeeded,
    Failed(String),
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeardownEntry {
    pub label: String,
    pub outcome: TeardownOutcome,
}

/// Every action that ran, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeardownReport {
    pub entries: Vec<TeardownEntry>,
}

impl TeardownReport {
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.entries
            .iter()
            .all(|e| e.outcome == TeardownOutcome::Succeeded)
    }

    pub fn failures(&self) -> impl Iterator<Item = &TeardownEntry> {
        self.entries
            .iter()
            .filter(|e| e.outcome != TeardownOutcome::Succeeded)
    }

    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }
}

impl<'a> TeardownStack<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a teardown action bounded by `timeout`.
    pub fn push<F>(&mut self, label: impl Into<String>, timeout: Duration, action: F)
    where
        F: Future<Output = Result<()>> + 'a,
    {
        let label = label.into();
        tracing::debug!(%label, "registered teardown");
        self.actions.push(Registered {
            label,
            timeout,
            action: Box::pin(action),
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Run every registered action, most recent first.
    ///
    /// A failing or timed-out action is reported and the remaining actions
    /// still run.
    pub async fn run(mut self, reporter: &impl ProgressReporter) -> TeardownReport {
        let mut report = TeardownReport::default();
        while let Some(Registered {
            label,
            timeout,
            action,
        }) = self.actions.pop()
        {
            reporter.teardown(&label);
            let outcome = match tokio::time::timeout(timeout, action).await {
                Ok(Ok(())) => TeardownOutcome::Succeeded,
                Ok(Err(e)) => {
                    tracing::warn!(%label, error = %format!("{e:#}"), "teardown failed");
                    reporter.warn(&format!("teardown '{label}' failed: {e:#}"));
                    TeardownOutcome::Failed(format!("{e:#}"))
                }
                Err(_) => {
                    tracing::warn!(%label, timeout_secs = timeout.as_secs(), "teardown timed out");
                    reporter.warn(&format!(
                        "teardown '{label}' timed out after {}s",
                        timeout.as_secs()
                    ));
                    TeardownOutcome::TimedOut
                }
            };
            report.entries.push(TeardownEntry { label, outcome });
        }
        report
    }
}
