//! Human-readable terminal renderer.

use crate::application::services::suite::RunReport;
use crate::application::services::teardown::TeardownOutcome;
use crate::domain::MitsConfig;
use crate::output::OutputContext;

/// Renders reports and config summaries as human-readable terminal output.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the end-of-run summary.
    pub fn render_run_report(&self, report: &RunReport) {
        self.ctx.header("Summary");
        if let (Some(org), Some(space)) = (&report.org, &report.space) {
            self.ctx.kv("Target:", &format!("{org} / {space}"));
        }
        if let Some(e) = &report.setup_error {
            self.ctx.error(&format!("suite setup failed: {e}"));
        }
        for scenario in &report.scenarios {
            if scenario.passed {
                self.ctx.success(&scenario.test);
            } else {
                self.ctx.error(&format!(
                    "{}: {}",
                    scenario.test,
                    scenario.error.as_deref().unwrap_or("failed")
                ));
            }
            for entry in scenario.teardown.failures() {
                self.ctx.warn(&format!(
                    "{}: teardown '{}' {}",
                    scenario.test,
                    entry.label,
                    outcome_text(&entry.outcome)
                ));
            }
        }
        for entry in report.suite_teardown.failures() {
            self.ctx
                .warn(&format!("suite teardown '{}' {}", entry.label, outcome_text(&entry.outcome)));
        }
        let total = report.scenarios.len();
        let failed = report.failed_count();
        self.ctx
            .kv("Result:", &format!("{} passed, {failed} failed", total - failed));
    }

    /// Render the configured tests and whether they run by default.
    pub fn render_tests(&self, config: &MitsConfig) {
        if config.tests.is_empty() {
            self.ctx.info("No tests configured.");
            return;
        }
        for (name, test) in &config.tests {
            let state = if test.enabled { "enabled" } else { "disabled" };
            self.ctx.kv(
                &format!("{name}:"),
                &format!("{} / {} ({state})", test.class, test.plan),
            );
        }
    }

    /// Render the validated configuration, without secrets.
    pub fn render_config(&self, config: &MitsConfig, path: &str) {
        self.ctx.success(&format!("{path} is valid"));
        self.ctx.kv("API:", &config.api);
        self.ctx.kv("Admin user:", &config.admin_user);
        self.ctx.kv("Broker:", &config.broker_name);
        let enabled = config.tests.values().filter(|t| t.enabled).count();
        self.ctx.kv(
            "Tests:",
            &format!("{enabled} enabled of {}", config.tests.len()),
        );
    }
}

fn outcome_text(outcome: &TeardownOutcome) -> String {
    match outcome {
        TeardownOutcome::Succeeded => "succeeded".to_string(),
        TeardownOutcome::Failed(e) => format!("failed: {e}"),
        TeardownOutcome::TimedOut => "timed out".to_string(),
    }
}
