//! `ProgressReporter` for the terminal.
//!
//! Application services report through the port; this adapter turns their
//! events into `OutputContext` lines.

use crate::application::ports::ProgressReporter;
use crate::output::OutputContext;

pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
}

impl<'a> TerminalReporter<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        self.ctx.step(message);
    }

    fn success(&self, message: &str) {
        self.ctx.success(message);
    }

    fn warn(&self, message: &str) {
        self.ctx.warn(message);
    }

    fn teardown(&self, label: &str) {
        self.ctx.teardown(label);
    }
}
