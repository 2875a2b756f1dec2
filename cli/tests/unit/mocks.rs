//! Shared mock infrastructure for unit tests.
//!
//! `ScriptedRunner` records every `cf` call and answers from per-subcommand
//! queues, falling back to a successful empty result.

#![allow(clippy::expect_used, dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::net::IpAddr;
use std::process::{ExitStatus, Output};
use std::time::Duration;

use anyhow::Result;
use mits::application::ports::{CommandRunner, HostResolver, ProgressReporter};
use mits::domain::{MitsConfig, StepError, TestConfig};

// ── Output helpers ────────────────────────────────────────────────────────────

#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

pub const SERVICE_READY: &[u8] = b"Showing info of service x\n\nstatus:    create succeeded\nmessage:\n";
pub const SERVICE_IN_PROGRESS: &[u8] = b"status:    create in progress\n";
pub const SERVICE_KEY: &[u8] =
    b"Getting key k for service instance x as admin...\n\n{\n  \"host\": \"10.0.0.5\",\n  \"port\": 5432,\n  \"password\": \"pw\"\n}\n";

// ── Scripted runner ───────────────────────────────────────────────────────────

/// One recorded invocation.
#[derive(Debug, Clone)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
    /// Content of the rules file, captured while `create-security-group` ran.
    pub rules_file: Option<String>,
}

impl Call {
    pub fn subcommand(&self) -> &str {
        self.args.first().map_or("", String::as_str)
    }

    pub fn env(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A canned answer, rebuilt on every call so it can repeat.
enum Answer {
    Output(Output),
    Fail(String),
    TimeOut(Duration),
}

impl Answer {
    fn build(&self, subcommand: &str) -> Result<Output> {
        match self {
            Self::Output(output) => Ok(output.clone()),
            Self::Fail(message) => Err(anyhow::anyhow!("{message}")),
            Self::TimeOut(timeout) => Err(StepError::Timeout {
                command: format!("cf {subcommand}"),
                timeout: *timeout,
            }
            .into()),
        }
    }
}

#[derive(Default)]
pub struct ScriptedRunner {
    calls: RefCell<Vec<Call>>,
    script: RefCell<HashMap<String, VecDeque<Answer>>>,
}

impl ScriptedRunner {
    /// Runner answering `cf service` and `cf service-key` like a healthy broker.
    pub fn healthy() -> Self {
        let runner = Self::default();
        runner.respond("service", ok_output(SERVICE_READY));
        runner.respond("service-key", ok_output(SERVICE_KEY));
        runner
    }

    /// Queue `output` for the next call of `subcommand`. The last queued
    /// answer repeats.
    pub fn respond(&self, subcommand: &str, output: Output) {
        self.queue(subcommand, Answer::Output(output));
    }

    /// Make the next call of `subcommand` fail outright, like a spawn error.
    pub fn fail(&self, subcommand: &str, message: &str) {
        self.queue(subcommand, Answer::Fail(message.to_string()));
    }

    /// Make the next call of `subcommand` exceed its budget, the way
    /// `TokioCommandRunner` reports a killed child.
    pub fn time_out(&self, subcommand: &str, timeout: Duration) {
        self.queue(subcommand, Answer::TimeOut(timeout));
    }

    fn queue(&self, subcommand: &str, answer: Answer) {
        self.script
            .borrow_mut()
            .entry(subcommand.to_string())
            .or_default()
            .push_back(answer);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Subcommand of every call, in order.
    pub fn subcommands(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|c| c.subcommand().to_string())
            .collect()
    }

    pub fn calls_of(&self, subcommand: &str) -> Vec<Call> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.subcommand() == subcommand)
            .cloned()
            .collect()
    }

    fn answer(&self, subcommand: &str) -> Result<Output> {
        let mut script = self.script.borrow_mut();
        let Some(queue) = script.get_mut(subcommand) else {
            return Ok(ok_output(b"OK\n"));
        };
        if queue.len() > 1 {
            if let Some(answer) = queue.pop_front() {
                return answer.build(subcommand);
            }
        }
        queue
            .front()
            .map_or_else(|| Ok(ok_output(b"OK\n")), |a| a.build(subcommand))
    }
}

impl CommandRunner for ScriptedRunner {
    async fn run_with_env(
        &self,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
        _timeout: Duration,
    ) -> Result<Output> {
        let subcommand = args.first().copied().unwrap_or_default();
        let rules_file = (subcommand == "create-security-group")
            .then(|| args.get(2).and_then(|p| std::fs::read_to_string(p).ok()))
            .flatten();
        self.calls.borrow_mut().push(Call {
            program: program.to_string(),
            args: args.iter().map(ToString::to_string).collect(),
            env: env
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            rules_file,
        });
        self.answer(subcommand)
    }
}

// ── Resolver and reporter ────────────────────────────────────────────────────

pub struct FixedResolver(pub Vec<IpAddr>);

impl HostResolver for FixedResolver {
    async fn resolve(&self, _: &str) -> Result<Vec<IpAddr>> {
        Ok(self.0.clone())
    }
}

/// Resolver for tests where credentials carry literal IPs.
pub struct NoResolver;

impl HostResolver for NoResolver {
    async fn resolve(&self, host: &str) -> Result<Vec<IpAddr>> {
        anyhow::bail!("unexpected lookup of {host}")
    }
}

#[derive(Default)]
pub struct RecordingReporter {
    pub steps: RefCell<Vec<String>>,
    pub successes: RefCell<Vec<String>>,
    pub warnings: RefCell<Vec<String>>,
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.steps.borrow_mut().push(message.to_string());
    }
    fn success(&self, message: &str) {
        self.successes.borrow_mut().push(message.to_string());
    }
    fn warn(&self, message: &str) {
        self.warnings.borrow_mut().push(message.to_string());
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn postgres_test() -> TestConfig {
    let mut params = serde_json::Map::new();
    params.insert("version".to_string(), serde_json::json!("16"));
    TestConfig {
        enabled: true,
        class: "postgresql".to_string(),
        plan: "small".to_string(),
        app_path: "apps/postgresql".to_string(),
        params,
    }
}

pub fn config() -> MitsConfig {
    let mut config = MitsConfig {
        api: "https://api.example.com".to_string(),
        admin_user: "admin".to_string(),
        admin_password: "admin-secret".to_string(),
        broker_name: "minibroker".to_string(),
        ..MitsConfig::default()
    };
    config.tests.insert("postgresql".to_string(), postgres_test());
    config
}
