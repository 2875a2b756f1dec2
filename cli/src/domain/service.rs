//! Service instance status as reported by `cf service <name>`.

use std::sync::LazyLock;

use regex::Regex;

/// `status:` line of the last-operation block.
static STATUS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: this is a compile-time constant pattern — cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"(?m)^[ \t]*status:[ \t]*(.+?)[ \t]*$").expect("valid regex")
});

static MESSAGE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"(?m)^[ \t]*message:[ \t]*(.*?)[ \t]*$").expect("valid regex")
});

/// Last-operation status of a service instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceStatus {
    Ready,
    InProgress,
    Failed { message: String },
    Unknown(String),
}

impl ServiceStatus {
    /// Parse the human-readable output of `cf service`.
    ///
    /// Only the create operation is interpreted; any other status string is
    /// reported as `Unknown` so callers keep polling until their deadline.
    #[must_use]
    pub fn parse(stdout: &str) -> Self {
        let Some(status) = capture(&STATUS_LINE, stdout) else {
            return Self::Unknown(String::new());
        };
        match status.to_ascii_lowercase().as_str() {
            "create succeeded" => Self::Ready,
            "create in progress" => Self::InProgress,
            "create failed" => Self::Failed {
                message: capture(&MESSAGE_LINE, stdout).unwrap_or_default(),
            },
            _ => Self::Unknown(status),
        }
    }

    /// Short label used in logs and timeout errors.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Ready => "create succeeded",
            Self::InProgress => "create in progress",
            Self::Failed { .. } => "create failed",
            Self::Unknown(s) if s.is_empty() => "unknown",
            Self::Unknown(s) => s,
        }
    }
}

fn capture(re: &Regex, haystack: &str) -> Option<String> {
    re.captures(haystack)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
