//! Terminal output: progress lines, summaries and JSON documents.
//!
//! Everything except failures goes to stdout and is silenced by `--quiet`
//! (which `--json` implies). Failures always reach stderr.

pub mod human;
pub mod json;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::OwoColorize as _;
pub use reporter::TerminalReporter;
pub use styles::{Styles, Tone};

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Colors are used only on a TTY, and never with `--no-color` or `NO_COLOR`.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let colored = is_tty && !no_color && std::env::var_os("NO_COLOR").is_none();
        Self {
            styles: if colored {
                Styles::colored()
            } else {
                Styles::default()
            },
            is_tty,
            quiet,
        }
    }

    /// Render one progress line without printing it.
    #[must_use]
    pub fn format_line(&self, tone: Tone, msg: &str) -> String {
        format!(
            "{:width$}{} {msg}",
            "",
            tone.marker().style(self.styles.for_tone(tone)),
            width = tone.indent()
        )
    }

    /// Print a progress line. `Fail` goes to stderr and ignores `quiet`.
    pub fn line(&self, tone: Tone, msg: &str) {
        match tone {
            Tone::Fail => eprintln!("{}", self.format_line(tone, msg)),
            _ if self.quiet => {}
            _ => println!("{}", self.format_line(tone, msg)),
        }
    }

    pub fn step(&self, msg: &str) {
        self.line(Tone::Step, msg);
    }

    pub fn success(&self, msg: &str) {
        self.line(Tone::Pass, msg);
    }

    pub fn warn(&self, msg: &str) {
        self.line(Tone::Warn, msg);
    }

    pub fn error(&self, msg: &str) {
        self.line(Tone::Fail, msg);
    }

    pub fn info(&self, msg: &str) {
        self.line(Tone::Info, msg);
    }

    pub fn teardown(&self, label: &str) {
        self.line(Tone::Teardown, label);
    }

    pub fn header(&self, title: &str) {
        if !self.quiet {
            println!();
            println!("{}", title.style(self.styles.header));
        }
    }

    /// Print an aligned `key  value` pair.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {:<12} {value}", key.style(self.styles.key));
        }
    }
}
