//! Line tones and the stylesheet that colors them.

use owo_colors::Style;

/// Kind of a progress line; decides its marker and color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Step,
    Pass,
    Fail,
    Warn,
    Info,
    /// A cleanup action, printed one level deeper than scenario steps.
    Teardown,
}

impl Tone {
    #[must_use]
    pub fn marker(self) -> &'static str {
        match self {
            Self::Step => "→",
            Self::Pass => "✓",
            Self::Fail => "✗",
            Self::Warn => "⚠",
            Self::Info => "ℹ",
            Self::Teardown => "↺",
        }
    }

    /// Leading spaces before the marker.
    #[must_use]
    pub fn indent(self) -> usize {
        match self {
            Self::Teardown => 4,
            _ => 2,
        }
    }
}

/// Colors per tone, plus header and key styles. All plain by default.
#[derive(Default, Clone)]
pub struct Styles {
    pub step: Style,
    pub pass: Style,
    pub fail: Style,
    pub warn: Style,
    pub info: Style,
    pub teardown: Style,
    pub header: Style,
    pub key: Style,
}

impl Styles {
    /// Stylesheet for a color terminal.
    #[must_use]
    pub fn colored() -> Self {
        Self {
            step: Style::new().cyan(),
            pass: Style::new().green(),
            fail: Style::new().red(),
            warn: Style::new().yellow(),
            info: Style::new().blue(),
            teardown: Style::new().magenta(),
            header: Style::new().bold().cyan(),
            key: Style::new().dimmed(),
        }
    }

    #[must_use]
    pub fn for_tone(&self, tone: Tone) -> Style {
        match tone {
            Tone::Step => self.step,
            Tone::Pass => self.pass,
            Tone::Fail => self.fail,
            Tone::Warn => self.warn,
            Tone::Info => self.info,
            Tone::Teardown => self.teardown,
        }
    }
}
