use std::fmt;

use crate::cue_index::CueWindow;

// @module: Three-line lyric display

/// Marker shown on the current line when no cue is active
pub const IDLE_MARKER: &str = "♪";

/// Content of the middle, highlighted line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurrentLine {
    /// A cue is active; its text may legitimately be blank
    Lyric(String),
    /// Nothing is playing at this position
    Idle,
}

impl CurrentLine {
    /// Text to print, substituting `idle_marker` when idle
    pub fn text_or<'a>(&'a self, idle_marker: &'a str) -> &'a str {
        match self {
            CurrentLine::Lyric(text) => text,
            CurrentLine::Idle => idle_marker,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, CurrentLine::Idle)
    }
}

/// Display triple for the teleprompter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeleprompterView {
    /// Faded line above, empty when there is none
    pub previous: String,
    /// Highlighted line
    pub current: CurrentLine,
    /// Faded line below, empty when there is none
    pub next: String,
}

impl TeleprompterView {
    /// The three printable lines, top to bottom
    pub fn lines<'a>(&'a self, idle_marker: &'a str) -> [&'a str; 3] {
        [&self.previous, self.current.text_or(idle_marker), &self.next]
    }
}

impl fmt::Display for TeleprompterView {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for line in self.lines(IDLE_MARKER) {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Build the display triple from optional cue texts
pub fn render(previous: Option<&str>, current: Option<&str>, next: Option<&str>) -> TeleprompterView {
    TeleprompterView {
        previous: previous.unwrap_or_default().to_string(),
        current: match current {
            Some(text) => CurrentLine::Lyric(text.to_string()),
            None => CurrentLine::Idle,
        },
        next: next.unwrap_or_default().to_string(),
    }
}

/// Render a resolved cue window
pub fn render_window(window: &CueWindow<'_>) -> TeleprompterView {
    render(
        window.previous.map(|c| c.text.as_str()),
        window.current.map(|c| c.text.as_str()),
        window.next.map(|c| c.text.as_str()),
    )
}
