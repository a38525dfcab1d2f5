//! Inline markers embedded into rendered diffs, context windows and failure
//! messages.
//!
//! Badges and headers are colored through `termcolor`, but diff output is a
//! plain `String` built long before it reaches a writer, so the regions it
//! highlights carry their own open/close markers. When the report target
//! supports color the markers are ANSI escapes; otherwise they are visible
//! guillemets so the highlighted region survives in logs.

/// A pair of strings wrapped around a highlighted region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Markers {
    pub open: &'static str,
    pub close: &'static str,
}

impl Markers {
    pub const NONE: Markers = Markers { open: "", close: "" };

    pub const fn new(open: &'static str, close: &'static str) -> Self {
        Self { open, close }
    }

    /// Wraps `text` in this marker pair.
    pub fn wrap(&self, text: &str) -> String {
        format!("{}{}{}", self.open, text, self.close)
    }
}

/// The full set of markers used while rendering one suite run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Differing regions inside a diff.
    pub inverse: Markers,
    /// The failing span inside a context window.
    pub highlight: Markers,
    /// The expected side of a comparison.
    pub expected: Markers,
    /// The received side of a comparison.
    pub received: Markers,
}

impl Palette {
    pub const ANSI: Palette = Palette {
        inverse: Markers::new("\x1b[7m", "\x1b[27m"),
        highlight: Markers::new("\x1b[31m", "\x1b[39m"),
        expected: Markers::new("\x1b[32m", "\x1b[39m"),
        received: Markers::new("\x1b[31m", "\x1b[39m"),
    };

    pub const PLAIN: Palette = Palette {
        inverse: Markers::new("«", "»"),
        highlight: Markers::new("«", "»"),
        expected: Markers::NONE,
        received: Markers::NONE,
    };

    /// Picks the ANSI palette when the target renders color.
    pub fn for_color(color: bool) -> Self {
        if color {
            Self::ANSI
        } else {
            Self::PLAIN
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::PLAIN
    }
}
