//! The closing lines of a suite report.
//!
//! ```text
//! ├─ ✓ 3 passes  ✗ 1 fail
//! ├─ ! 1 test skipped
//! ╰─ ! 2 tests marked as failing
//! ```
//!
//! [`parse_summary`] reads the counts back out of rendered output, colored
//! or not.

use lazy_static::lazy_static;
use regex::Regex;

use super::{Outcome, RunTally};

lazy_static! {
    static ref ANSI_ESCAPE: Regex = Regex::new(r"\x1b\[[0-9;]*m").unwrap();
    static ref COUNTS: Regex = Regex::new(r"✓ (\d+) pass(?:es)?\s+✗ (\d+) fails?").unwrap();
    static ref SKIPS: Regex = Regex::new(r"! (\d+) tests? skipped").unwrap();
    static ref MARKED: Regex = Regex::new(r"! (\d+) tests? marked as failing").unwrap();
}

/// One summary line, without its tree prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryLine {
    /// `✓ N passes  ✗ M fails`
    Counts { passes: usize, fails: usize },
    /// `! N tests skipped`
    Skipped(usize),
    /// `! N tests marked as failing`
    Marked(usize),
}

impl SummaryLine {
    /// Color of the line's text.
    pub fn outcome(&self) -> Outcome {
        match self {
            SummaryLine::Counts { .. } => Outcome::Pass,
            SummaryLine::Skipped(_) | SummaryLine::Marked(_) => Outcome::Skip,
        }
    }
}

fn plural(count: usize, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 {
        one
    } else {
        many
    }
}

pub fn passes_text(passes: usize) -> String {
    format!("✓ {passes} {}", plural(passes, "pass", "passes"))
}

pub fn fails_text(fails: usize) -> String {
    format!("✗ {fails} {}", plural(fails, "fail", "fails"))
}

impl std::fmt::Display for SummaryLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            SummaryLine::Counts { passes, fails } => {
                write!(f, "{}  {}", passes_text(passes), fails_text(fails))
            }
            SummaryLine::Skipped(n) => {
                write!(f, "! {n} {} skipped", plural(n, "test", "tests"))
            }
            SummaryLine::Marked(n) => {
                write!(f, "! {n} {} marked as failing", plural(n, "test", "tests"))
            }
        }
    }
}

/// The lines summarizing `tally`. Skip and marked lines only appear when non-zero.
pub fn summary_lines(tally: &RunTally) -> Vec<SummaryLine> {
    let mut lines = vec![SummaryLine::Counts {
        passes: tally.passes,
        fails: tally.fails,
    }];
    if tally.skips > 0 {
        lines.push(SummaryLine::Skipped(tally.skips));
    }
    if tally.marked > 0 {
        lines.push(SummaryLine::Marked(tally.marked));
    }
    lines
}

/// Recovers the tally from rendered summary text. Returns `None` when the
/// pass/fail line is missing.
pub fn parse_summary(text: &str) -> Option<RunTally> {
    let plain = ANSI_ESCAPE.replace_all(text, "");
    let counts = COUNTS.captures(&plain)?;
    let number = |re: &Regex| -> usize {
        re.captures(&plain)
            .and_then(|c| c[1].parse().ok())
            .unwrap_or(0)
    };
    Some(RunTally {
        passes: counts[1].parse().ok()?,
        fails: counts[2].parse().ok()?,
        skips: number(&SKIPS),
        marked: number(&MARKED),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(tally: &RunTally) -> String {
        summary_lines(tally)
            .iter()
            .map(|line| format!("├─ {line}\n"))
            .collect()
    }

    #[test]
    fn singular_and_plural() {
        let tally = RunTally {
            passes: 1,
            fails: 2,
            skips: 1,
            marked: 0,
        };
        assert_eq!(render(&tally), "├─ ✓ 1 pass  ✗ 2 fails\n├─ ! 1 test skipped\n");
    }

    #[test]
    fn round_trip() {
        let tally = RunTally {
            passes: 12,
            fails: 1,
            skips: 3,
            marked: 2,
        };
        assert_eq!(parse_summary(&render(&tally)), Some(tally));
    }

    #[test]
    fn ansi_is_ignored() {
        let colored = "\x1b[32m✓ 0 passes\x1b[0m  \x1b[31m✗ 0 fails\x1b[0m";
        assert_eq!(parse_summary(colored), Some(RunTally::default()));
    }

    #[test]
    fn missing_counts_line() {
        assert_eq!(parse_summary("nothing here"), None);
    }
}
