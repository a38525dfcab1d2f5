//! Line-oriented console report.
//!
//! ```text
//!  Math
//! │ └─→ basic arithmetic
//! │
//! ├─ PASS  addition
//! ├─ FAIL  division "divides two numbers"
//! │ └─→ divides two numbers
//! │
//! │ in file: ./src/bin/soaper_demo.rs:41
//! │  41|    fn division(ctx) {
//! │  42|        ctx.expect(7 / 2).equals(4)
//! │
//! │ expected values to equal
//! │ ...
//! │
//! │
//! ├─ ✓ 1 pass  ✗ 1 fail
//! ╰─ ! 1 test skipped
//! ```
//!
//! Badges and structural text are colored through `termcolor`; diffs and
//! highlighted spans inside messages carry the markers of the run's
//! [`Palette`].

use std::io::{self, Write};

use termcolor::{Color, ColorSpec, WriteColor};

use crate::config::Config;
use crate::error::Result;
use crate::failure::FailureRecord;
use crate::palette::Palette;

use super::format::{indentation, one_line, split_lines, truncate};
use super::summary::{fails_text, passes_text, summary_lines, SummaryLine};
use super::{Outcome, RunTally, TestReport};

const GUTTER: &str = "│ ";

fn dimmed() -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_dimmed(true);
    spec
}

fn line_number() -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(Color::Black)).set_intense(true);
    spec
}

fn badge(outcome: Outcome) -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(Color::Black)).set_bg(Some(outcome.color()));
    spec
}

fn colored(color: Color) -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(color));
    spec
}

/// Writes one suite's report as the run progresses.
pub struct Reporter<'w> {
    out: &'w mut dyn WriteColor,
    config: &'w Config,
    palette: Palette,
}

impl<'w> Reporter<'w> {
    pub fn new(out: &'w mut dyn WriteColor, config: &'w Config, palette: Palette) -> Self {
        Self {
            out,
            config,
            palette,
        }
    }

    fn write_colored(&mut self, spec: &ColorSpec, text: &str) -> io::Result<()> {
        self.out.set_color(spec)?;
        write!(self.out, "{text}")?;
        self.out.reset()
    }

    fn gutter(&mut self) -> io::Result<()> {
        writeln!(self.out, "{GUTTER}")
    }

    pub fn suite_header(&mut self, name: &str, description: &str) -> io::Result<()> {
        let mut spec = ColorSpec::new();
        spec.set_bold(true)
            .set_fg(Some(Color::Black))
            .set_bg(Some(Color::White));
        self.write_colored(&spec, &format!(" {name} "))?;
        writeln!(self.out)?;

        let description = one_line(description);
        if self.config.show_suite_docstring && !description.is_empty() {
            write!(self.out, "{GUTTER}")?;
            self.write_colored(&dimmed(), &format!("└─→ {description}"))?;
            writeln!(self.out)?;
        }
        self.gutter()
    }

    /// Writes the entry of one finished procedure, if its outcome is shown.
    pub fn entry(&mut self, report: &TestReport) -> Result<()> {
        let shown = match report.outcome {
            Outcome::Pass => self.config.show_passes,
            Outcome::Skip => self.config.show_skips,
            Outcome::Fail => self.config.show_fails,
        };
        if !shown {
            return Ok(());
        }

        self.badge_line(report)?;
        if let Some(failure) = &report.failure {
            self.failure(failure)?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn badge_line(&mut self, report: &TestReport) -> io::Result<()> {
        write!(self.out, "├─")?;
        self.write_colored(&badge(report.outcome), &format!(" {} ", report.outcome.label()))?;
        write!(
            self.out,
            " {}",
            truncate(report.info.name, self.config.max_test_name_len)
        )?;

        let doc = one_line(report.info.doc);
        if self.config.show_test_docstrings && !doc.is_empty() {
            let doc = truncate(&doc, self.config.max_docstring_len);
            write!(self.out, " ")?;
            self.write_colored(&dimmed(), &format!("\"{doc}\""))?;
        }
        writeln!(self.out)
    }

    fn failure(&mut self, failure: &FailureRecord) -> Result<()> {
        let context = &failure.context;

        let doc = split_lines(context.doc());
        if self.config.show_fail_docstring && !doc.is_empty() {
            write!(self.out, "{GUTTER}")?;
            self.write_colored(&dimmed(), &format!("└─→ {}", doc.join("\n   ")))?;
            writeln!(self.out)?;
            self.gutter()?;
        }

        if self.config.show_fail_context {
            let window = context.window(self.palette.highlight)?;
            write!(self.out, "{GUTTER}")?;
            self.write_colored(
                &dimmed(),
                &format!("in file: {}:{}", context.relative_path(), context.line()),
            )?;
            writeln!(self.out)?;

            let mut lines: Vec<(usize, String)> = Vec::new();
            let mut previous_indent = String::new();
            for (number, line) in window.numbered() {
                if line.trim().is_empty() {
                    lines.push((number, previous_indent.clone()));
                } else {
                    previous_indent = indentation(line).to_string();
                    lines.push((number, line.to_string()));
                }
            }
            while lines.last().map_or(false, |(_, l)| l.trim().is_empty()) {
                lines.pop();
            }
            for (number, line) in &lines {
                self.context_line(*number, line)?;
            }
            self.gutter()?;
        }

        if self.config.show_fail_message && !failure.message.is_empty() {
            for line in failure.message.lines() {
                write!(self.out, "{GUTTER}")?;
                self.write_colored(&dimmed(), line)?;
                writeln!(self.out)?;
            }
            self.gutter()?;
        }
        Ok(())
    }

    /// One source line, with tabs expanded or drawn as arrows.
    fn context_line(&mut self, number: usize, line: &str) -> io::Result<()> {
        write!(self.out, "{GUTTER}")?;
        if self.config.show_context_line_numbers {
            self.write_colored(&line_number(), &format!("{number:>3}|"))?;
        }

        let width = self.config.tab_width;
        let mut pieces = line.split('\t');
        if let Some(first) = pieces.next() {
            self.write_colored(&dimmed(), first)?;
        }
        for piece in pieces {
            if self.config.tab_arrows {
                self.write_colored(&line_number(), "→")?;
                self.write_colored(&dimmed(), &" ".repeat(width.saturating_sub(1)))?;
            } else {
                self.write_colored(&dimmed(), &" ".repeat(width))?;
            }
            self.write_colored(&dimmed(), piece)?;
        }
        writeln!(self.out)
    }

    pub fn summary(&mut self, tally: &RunTally) -> io::Result<()> {
        self.gutter()?;
        let lines = summary_lines(tally);
        let last = lines.len() - 1;
        for (i, line) in lines.iter().enumerate() {
            write!(self.out, "{}", if i == last { "╰─ " } else { "├─ " })?;
            match line {
                SummaryLine::Counts { passes, fails } => {
                    self.write_colored(&colored(Color::Green), &passes_text(*passes))?;
                    write!(self.out, "  ")?;
                    let mut spec = colored(Color::Red);
                    spec.set_dimmed(*fails == 0);
                    self.write_colored(&spec, &fails_text(*fails))?;
                }
                other => {
                    let mut spec = colored(other.outcome().color());
                    spec.set_dimmed(true);
                    self.write_colored(&spec, &other.to_string())?;
                }
            }
            writeln!(self.out)?;
        }
        writeln!(self.out)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
