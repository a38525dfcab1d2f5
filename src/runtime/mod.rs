//! The suite runtime.
//!
//! A [`Suite`] runs its tagged procedures one after another, in declaration
//! order. Each procedure moves through
//!
//! ```text
//! Pending -> Running -> Passed | Failed | Skipped
//! ```
//!
//! Skipped procedures are never invoked. Everything a running procedure can
//! raise, whether an assertion failure, a propagated error or a panic, is
//! caught here and turned into exactly one [`FailureRecord`]. The report
//! entry for a procedure is written as soon as it reaches its final state.

pub mod format;
pub mod panic;
pub mod report;
pub mod summary;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use termcolor::{Color, ColorChoice, StandardStream, WriteColor};
use tracing::{debug, trace};

use crate::config::{Config, ConfigValue};
use crate::error::Result;
use crate::expect::TestContext;
use crate::failure::{FailureRecord, Fault, UncaughtFault};
use crate::palette::Palette;
use crate::tags::{Procedure, ProcedureInfo};

pub use report::Reporter;
pub use summary::{parse_summary, summary_lines};

// ============================================================================
// OUTCOMES AND TALLIES
// ============================================================================

/// Final state of one procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Outcome {
    Pass,
    Fail,
    Skip,
}

impl Outcome {
    /// Badge text shown in the report.
    pub fn label(self) -> &'static str {
        match self {
            Outcome::Pass => "PASS",
            Outcome::Fail => "FAIL",
            Outcome::Skip => "SKIP",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Outcome::Pass => Color::Green,
            Outcome::Fail => Color::Red,
            Outcome::Skip => Color::Yellow,
        }
    }
}

/// Counters of one suite run.
///
/// `passes + fails + skips` is the number of tagged procedures; `marked`
/// counts the expected-to-fail procedures that ran, whatever their outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunTally {
    pub passes: usize,
    pub fails: usize,
    pub skips: usize,
    pub marked: usize,
}

impl RunTally {
    pub fn total(&self) -> usize {
        self.passes + self.fails + self.skips
    }

    pub fn record(&mut self, report: &TestReport) {
        match report.outcome {
            Outcome::Pass => self.passes += 1,
            Outcome::Fail => self.fails += 1,
            Outcome::Skip => self.skips += 1,
        }
        if report.marked {
            self.marked += 1;
        }
    }
}

/// What happened to one procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestReport {
    pub info: ProcedureInfo,
    pub outcome: Outcome,
    /// Expected to fail and actually run.
    pub marked: bool,
    /// Present exactly when the outcome is [`Outcome::Fail`].
    pub failure: Option<FailureRecord>,
}

// ============================================================================
// SUITE
// ============================================================================

/// A named, ordered collection of procedures sharing one configuration.
#[derive(Debug)]
pub struct Suite {
    name: String,
    description: String,
    config: Config,
    procedures: Vec<Procedure>,
    done: AtomicBool,
}

impl Suite {
    pub fn builder(name: impl Into<String>) -> SuiteBuilder {
        SuiteBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The procedures tagged as tests, in declaration order.
    pub fn tests(&self) -> impl Iterator<Item = &Procedure> {
        self.procedures.iter().filter(|p| p.tags().is_test)
    }

    /// Whether at least one run has completed.
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Runs the suite, reporting to stdout. Color is used when stdout is a terminal.
    pub fn run(&self) -> Result<RunTally> {
        let choice = if atty::is(atty::Stream::Stdout) {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let mut stdout = StandardStream::stdout(choice);
        self.run_with(&mut stdout)
    }

    /// Runs the suite, reporting to `out`.
    pub fn run_with(&self, out: &mut dyn WriteColor) -> Result<RunTally> {
        let palette = Palette::for_color(out.supports_color());
        debug!(suite = %self.name, tests = self.tests().count(), "running suite");

        let mut reporter = Reporter::new(out, &self.config, palette);
        if self.config.show_suites {
            reporter.suite_header(&self.name, &self.description)?;
        }

        let mut tally = RunTally::default();
        for procedure in self.tests() {
            let report = self.execute(procedure, palette);
            trace!(
                suite = %self.name,
                test = procedure.name(),
                outcome = ?report.outcome,
                marked = report.marked,
                "test finished"
            );
            tally.record(&report);
            reporter.entry(&report)?;
        }

        self.done.store(true, Ordering::Release);
        if self.config.show_results {
            reporter.summary(&tally)?;
        }
        reporter.flush()?;

        debug!(
            suite = %self.name,
            passes = tally.passes,
            fails = tally.fails,
            skips = tally.skips,
            marked = tally.marked,
            "suite finished"
        );
        Ok(tally)
    }

    /// Runs one procedure and classifies its outcome.
    pub fn execute(&self, procedure: &Procedure, palette: Palette) -> TestReport {
        let info = *procedure.info();
        let tags = procedure.tags();
        if tags.is_skipped {
            return TestReport {
                info,
                outcome: Outcome::Skip,
                marked: false,
                failure: None,
            };
        }

        let ctx = TestContext::new(self.name.clone(), info, self.config.clone(), palette);
        let base = ctx.base_context();
        let body = procedure.body();
        let failure = match panic::catch(|| body(&ctx)) {
            Ok(Ok(())) => None,
            Ok(Err(fault)) => Some(fault.into_record(&base, &palette)),
            Err(caught) => {
                let fault = Fault::Uncaught(UncaughtFault::from_panic(caught.message, caught.origin));
                Some(fault.into_record(&base, &palette))
            }
        };

        let (outcome, failure) = match (tags.expect_failure, failure) {
            (false, None) => (Outcome::Pass, None),
            (false, Some(record)) => (Outcome::Fail, Some(record)),
            (true, Some(_)) => (Outcome::Pass, None),
            (true, None) => (
                Outcome::Fail,
                Some(FailureRecord::new(base, "expected to fail")),
            ),
        };

        TestReport {
            info,
            outcome,
            marked: tags.expect_failure,
            failure,
        }
    }
}

// ============================================================================
// SUITE BUILDER
// ============================================================================

/// Declares a suite.
///
/// ```rust
/// use soaper::Suite;
///
/// soaper::test! {
///     fn truth(ctx) {
///         ctx.expect(true).truthy()
///     }
/// }
///
/// let suite = Suite::builder("Basics")
///     .description("the obvious")
///     .set("autorun_tests", false)
///     .procedure(truth())
///     .build()
///     .unwrap();
/// assert_eq!(suite.tests().count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SuiteBuilder {
    name: String,
    description: String,
    yaml: Option<String>,
    overrides: Vec<(String, ConfigValue)>,
    procedures: Vec<Procedure>,
}

impl SuiteBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            yaml: None,
            overrides: Vec::new(),
            procedures: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Overrides one configuration key. Checked when the suite is built.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.overrides.push((key.into(), value.into()));
        self
    }

    /// Reads configuration overrides from a YAML mapping. Keys given with
    /// [`SuiteBuilder::set`] take precedence.
    pub fn config_yaml(mut self, text: impl Into<String>) -> Self {
        self.yaml = Some(text.into());
        self
    }

    pub fn procedure(mut self, procedure: Procedure) -> Self {
        self.procedures.push(procedure);
        self
    }

    pub fn procedures(mut self, procedures: impl IntoIterator<Item = Procedure>) -> Self {
        self.procedures.extend(procedures);
        self
    }

    /// Resolves the configuration and creates the suite.
    pub fn build(self) -> Result<Suite> {
        let mut config = match &self.yaml {
            Some(text) => Config::from_yaml(text)?,
            None => Config::default(),
        };
        for (key, value) in self.overrides {
            config.set(&key, value)?;
        }
        Ok(Suite {
            name: self.name,
            description: self.description,
            config,
            procedures: self.procedures,
            done: AtomicBool::new(false),
        })
    }

    /// Builds the suite and adds it to the process-wide registry, running it
    /// right away when `autorun_tests` is set.
    pub fn register(self) -> Result<Arc<Suite>> {
        crate::registry::register(self.build()?)
    }
}
