//! The assertion layer.
//!
//! Every test body receives a [`TestContext`], the explicit handle to the
//! suite and procedure it runs in. Assertions start from
//! [`TestContext::expect`], which wraps the value under test and records
//! where the chain began; each comparison on the returned [`Expect`] either
//! returns `Ok(())` or a [`Fault::Assertion`] pointing at the failing
//! expression.
//!
//! ```rust
//! soaper::test! {
//!     fn arithmetic(ctx) {
//!         ctx.expect(2 + 2).equals(4)?;
//!         ctx.expect(0.1 + 0.2).approximately_equals(0.3, 5)?;
//!         ctx.expect(vec![1, 2, 3]).truthy()
//!     }
//! }
//! ```
//!
//! Scoped helpers live in the sub-modules: [`cases`] for the tabular case
//! runner, [`stdio`] for input substitution and output capture, [`raises`]
//! for expected faults.

pub mod cases;
pub mod raises;
pub mod stdio;
mod truthy;

use std::any::{type_name, TypeId};
use std::fmt::Debug;
use std::io::{self, BufRead, Write};
use std::panic::Location;

use serde::Serialize;

use crate::config::Config;
use crate::context::{SourceContext, Span};
use crate::diff::{equality_message, Diff, DiffStyle};
use crate::failure::{FailureRecord, Fault, TestResult};
use crate::palette::Palette;
use crate::tags::ProcedureInfo;

pub use cases::{call_with, Arguments, CallWith, Case, FunctionUnderTest};
pub use truthy::Truthy;

// ============================================================================
// TEST CONTEXT
// ============================================================================

/// Handle passed to every test body.
pub struct TestContext {
    suite: String,
    procedure: ProcedureInfo,
    config: Config,
    palette: Palette,
}

impl TestContext {
    /// Creates the context of one procedure run.
    pub fn new(
        suite: impl Into<String>,
        procedure: ProcedureInfo,
        config: Config,
        palette: Palette,
    ) -> Self {
        Self {
            suite: suite.into(),
            procedure,
            config,
            palette,
        }
    }

    pub fn suite(&self) -> &str {
        &self.suite
    }

    pub fn procedure(&self) -> &ProcedureInfo {
        &self.procedure
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn style(&self) -> DiffStyle {
        DiffStyle {
            palette: self.palette,
            tab_width: self.config.tab_width,
        }
    }

    /// Context of the running procedure, pointing at its first line.
    pub fn base_context(&self) -> SourceContext {
        SourceContext::new(self.suite.clone(), self.procedure)
    }

    /// Context of a failure reported from `at`.
    pub(crate) fn context_at(&self, at: &Location<'_>, span: Span) -> SourceContext {
        self.base_context().at_location(at, span)
    }

    #[track_caller]
    pub(crate) fn failure_here(&self, message: impl Into<String>) -> Fault {
        let at = Location::caller();
        Fault::Assertion(FailureRecord::new(
            self.context_at(at, Span::from_call_site(at)),
            message,
        ))
    }

    /// Starts an assertion chain on `value`.
    #[track_caller]
    pub fn expect<T>(&self, value: T) -> Expect<'_, T> {
        Expect {
            ctx: self,
            value,
            origin: Location::caller(),
        }
    }

    /// Fails the test unconditionally.
    #[track_caller]
    pub fn fail(&self, message: impl Into<String>) -> TestResult {
        Err(self.failure_here(message))
    }

    /// Fails the test when `condition` holds.
    #[track_caller]
    pub fn fail_if(&self, condition: bool, message: impl Into<String>) -> TestResult {
        if condition {
            return self.fail(message);
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Standard streams
    // ------------------------------------------------------------------------
    // These use the process's own stdin and stdout, the same streams
    // `with_stdin` and `expect_stdout` redirect.

    /// Reads one line of input without its line terminator.
    ///
    /// Hitting end of input before any byte is an `UnexpectedEof` error.
    pub fn input(&self) -> io::Result<String> {
        let mut line = String::new();
        if self.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "end of input",
            ));
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(line)
    }

    /// Appends one line of input, terminator included, to `buf`.
    pub fn read_line(&self, buf: &mut String) -> io::Result<usize> {
        io::stdin().lock().read_line(buf)
    }

    /// Writes `text` to the process's stdout and flushes it.
    pub fn print(&self, text: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(text.as_bytes())?;
        out.flush()
    }

    pub fn println(&self, text: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(text.as_bytes())?;
        out.write_all(b"\n")?;
        out.flush()
    }
}

// ============================================================================
// EXPECT
// ============================================================================

/// A value under test, bound to the context it is asserted in.
pub struct Expect<'a, T> {
    ctx: &'a TestContext,
    value: T,
    origin: &'static Location<'static>,
}

impl<'a, T> Expect<'a, T> {
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Fails with `message`, highlighting everything from the `expect` call
    /// to the end of the caller's line.
    #[track_caller]
    fn fail(&self, message: String) -> TestResult {
        let end = Location::caller();
        let context = self.ctx.context_at(end, Span::between(self.origin, end));
        Err(Fault::Assertion(FailureRecord::new(context, message)))
    }

    fn sides(&self, expected: &str, received: &str) -> String {
        let palette = self.ctx.palette();
        format!(
            "expected: {}\nreceived: {}",
            palette.expected.wrap(expected),
            palette.received.wrap(received)
        )
    }
}

impl<'a, T: PartialEq + Diff> Expect<'a, T> {
    /// Passes when the value equals `expected`; the failure carries a diff.
    #[track_caller]
    pub fn equals(&self, expected: T) -> TestResult {
        if self.value == expected {
            return Ok(());
        }
        self.fail(equality_message(&expected, &self.value, &self.ctx.style()))
    }
}

impl<'a, T: PartialEq + Debug> Expect<'a, T> {
    #[track_caller]
    pub fn not_equals(&self, other: T) -> TestResult {
        if self.value != other {
            return Ok(());
        }
        self.fail(format!(
            "expected values to not equal\n\n{}",
            self.sides(&format!("not {other:?}"), &format!("{:?}", self.value))
        ))
    }
}

impl<'a, 'v, U: Debug + ?Sized> Expect<'a, &'v U> {
    /// Passes when the value is the very same object as `other`.
    #[track_caller]
    pub fn identical(&self, other: &U) -> TestResult {
        if std::ptr::eq(self.value, other) {
            return Ok(());
        }
        let palette = self.ctx.palette();
        self.fail(format!(
            "expected values to be the same\n\n{}\n{}",
            palette
                .expected
                .wrap(&format!("- {other:?} at {:p}", other as *const U)),
            palette
                .received
                .wrap(&format!("+ {:?} at {:p}", self.value, self.value as *const U)),
        ))
    }

    #[track_caller]
    pub fn not_identical(&self, other: &U) -> TestResult {
        if !std::ptr::eq(self.value, other) {
            return Ok(());
        }
        self.fail(format!(
            "expected values to not be the same\n\n{}",
            self.sides(
                &format!("not {:p}", other as *const U),
                &format!("{:p}", self.value as *const U)
            )
        ))
    }
}

impl<'a, T: Truthy + Debug> Expect<'a, T> {
    #[track_caller]
    pub fn truthy(&self) -> TestResult {
        if self.value.is_truthy() {
            return Ok(());
        }
        self.fail(format!("expected a truthy value\n\nreceived: {:?}", self.value))
    }

    #[track_caller]
    pub fn falsy(&self) -> TestResult {
        if !self.value.is_truthy() {
            return Ok(());
        }
        self.fail(format!("expected a falsy value\n\nreceived: {:?}", self.value))
    }
}

impl<'a, T: PartialOrd + Debug> Expect<'a, T> {
    #[track_caller]
    pub fn less_than(&self, bound: T) -> TestResult {
        self.ordered(self.value < bound, "<", &bound)
    }

    #[track_caller]
    pub fn less_or_equal(&self, bound: T) -> TestResult {
        self.ordered(self.value <= bound, "<=", &bound)
    }

    #[track_caller]
    pub fn greater_than(&self, bound: T) -> TestResult {
        self.ordered(self.value > bound, ">", &bound)
    }

    #[track_caller]
    pub fn greater_or_equal(&self, bound: T) -> TestResult {
        self.ordered(self.value >= bound, ">=", &bound)
    }

    #[track_caller]
    fn ordered(&self, holds: bool, operator: &str, bound: &T) -> TestResult {
        if holds {
            return Ok(());
        }
        self.fail(self.sides(
            &format!("{operator} {bound:?}"),
            &format!("{:?}", self.value),
        ))
    }
}

/// Numbers [`Expect::approximately_equals`] accepts, compared as `f64`.
///
/// Integers beyond 2^53 in magnitude are rounded on conversion.
pub trait Approximate: Copy {
    fn to_f64(self) -> f64;
}

macro_rules! impl_approximate {
    ($($ty:ty),* $(,)?) => {
        $(impl Approximate for $ty {
            fn to_f64(self) -> f64 {
                self as f64
            }
        })*
    };
}

impl_approximate!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl<'a, T: Approximate> Expect<'a, T> {
    /// Passes when `|actual - expected| < 10^-precision / 2`.
    #[track_caller]
    pub fn approximately_equals(&self, expected: T, precision: i32) -> TestResult {
        let actual = self.value.to_f64();
        let expected = expected.to_f64();
        let difference = (actual - expected).abs();
        let max_difference = 10f64.powi(-precision) / 2.0;
        if difference < max_difference {
            return Ok(());
        }
        let palette = self.ctx.palette();
        self.fail(format!(
            "{}\n\nexpected precision: {precision}\nexpected difference: < {}\nreceived difference: {}",
            self.sides(&expected.to_string(), &actual.to_string()),
            palette.expected.wrap(&max_difference.to_string()),
            palette.received.wrap(&difference.to_string()),
        ))
    }
}

impl<'a, T: 'static> Expect<'a, T> {
    /// Passes when the value's type is exactly `U`.
    #[track_caller]
    pub fn has_type<U: 'static>(&self) -> TestResult {
        if TypeId::of::<T>() == TypeId::of::<U>() {
            return Ok(());
        }
        let palette = self.ctx.palette();
        self.fail(format!(
            "expected type: {}\nreceived type: {}",
            palette.expected.wrap(type_name::<U>()),
            palette.received.wrap(type_name::<T>()),
        ))
    }
}

impl<'a, T: Serialize> Expect<'a, T> {
    /// Passes when the value's serialized form has a field called `name`.
    #[track_caller]
    pub fn has_attribute(&self, name: &str) -> TestResult {
        match self.attributes() {
            Ok(fields) if fields.contains_key(name) => Ok(()),
            Ok(fields) => self.fail(missing_attribute(name, &fields)),
            Err(reason) => self.fail(reason),
        }
    }

    /// Passes when field `name` exists and serializes equal to `value`.
    #[track_caller]
    pub fn has_attribute_value<V: Serialize>(&self, name: &str, value: V) -> TestResult {
        let fields = match self.attributes() {
            Ok(fields) => fields,
            Err(reason) => return self.fail(reason),
        };
        let Some(actual) = fields.get(name) else {
            return self.fail(missing_attribute(name, &fields));
        };
        let expected = match serde_json::to_value(&value) {
            Ok(expected) => expected,
            Err(err) => return self.fail(format!("cannot serialize expected value: {err}")),
        };
        if *actual == expected {
            return Ok(());
        }
        let palette = self.ctx.palette();
        self.fail(format!(
            "expected value: {}\nreceived value: {}",
            palette.expected.wrap(&expected.to_string()),
            palette.received.wrap(&actual.to_string()),
        ))
    }

    fn attributes(&self) -> Result<serde_json::Map<String, serde_json::Value>, String> {
        match serde_json::to_value(&self.value) {
            Ok(serde_json::Value::Object(fields)) => Ok(fields),
            Ok(other) => Err(format!("expected a value with attributes, received {other}")),
            Err(err) => Err(format!("cannot inspect attributes: {err}")),
        }
    }
}

fn missing_attribute(name: &str, fields: &serde_json::Map<String, serde_json::Value>) -> String {
    let names: Vec<&str> = fields.keys().map(String::as_str).collect();
    format!(
        "expected attribute: {name}\nreceived attributes: [{}]",
        names.join(", ")
    )
}
