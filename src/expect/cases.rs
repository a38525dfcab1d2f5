//! Tabular case runner: one function under test, many argument rows.
//!
//! ```rust
//! use soaper::call_with;
//!
//! fn add(a: i32, b: i32) -> i32 {
//!     a + b
//! }
//!
//! soaper::test! {
//!     fn addition(ctx) {
//!         ctx.function(add)
//!             .describe("{} + {} should be {}")
//!             .run_with_cases([
//!                 call_with((0, 0)).returns(0),
//!                 call_with((1, 1)).returns(2),
//!                 call_with((2, -2)).returns(0),
//!             ])
//!     }
//! }
//! ```
//!
//! Every case runs, even after an earlier one failed. Mismatched returns and
//! panics of the function under test are collected and reported together as
//! a single [`Fault::Aggregate`].

use std::fmt::Debug;
use std::panic::Location;

use crate::context::Span;
use crate::failure::{FailureRecord, Fault, TestResult};
use crate::runtime::panic;

use super::TestContext;

/// Argument tuples a function can be called with.
///
/// Implemented for tuples of up to six `Clone + Debug` elements, where
/// `F` is any `Fn` taking exactly those arguments.
pub trait Arguments<F> {
    type Output;

    fn apply(&self, function: &F) -> Self::Output;

    /// Each argument in `Debug` form.
    fn render(&self) -> Vec<String>;
}

macro_rules! impl_arguments {
    ($($arg:ident . $idx:tt),*) => {
        impl<Func, Ret, $($arg),*> Arguments<Func> for ($($arg,)*)
        where
            Func: Fn($($arg),*) -> Ret,
            $($arg: Clone + Debug,)*
        {
            type Output = Ret;

            fn apply(&self, function: &Func) -> Ret {
                function($(self.$idx.clone()),*)
            }

            fn render(&self) -> Vec<String> {
                vec![$(format!("{:?}", self.$idx)),*]
            }
        }
    };
}

impl_arguments!();
impl_arguments!(A.0);
impl_arguments!(A.0, B.1);
impl_arguments!(A.0, B.1, C.2);
impl_arguments!(A.0, B.1, C.2, D.3);
impl_arguments!(A.0, B.1, C.2, D.3, E.4);
impl_arguments!(A.0, B.1, C.2, D.3, E.4, G.5);

/// The argument half of a case; finish it with [`CallWith::returns`].
#[derive(Debug, Clone)]
pub struct CallWith<A> {
    args: A,
}

/// Starts a case with the given argument tuple.
pub fn call_with<A>(args: A) -> CallWith<A> {
    CallWith { args }
}

impl<A> CallWith<A> {
    pub fn returns<R>(self, expected: R) -> Case<A, R> {
        Case {
            args: self.args,
            expected,
        }
    }
}

/// One row of the table: arguments and the expected return value.
#[derive(Debug, Clone)]
pub struct Case<A, R> {
    pub args: A,
    pub expected: R,
}

/// A function bound to the context it is tested in.
pub struct FunctionUnderTest<'a, F> {
    ctx: &'a TestContext,
    function: F,
    description: Option<String>,
}

impl TestContext {
    /// Starts a tabular run of `function`.
    pub fn function<F>(&self, function: F) -> FunctionUnderTest<'_, F> {
        FunctionUnderTest {
            ctx: self,
            function,
            description: None,
        }
    }
}

impl<'a, F> FunctionUnderTest<'a, F> {
    /// Sets the message of a failing case. Each `{}` is replaced in turn by
    /// the arguments and then the expected value.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Runs every case, then fails once if any of them failed.
    #[track_caller]
    pub fn run_with_cases<A, R, I>(self, cases: I) -> TestResult
    where
        A: Arguments<F, Output = R>,
        R: PartialEq + Debug,
        I: IntoIterator<Item = Case<A, R>>,
    {
        let at = Location::caller();
        let context = self.ctx.context_at(at, Span::from_call_site(at));
        let received = self.ctx.palette().received;

        let mut failures = Vec::new();
        for case in cases {
            match panic::catch(|| case.args.apply(&self.function)) {
                Ok(returned) if returned == case.expected => {}
                Ok(returned) => {
                    let message = format!(
                        "{}\n  received: {}",
                        self.case_message(&case),
                        received.wrap(&format!("{returned:?}"))
                    );
                    failures.push(FailureRecord::new(context.clone(), message));
                }
                Err(caught) => {
                    let case_context = match &caught.origin {
                        Some(origin) => context.clone().anchored(
                            &origin.file,
                            origin.line,
                            Span::whole_line(origin.line),
                        ),
                        None => context.clone(),
                    };
                    let message = format!(
                        "{}\n  {}",
                        self.case_message(&case),
                        received.wrap(&format!("panic: {}", caught.message))
                    );
                    failures.push(FailureRecord::new(case_context, message));
                }
            }
        }

        if failures.is_empty() {
            return Ok(());
        }
        Err(Fault::Aggregate { context, failures })
    }

    fn case_message<A, R>(&self, case: &Case<A, R>) -> String
    where
        A: Arguments<F>,
        R: Debug,
    {
        let args = case.args.render();
        let expected = format!("{:?}", case.expected);
        match &self.description {
            Some(template) => {
                let values = args.iter().map(String::as_str).chain([expected.as_str()]);
                fill_placeholders(template, values)
            }
            None => format!(
                "called with ({}), expected {expected}",
                args.join(", ")
            ),
        }
    }
}

/// Replaces each `{}` in `template`, in order, with the next value.
/// Placeholders beyond the last value are left as they are.
fn fill_placeholders<'v>(template: &str, values: impl IntoIterator<Item = &'v str>) -> String {
    let mut values = values.into_iter();
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(at) = rest.find("{}") {
        out.push_str(&rest[..at]);
        match values.next() {
            Some(value) => out.push_str(value),
            None => out.push_str("{}"),
        }
        rest = &rest[at + 2..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::palette::Palette;
    use crate::tags::ProcedureInfo;

    use super::*;

    fn ctx() -> TestContext {
        TestContext::new(
            "Suite",
            ProcedureInfo {
                name: "t",
                doc: "",
                file: file!(),
                first_line: line!(),
            },
            Config::default(),
            Palette::PLAIN,
        )
    }

    fn add(a: i32, b: i32) -> i32 {
        a + b
    }

    #[test]
    fn placeholders_fill_in_order() {
        assert_eq!(fill_placeholders("{} + {} = {}", ["1", "2", "3"]), "1 + 2 = 3");
        assert_eq!(fill_placeholders("{} and {}", ["1"]), "1 and {}");
        assert_eq!(fill_placeholders("no holes", ["1"]), "no holes");
    }

    #[test]
    fn only_failing_cases_are_collected() {
        let ctx = ctx();
        let result = ctx
            .function(add)
            .describe("given {} and {}, returns {}")
            .run_with_cases([
                call_with((0, 0)).returns(0),
                call_with((1, 1)).returns(2),
                call_with((1, 1)).returns(3),
            ]);
        let Err(Fault::Aggregate { failures, .. }) = result else {
            panic!("expected an aggregate failure");
        };
        assert_eq!(failures.len(), 1);
        assert_eq!(
            failures[0].message,
            "given 1 and 1, returns 3\n  received: 2"
        );
    }

    #[test]
    fn panics_become_case_failures() {
        let ctx = ctx();
        let result = ctx
            .function(|n: u32| 10 / n)
            .run_with_cases([call_with((2,)).returns(5), call_with((0,)).returns(0)]);
        let Err(Fault::Aggregate { failures, .. }) = result else {
            panic!("expected an aggregate failure");
        };
        assert_eq!(failures.len(), 1);
        assert!(failures[0]
            .message
            .starts_with("called with (0), expected 0\n  panic: "));
    }

    #[test]
    fn all_passing_cases_pass() {
        let ctx = ctx();
        let result = ctx
            .function(|| 42)
            .run_with_cases([call_with(()).returns(42)]);
        assert!(result.is_ok());
    }
}
