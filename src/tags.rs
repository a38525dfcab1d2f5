//! Test procedures and the tags that make them discoverable.
//!
//! A [`Procedure`] is a plain function plus three flags. Tagging never
//! changes what the function does; it only decides whether and how the
//! suite runtime will pick it up:
//!
//! - **is_test**: the procedure is run by its suite.
//! - **is_skipped**: the procedure is reported as skipped and never invoked.
//! - **expect_failure**: the pass/fail verdict is inverted.
//!
//! Skipping and expecting failure both imply `is_test`.
//!
//! # Example
//!
//! ```rust
//! soaper::test! {
//!     /// adds two numbers
//!     fn addition(ctx) {
//!         ctx.expect(1 + 1).equals(2)
//!     }
//! }
//!
//! let procedure = addition();
//! assert!(procedure.tags().is_test);
//! assert_eq!(procedure.name(), "addition");
//! ```

use std::fmt;

use crate::expect::TestContext;
use crate::failure::TestResult;

/// Signature of every test body.
pub type TestFn = fn(&TestContext) -> TestResult;

/// Flags attached to a procedure at declaration time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tags {
    pub is_test: bool,
    pub is_skipped: bool,
    pub expect_failure: bool,
}

/// Where a procedure was declared and what it documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcedureInfo {
    pub name: &'static str,
    pub doc: &'static str,
    /// Declaring file, relative to the package root (as produced by `file!()`).
    pub file: &'static str,
    /// 1-based line of the declaration.
    pub first_line: u32,
}

/// A tagged test body.
#[derive(Clone)]
pub struct Procedure {
    info: ProcedureInfo,
    tags: Tags,
    body: TestFn,
}

impl Procedure {
    /// Creates an untagged procedure. Untagged procedures are ignored by discovery.
    pub fn new(info: ProcedureInfo, body: TestFn) -> Self {
        Self {
            info,
            tags: Tags::default(),
            body,
        }
    }

    pub fn info(&self) -> &ProcedureInfo {
        &self.info
    }

    pub fn name(&self) -> &'static str {
        self.info.name
    }

    pub fn tags(&self) -> Tags {
        self.tags
    }

    pub(crate) fn body(&self) -> TestFn {
        self.body
    }

    pub fn mark_as_test(self) -> Self {
        mark_as_test(self)
    }

    pub fn skip(self) -> Self {
        mark_as_skipped(self)
    }

    pub fn failing(self) -> Self {
        mark_as_expected_failure(self)
    }
}

impl fmt::Debug for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Procedure")
            .field("info", &self.info)
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

/// Marks a procedure as a test.
pub fn mark_as_test(mut procedure: Procedure) -> Procedure {
    procedure.tags.is_test = true;
    procedure
}

/// Marks a procedure as a skipped test.
pub fn mark_as_skipped(mut procedure: Procedure) -> Procedure {
    procedure.tags.is_skipped = true;
    mark_as_test(procedure)
}

/// Marks a procedure as a test that is expected to fail.
pub fn mark_as_expected_failure(mut procedure: Procedure) -> Procedure {
    procedure.tags.expect_failure = true;
    mark_as_test(procedure)
}

/// Declares a test procedure.
///
/// Expands to a function of the same name returning the tagged
/// [`Procedure`]. Doc comments become the procedure's docstring, other
/// attributes and the visibility are kept on the generated function, and
/// the line of the macro invocation is recorded as its first line.
///
/// ```rust
/// soaper::test! {
///     /// adds two numbers
///     pub fn addition(ctx) {
///         ctx.expect(1 + 1).equals(2)
///     }
/// }
///
/// soaper::test! {
///     /// never runs
///     skip fn later(ctx) {
///         ctx.fail("unreachable")
///     }
/// }
///
/// soaper::test! {
///     #[allow(clippy::eq_op)]
///     failing fn known_bug(ctx) {
///         ctx.expect(2 + 2).equals(5)
///     }
/// }
///
/// assert!(addition().tags().is_test);
/// assert_eq!(addition().info().doc, " adds two numbers\n");
/// assert!(later().tags().is_skipped);
/// assert!(known_bug().tags().expect_failure);
/// ```
#[macro_export]
macro_rules! test {
    (@declare $mark:ident [$($doc:literal)*] [$($meta:meta,)*] $vis:vis $name:ident $ctx:ident $body:block) => {
        $(#[doc = $doc])*
        $(#[$meta])*
        $vis fn $name() -> $crate::Procedure {
            $crate::tags::$mark($crate::Procedure::new(
                $crate::ProcedureInfo {
                    name: stringify!($name),
                    doc: concat!($($doc, "\n",)*),
                    file: file!(),
                    first_line: line!(),
                },
                |$ctx: &$crate::TestContext| -> $crate::TestResult { $body },
            ))
        }
    };
    (@attrs [$($doc:literal)*] [$($meta:meta,)*] #[doc = $next:literal] $($rest:tt)*) => {
        $crate::test!(@attrs [$($doc)* $next] [$($meta,)*] $($rest)*);
    };
    (@attrs [$($doc:literal)*] [$($meta:meta,)*] #[$next:meta] $($rest:tt)*) => {
        $crate::test!(@attrs [$($doc)*] [$($meta,)* $next,] $($rest)*);
    };
    (@attrs $docs:tt $metas:tt $vis:vis skip fn $name:ident($ctx:ident) $body:block) => {
        $crate::test!(@declare mark_as_skipped $docs $metas $vis $name $ctx $body);
    };
    (@attrs $docs:tt $metas:tt $vis:vis failing fn $name:ident($ctx:ident) $body:block) => {
        $crate::test!(@declare mark_as_expected_failure $docs $metas $vis $name $ctx $body);
    };
    (@attrs $docs:tt $metas:tt $vis:vis fn $name:ident($ctx:ident) $body:block) => {
        $crate::test!(@declare mark_as_test $docs $metas $vis $name $ctx $body);
    };
    ($($item:tt)*) => {
        $crate::test!(@attrs [] [] $($item)*);
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> ProcedureInfo {
        ProcedureInfo {
            name: "helper",
            doc: "",
            file: file!(),
            first_line: line!(),
        }
    }

    #[test]
    fn untagged_procedure_is_not_a_test() {
        let p = Procedure::new(info(), |_| Ok(()));
        assert_eq!(p.tags(), Tags::default());
    }

    #[test]
    fn skip_and_failing_imply_test() {
        let skipped = mark_as_skipped(Procedure::new(info(), |_| Ok(())));
        assert!(skipped.tags().is_test && skipped.tags().is_skipped);
        assert!(!skipped.tags().expect_failure);

        let failing = Procedure::new(info(), |_| Ok(())).failing();
        assert!(failing.tags().is_test && failing.tags().expect_failure);
        assert!(!failing.tags().is_skipped);
    }

    mod shared {
        crate::test! {
            #[allow(unused_variables)]
            /// declared once,
            /// run from anywhere
            pub fn exported(ctx) {
                Ok(())
            }
        }

        crate::test! {
            #[cfg(any())]
            fn compiled_out(ctx) {
                ctx.fail("never compiled")
            }
        }
    }

    const EXPORTED_LINE: u32 = line!() - 17;

    #[test]
    fn macro_keeps_visibility_and_attributes() {
        let procedure = shared::exported();
        assert_eq!(procedure.name(), "exported");
        assert_eq!(procedure.info().doc, " declared once,\n run from anywhere\n");
        assert_eq!(procedure.info().file, file!());
        assert_eq!(procedure.info().first_line, EXPORTED_LINE);
        assert!(procedure.tags().is_test);
    }

    crate::test! {
        skip fn skipped_form(ctx) {
            ctx.fail("skipped")
        }
    }

    crate::test! {
        /// inverted
        failing fn failing_form(ctx) {
            ctx.fail("fails")
        }
    }

    #[test]
    fn macro_forms_set_their_tags() {
        assert_eq!(
            skipped_form().tags(),
            Tags {
                is_test: true,
                is_skipped: true,
                expect_failure: false
            }
        );
        assert_eq!(
            failing_form().tags(),
            Tags {
                is_test: true,
                is_skipped: false,
                expect_failure: true
            }
        );
        assert_eq!(failing_form().info().doc, " inverted\n");
    }

    #[test]
    fn tags_compose() {
        let both = Procedure::new(info(), |_| Ok(())).skip().failing();
        assert_eq!(
            both.tags(),
            Tags {
                is_test: true,
                is_skipped: true,
                expect_failure: true
            }
        );
    }
}
