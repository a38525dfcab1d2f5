//! Blocks that are expected to fault, or expected not to.

use std::error::Error;

use crate::failure::{short_type_name, Fault, TestResult};
use crate::runtime::panic;

use super::TestContext;

impl TestContext {
    /// Passes when `body` fails with an error of type `E`.
    ///
    /// Assertion failures inside `body` are propagated unchanged; success or
    /// any other error fails with "expected to raise E".
    ///
    /// ```rust
    /// use std::num::ParseIntError;
    ///
    /// soaper::test! {
    ///     fn rejects_words(ctx) {
    ///         ctx.expect_raise::<ParseIntError>(|_| {
    ///             "seven".parse::<i32>()?;
    ///             Ok(())
    ///         })
    ///     }
    /// }
    /// ```
    #[track_caller]
    pub fn expect_raise<E: Error + 'static>(
        &self,
        body: impl FnOnce(&TestContext) -> TestResult,
    ) -> TestResult {
        let expected = short_type_name::<E>();
        match body(self) {
            Err(Fault::Uncaught(fault)) if fault.is::<E>() => Ok(()),
            Err(Fault::Uncaught(fault)) => Err(self.failure_here(format!(
                "expected to raise {expected}, but raised {}",
                self.palette().received.wrap(&fault.type_name)
            ))),
            Err(fault) => Err(fault),
            Ok(()) => Err(self.failure_here(format!("expected to raise {expected}"))),
        }
    }

    /// Passes when `body` panics.
    #[track_caller]
    pub fn expect_panic<R>(&self, body: impl FnOnce(&TestContext) -> R) -> TestResult {
        match panic::catch(|| body(self)) {
            Err(_) => Ok(()),
            Ok(_) => Err(self.failure_here("expected to panic")),
        }
    }

    /// Fails when `body` fails with an error of type `E`; any other outcome
    /// of `body` is returned as is.
    #[track_caller]
    pub fn expect_no_raise<E: Error + 'static>(
        &self,
        body: impl FnOnce(&TestContext) -> TestResult,
    ) -> TestResult {
        match body(self) {
            Err(Fault::Uncaught(fault)) if fault.is::<E>() => Err(self.failure_here(format!(
                "expected not to raise {}: {}",
                short_type_name::<E>(),
                self.palette().received.wrap(&fault.message)
            ))),
            other => other,
        }
    }
}
