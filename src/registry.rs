//! Process-wide suite registry.
//!
//! Empty at process start and append-only afterwards; suites live until the
//! process exits. Registering a suite whose configuration has
//! `autorun_tests` set runs it immediately.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lazy_static::lazy_static;
use termcolor::WriteColor;
use tracing::debug;

use crate::error::{Result, SoaperError};
use crate::runtime::{RunTally, Suite};

lazy_static! {
    static ref SUITE_REGISTRY: Mutex<Vec<Arc<Suite>>> = Mutex::new(Vec::new());
}

fn registry() -> MutexGuard<'static, Vec<Arc<Suite>>> {
    // A panic while holding the lock cannot leave the list half-written.
    SUITE_REGISTRY
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Adds `suite` to the registry, running it right away when configured to.
pub fn register(suite: Suite) -> Result<Arc<Suite>> {
    let suite = Arc::new(suite);
    registry().push(Arc::clone(&suite));
    debug!(
        suite = %suite.name(),
        autorun = suite.config().autorun_tests,
        "registered suite"
    );

    if suite.config().autorun_tests {
        suite.run()?;
    }
    Ok(suite)
}

/// A snapshot of every registered suite, in registration order.
pub fn suites() -> Vec<Arc<Suite>> {
    registry().clone()
}

/// The first registered suite called `name`.
pub fn find(name: &str) -> Option<Arc<Suite>> {
    registry().iter().find(|s| s.name() == name).cloned()
}

/// Runs every registered suite in registration order, reporting to stdout.
pub fn run_all() -> Result<Vec<RunTally>> {
    suites().iter().map(|suite| suite.run()).collect()
}

/// Like [`run_all`], reporting to `out`.
pub fn run_all_with(out: &mut dyn WriteColor) -> Result<Vec<RunTally>> {
    suites().iter().map(|suite| suite.run_with(out)).collect()
}

/// Runs the registered suite called `name`, reporting to stdout.
pub fn run_suite(name: &str) -> Result<RunTally> {
    find(name)
        .ok_or_else(|| SoaperError::UnknownSuite(name.to_string()))?
        .run()
}

/// Like [`run_suite`], reporting to `out`.
pub fn run_suite_with(name: &str, out: &mut dyn WriteColor) -> Result<RunTally> {
    find(name)
        .ok_or_else(|| SoaperError::UnknownSuite(name.to_string()))?
        .run_with(out)
}
