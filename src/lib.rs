//! Soaper: a small unit-testing framework with colorized, diff-annotated
//! failure reports.
//!
//! Suites are ordered collections of tagged procedures. Running a suite
//! executes each procedure with its failures isolated, and streams a report
//! that points at the exact source span of every failed assertion.
//!
//! ```rust
//! use soaper::{call_with, Suite};
//!
//! fn add(a: i32, b: i32) -> i32 {
//!     a + b
//! }
//!
//! soaper::test! {
//!     /// adds small numbers
//!     fn addition(ctx) {
//!         ctx.function(add)
//!             .describe("given {} and {}, returns {}")
//!             .run_with_cases([call_with((1, 1)).returns(2)])
//!     }
//! }
//!
//! soaper::test! {
//!     skip fn later(ctx) {
//!         ctx.fail("not yet")
//!     }
//! }
//!
//! let suite = Suite::builder("Math")
//!     .description("basic arithmetic")
//!     .set("autorun_tests", false)
//!     .procedures([addition(), later()])
//!     .build()
//!     .unwrap();
//!
//! let mut out = termcolor::NoColor::new(Vec::new());
//! let tally = suite.run_with(&mut out).unwrap();
//! assert_eq!((tally.passes, tally.skips), (1, 1));
//! ```

pub use crate::config::{Config, ConfigValue};
pub use crate::error::SoaperError;
pub use crate::expect::{call_with, Approximate, Expect, TestContext};
pub use crate::failure::{FailureRecord, Fault, TestResult};
pub use crate::registry::{register, run_all, run_suite};
pub use crate::runtime::{Outcome, RunTally, Suite, SuiteBuilder, TestReport};
pub use crate::tags::{Procedure, ProcedureInfo, Tags};

pub mod config;
pub mod context;
pub mod diff;
pub mod error;
pub mod expect;
pub mod failure;
pub mod palette;
pub mod registry;
pub mod runtime;
pub mod tags;
