//! Soaper error types.
//!
//! [`SoaperError`] covers everything that can go wrong *around* a test run:
//! declaring a suite with a bad configuration, failing to read the source
//! file a failure points at, or failing to write the report. Failures that
//! happen *inside* a test body are not errors of the framework; they are
//! [`Fault`](crate::failure::Fault)s, caught per procedure by the runtime.

use std::io;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for declaring, registering and running suites.
#[derive(Debug, Error, Diagnostic)]
pub enum SoaperError {
    #[error("invalid config key \"{key}\"")]
    #[diagnostic(
        code(soaper::config::unknown_key),
        help("valid keys are: {valid}")
    )]
    UnknownConfigKey { key: String, valid: String },

    #[error("invalid type for config key \"{key}\": expected {expected}, found {found}")]
    #[diagnostic(code(soaper::config::type_mismatch))]
    ConfigTypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("config key \"{key}\" must not be negative, found {value}")]
    #[diagnostic(code(soaper::config::out_of_range))]
    ConfigOutOfRange { key: String, value: i64 },

    #[error("config document must be a mapping of keys to values")]
    #[diagnostic(
        code(soaper::config::shape),
        help("write the overrides as `key: value` lines")
    )]
    ConfigShape,

    #[error("failed to parse config document")]
    #[diagnostic(code(soaper::config::yaml))]
    ConfigYaml(#[from] serde_yaml::Error),

    #[error("failed to read source file '{}'", path.display())]
    #[diagnostic(code(soaper::context::source_read))]
    SourceRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write test report")]
    #[diagnostic(code(soaper::report::io))]
    Report(#[from] io::Error),

    #[error("no suite named \"{0}\" is registered")]
    #[diagnostic(code(soaper::registry::unknown_suite))]
    UnknownSuite(String),
}

pub type Result<T> = std::result::Result<T, SoaperError>;
