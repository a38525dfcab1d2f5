//! Failure records and the fault type test bodies propagate.
//!
//! Assertions never panic. A failed assertion returns
//! `Err(Fault::Assertion(..))` and the body hands it upward with `?` until
//! it reaches the suite runtime, the only place faults are caught.
//!
//! Any other error propagated with `?` inside a test body becomes a
//! [`Fault::Uncaught`] through the blanket `From` impl, which also records
//! the location of the `?`. For that reason `Fault` deliberately does not
//! implement `std::error::Error` itself.

use std::any::type_name;
use std::error::Error;
use std::fmt;
use std::panic::Location;

use crate::context::{SourceContext, Span};
use crate::palette::Palette;

/// Result type of every test body and assertion.
pub type TestResult = Result<(), Fault>;

/// One reported failure: where it happened and what went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    pub context: SourceContext,
    pub message: String,
}

impl FailureRecord {
    pub fn new(context: SourceContext, message: impl Into<String>) -> Self {
        Self {
            context,
            message: message.into(),
        }
    }
}

/// Where an uncaught fault was raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub file: String,
    pub line: u32,
}

impl From<&Location<'_>> for Origin {
    fn from(at: &Location<'_>) -> Self {
        Self {
            file: at.file().to_string(),
            line: at.line(),
        }
    }
}

/// Any fault other than an assertion failure.
#[derive(Debug)]
pub struct UncaughtFault {
    /// Short type name of the error, or `panic`.
    pub type_name: String,
    pub message: String,
    pub origin: Option<Origin>,
    pub source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

impl UncaughtFault {
    /// Wraps an error propagated from a test body.
    pub fn from_error<E>(error: E, origin: Option<Origin>) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            type_name: short_type_name::<E>().to_string(),
            message: error.to_string(),
            origin,
            source: Some(Box::new(error)),
        }
    }

    /// Describes a panic caught by the runtime.
    pub fn from_panic(message: impl Into<String>, origin: Option<Origin>) -> Self {
        Self {
            type_name: "panic".to_string(),
            message: message.into(),
            origin,
            source: None,
        }
    }

    /// True when the underlying error is of type `E`.
    pub fn is<E: Error + 'static>(&self) -> bool {
        self.source.as_ref().map_or(false, |source| source.is::<E>())
    }

    pub fn is_panic(&self) -> bool {
        self.source.is_none() && self.type_name == "panic"
    }
}

/// A fault raised inside a test body.
#[derive(Debug)]
pub enum Fault {
    /// A failed assertion; carries its own record.
    Assertion(FailureRecord),
    /// Several failures collected by the tabular case runner.
    Aggregate {
        context: SourceContext,
        failures: Vec<FailureRecord>,
    },
    /// Any other error or panic.
    Uncaught(UncaughtFault),
}

impl Fault {
    /// Converts the fault into the single record the report shows.
    ///
    /// `base` is the context of the procedure that raised the fault; it is
    /// used when the fault does not carry a context of its own.
    pub fn into_record(self, base: &SourceContext, palette: &Palette) -> FailureRecord {
        match self {
            Fault::Assertion(record) => record,
            Fault::Aggregate { context, failures } => {
                let message = failures
                    .into_iter()
                    .map(|f| f.message)
                    .collect::<Vec<_>>()
                    .join("\n");
                FailureRecord::new(context, message)
            }
            Fault::Uncaught(fault) => {
                let context = match &fault.origin {
                    Some(origin) => base.clone().anchored(
                        &origin.file,
                        origin.line,
                        Span::whole_line(origin.line),
                    ),
                    None => base.clone(),
                };
                let thrown = if fault.message.is_empty() {
                    fault.type_name.clone()
                } else {
                    format!("{}: {}", fault.type_name, fault.message)
                };
                FailureRecord::new(context, format!("threw {}", palette.received.wrap(&thrown)))
            }
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::Assertion(record) => write!(f, "{}", record.message),
            Fault::Aggregate { failures, .. } => {
                write!(f, "{} failing case(s)", failures.len())
            }
            Fault::Uncaught(fault) => write!(f, "{}: {}", fault.type_name, fault.message),
        }
    }
}

impl From<FailureRecord> for Fault {
    fn from(record: FailureRecord) -> Self {
        Fault::Assertion(record)
    }
}

impl<E> From<E> for Fault
where
    E: Error + Send + Sync + 'static,
{
    #[track_caller]
    fn from(error: E) -> Self {
        let origin = Origin::from(Location::caller());
        Fault::Uncaught(UncaughtFault::from_error(error, Some(origin)))
    }
}

/// `std::io::error::Error` -> `Error`, `core::num::ParseIntError` -> `ParseIntError`.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::ProcedureInfo;

    fn base() -> SourceContext {
        SourceContext::new(
            "Suite",
            ProcedureInfo {
                name: "proc",
                doc: "",
                file: file!(),
                first_line: 10,
            },
        )
    }

    fn parse(text: &str) -> Result<i32, Fault> {
        Ok(text.parse::<i32>()?)
    }

    #[test]
    fn question_mark_records_type_and_location() {
        let fault = parse("nope").unwrap_err();
        let Fault::Uncaught(uncaught) = &fault else {
            panic!("expected an uncaught fault, got {fault:?}");
        };
        assert_eq!(uncaught.type_name, "ParseIntError");
        assert!(uncaught.is::<std::num::ParseIntError>());
        assert_eq!(uncaught.origin.as_ref().map(|o| o.file.as_str()), Some(file!()));
    }

    #[test]
    fn uncaught_record_points_at_origin() {
        let fault = Fault::Uncaught(UncaughtFault::from_panic(
            "boom",
            Some(Origin {
                file: file!().to_string(),
                line: 42,
            }),
        ));
        let record = fault.into_record(&base(), &Palette::PLAIN);
        assert_eq!(record.message, "threw panic: boom");
        assert_eq!(record.context.line(), 42);
        assert_eq!(record.context.span(), Some(Span::whole_line(42)));
    }

    #[test]
    fn origin_outside_procedure_file_keeps_first_line() {
        let fault = Fault::Uncaught(UncaughtFault::from_panic(
            "",
            Some(Origin {
                file: "elsewhere.rs".to_string(),
                line: 3,
            }),
        ));
        let record = fault.into_record(&base(), &Palette::PLAIN);
        assert_eq!(record.message, "threw panic");
        assert_eq!(record.context.line(), 10);
        assert_eq!(record.context.span(), None);
    }

    #[test]
    fn aggregate_joins_messages() {
        let fault = Fault::Aggregate {
            context: base().at_line(12),
            failures: vec![
                FailureRecord::new(base(), "first"),
                FailureRecord::new(base(), "second"),
            ],
        };
        let record = fault.into_record(&base(), &Palette::PLAIN);
        assert_eq!(record.message, "first\nsecond");
        assert_eq!(record.context.line(), 12);
    }

    #[test]
    fn short_names() {
        assert_eq!(short_type_name::<std::io::Error>(), "Error");
        assert_eq!(short_type_name::<Vec<String>>(), "Vec");
    }
}
