//! Parse entry points
//!
//! One validation core serves every entry point. The [`Mode`] decides whether
//! asynchronous steps are rejected or awaited and whether sibling checks run
//! one after another or concurrently; nothing else differs, so all entry
//! points report identical issues for the same schema and input.
//!
//! The synchronous entry points drive the core future with
//! [`FutureExt::now_or_never`]. In synchronous mode no step ever suspends:
//! asynchronous steps fail with [`Error::AsyncInSync`] before they are polled.

use futures::FutureExt;
use tracing::{debug, trace, warn};

use crate::error::{Error, Report};
use crate::issue::{Issue, IssueKind, ParsedType, Path, PathSegment};
use crate::nonempty::NonEmptyVec;
use crate::runner::{Checked, Outcome};
use crate::schema::Schema;
use crate::validation::Validation;
use crate::value::Value;

/// How a parse call treats asynchronous work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Sync,
    Async,
}

/// Mode and location passed down the schema tree during one call.
#[derive(Debug, Clone)]
pub(crate) struct Scope {
    pub(crate) mode: Mode,
    pub(crate) path: Path,
}

impl Scope {
    pub(crate) fn new(mode: Mode, path: Path) -> Self {
        Self { mode, path }
    }

    /// The scope one segment further down.
    pub(crate) fn child(&self, segment: impl Into<PathSegment>) -> Self {
        let mut path = self.path.clone();
        path.push(segment.into());
        Self {
            mode: self.mode,
            path,
        }
    }

    pub(crate) fn issue(&self, kind: IssueKind, message: Option<String>) -> Issue {
        Issue::new(kind, self.path.clone(), message)
    }

    /// A failed check holding one issue at this location.
    pub(crate) fn fail(&self, kind: IssueKind) -> Checked {
        Validation::failure(NonEmptyVec::singleton(self.issue(kind, None)))
    }

    pub(crate) fn invalid_type(&self, expected: ParsedType, received: &Value) -> Checked {
        self.fail(IssueKind::InvalidType {
            expected,
            received: received.parsed_type(),
        })
    }

    /// Fail unless asynchronous work is allowed.
    pub(crate) fn require_async(&self, step: &'static str) -> Result<(), Error> {
        match self.mode {
            Mode::Async => Ok(()),
            Mode::Sync => {
                warn!(step, path = ?self.path, "asynchronous step reached during synchronous parse");
                Err(Error::AsyncInSync { step })
            }
        }
    }
}

/// Per-call parse options.
///
/// # Example
///
/// ```
/// use weir::prelude::*;
///
/// let report = weir::number()
///     .parse_with("x", ParseOptions::new().path(["payload", "count"]))
///     .unwrap_err()
///     .into_report()
///     .unwrap();
/// assert_eq!(
///     report.issues().head().path(),
///     &[PathSegment::from("payload"), PathSegment::from("count")]
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Prefix applied to the path of every issue
    pub path: Path,
}

impl ParseOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the path prefix.
    pub fn path<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathSegment>,
    {
        self.path = path.into_iter().map(Into::into).collect();
        self
    }
}

fn conclude(outcome: Outcome) -> Result<Value, Error> {
    match outcome? {
        Validation::Success(value) => {
            trace!("validation succeeded");
            Ok(value)
        }
        Validation::Failure(issues) => {
            debug!(issues = issues.len(), "validation failed");
            Err(Error::Invalid(Report::new(issues)))
        }
    }
}

pub(crate) fn run_sync(schema: &Schema, input: Value, options: ParseOptions) -> Result<Value, Error> {
    debug!(mode = "sync", "parsing value");
    let outcome = schema
        .run(input, Scope::new(Mode::Sync, options.path))
        .now_or_never()
        .unwrap_or(Err(Error::AsyncInSync { step: "future" }));
    conclude(outcome)
}

pub(crate) async fn run_async(
    schema: &Schema,
    input: Value,
    options: ParseOptions,
) -> Result<Value, Error> {
    debug!(mode = "async", "parsing value");
    let outcome = schema
        .run(input, Scope::new(Mode::Async, options.path))
        .await;
    conclude(outcome)
}

/// Split a parse result into the non-raising form.
///
/// # Panics
///
/// Panics on errors other than [`Error::Invalid`]; those signal misuse, not
/// invalid data.
pub(crate) fn into_validation(result: Result<Value, Error>) -> Validation<Value, Report> {
    match result {
        Ok(value) => Validation::Success(value),
        Err(Error::Invalid(report)) => Validation::Failure(report),
        Err(misuse) => panic!("{}", misuse),
    }
}
