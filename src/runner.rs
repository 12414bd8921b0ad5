//! Step runner shared by the synchronous and asynchronous entry points
//!
//! Every schema node produces a [`Checked`] value inside a future. Under the
//! synchronous entry point those futures never suspend and are driven to
//! completion in one poll; under the asynchronous entry point sibling checks
//! are polled together with `join_all`. Either way results come back in the
//! order the checks were handed in, so issues are merged in shape or index
//! order regardless of completion order.

use futures::future::join_all;

use crate::error::Error;
use crate::issue::Issue;
use crate::nonempty::NonEmptyVec;
use crate::parse::Mode;
use crate::validation::Validation;
use crate::value::Value;
use crate::Semigroup;

pub(crate) use futures::future::BoxFuture;

/// Result of checking one node: the parsed value or its issues.
pub(crate) type Checked = Validation<Value, NonEmptyVec<Issue>>;

/// A node check that may also hit a fatal misuse error.
pub(crate) type Outcome = Result<Checked, Error>;

/// Run sibling checks, concurrently when the mode allows it.
///
/// The first fatal error aborts a synchronous run; in asynchronous mode all
/// checks run to completion before the first fatal error is reported.
pub(crate) async fn check_all(
    mode: Mode,
    checks: Vec<BoxFuture<'_, Outcome>>,
) -> Result<Vec<Checked>, Error> {
    match mode {
        Mode::Async => join_all(checks).await.into_iter().collect(),
        Mode::Sync => {
            let mut results = Vec::with_capacity(checks.len());
            for check in checks {
                results.push(check.await?);
            }
            Ok(results)
        }
    }
}

/// Accumulates issues from several checks, left to right.
#[derive(Debug, Default)]
pub(crate) struct Collected {
    issues: Option<NonEmptyVec<Issue>>,
}

impl Collected {
    /// Keep the value of a success, or absorb the issues of a failure.
    pub(crate) fn take<T>(&mut self, checked: Validation<T, NonEmptyVec<Issue>>) -> Option<T> {
        match checked {
            Validation::Success(value) => Some(value),
            Validation::Failure(issues) => {
                self.absorb(issues);
                None
            }
        }
    }

    pub(crate) fn push(&mut self, issue: Issue) {
        self.absorb(NonEmptyVec::singleton(issue));
    }

    fn absorb(&mut self, issues: NonEmptyVec<Issue>) {
        self.issues = Some(match self.issues.take() {
            Some(acc) => acc.combine(issues),
            None => issues,
        });
    }

    /// Succeed with `value` unless any issue was collected.
    pub(crate) fn finish(self, value: Value) -> Checked {
        match self.issues {
            Some(issues) => Validation::Failure(issues),
            None => Validation::Success(value),
        }
    }
}
