use crate::error::Report;
use crate::issue::{IssueKind, ParsedType};
use crate::parse::{Mode, Scope};
use crate::runner::Outcome;
use crate::schema::Schema;
use crate::validation::Validation;
use crate::value::{Promise, Value};

/// Check a promise whose payload must match `inner`.
///
/// Under the synchronous entry point the payload cannot be awaited, so the
/// result is a new promise that validates the payload once awaited and
/// rejects with the report on failure. Under the asynchronous entry point
/// the payload is awaited and validated in place.
pub(crate) async fn check(inner: &Schema, value: Value, scope: Scope) -> Outcome {
    let promise = match value {
        Value::Promise(promise) => promise,
        other => return Ok(scope.invalid_type(ParsedType::Promise, &other)),
    };

    match scope.mode {
        Mode::Sync => {
            let inner = inner.clone();
            let path = scope.path;
            let validated = Promise::from_future(async move {
                let payload = promise.settle().await?;
                let scope = Scope::new(Mode::Async, path);
                match inner.run(payload, scope.clone()).await {
                    Ok(Validation::Success(parsed)) => Ok(parsed),
                    Ok(Validation::Failure(issues)) => Err(Report::new(issues)),
                    Err(fatal) => Err(Report::from_issue(scope.issue(
                        IssueKind::Custom { params: None },
                        Some(fatal.to_string()),
                    ))),
                }
            });
            Ok(Validation::success(Value::Promise(validated)))
        }
        Mode::Async => match promise.settle().await {
            Ok(payload) => inner.run(payload, scope).await,
            Err(report) => Ok(Validation::failure(report.prefixed(&scope.path).into_issues())),
        },
    }
}
