//! Refinements and transforms
//!
//! Steps attached to a schema node run in declaration order once the node's
//! structural check has passed. Each step only runs while the node is still
//! free of issues: a failed refinement stops the chain, and a transform that
//! reports an issue discards the value it produced.
//!
//! Callbacks that need to report more than a yes/no answer receive a
//! [`RefinementCtx`]. A fresh context is created for every invocation and
//! dropped right after it, so nothing leaks between calls or schemas.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use weir::prelude::*;
//!
//! let schema = weir::object()
//!     .field("new", weir::string())
//!     .field("confirmation", weir::string())
//!     .refine(
//!         |v| v.get("new") == v.get("confirmation"),
//!         RefineParams::from("does not match").path(["confirmation"]),
//!     );
//!
//! let report = schema
//!     .safe_parse(json!({ "new": "a", "confirmation": "b" }))
//!     .into_result()
//!     .unwrap_err();
//! assert_eq!(report.issues().head().path(), &[PathSegment::from("confirmation")]);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::issue::{Issue, IssueData, IssueKind, Path, PathSegment};
use crate::nonempty::NonEmptyVec;
use crate::parse::Scope;
use crate::runner::{BoxFuture, Checked, Outcome};
use crate::validation::Validation;
use crate::value::Value;

/// Issue collector handed to `super_refine`, `transform` and `preprocess`
/// callbacks.
///
/// Issues are described relative to the node the step is attached to.
pub struct RefinementCtx {
    path: Path,
    issues: Vec<IssueData>,
}

impl RefinementCtx {
    pub(crate) fn new(path: Path) -> Self {
        Self {
            path,
            issues: Vec::new(),
        }
    }

    /// Report an issue.
    pub fn add_issue(&mut self, issue: IssueData) {
        self.issues.push(issue);
    }

    /// Absolute path of the node being refined.
    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    /// Number of issues reported so far.
    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    /// Turn the context into the step result.
    pub(crate) fn finish(self, value: Value) -> Checked {
        let base = self.path;
        let issues: Vec<Issue> = self
            .issues
            .into_iter()
            .map(|data| data.into_issue(&base))
            .collect();
        match NonEmptyVec::from_vec(issues) {
            Some(issues) => Validation::Failure(issues),
            None => Validation::Success(value),
        }
    }
}

impl fmt::Debug for RefinementCtx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefinementCtx")
            .field("path", &self.path)
            .field("issues", &self.issues.len())
            .finish()
    }
}

/// Message, relative path and payload of the issue a failed `refine` reports.
///
/// Converts from a plain message.
///
/// # Example
///
/// ```
/// use weir::RefineParams;
///
/// let params = RefineParams::from("confirmationPassword does not match.")
///     .path(["confirmationPassword"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RefineParams {
    message: Option<String>,
    path: Path,
    params: Option<Value>,
}

impl RefineParams {
    /// Parameters with the default message and no relative path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Report the issue below the refined node.
    pub fn path<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathSegment>,
    {
        self.path = path.into_iter().map(Into::into).collect();
        self
    }

    /// Attach caller data to the issue.
    pub fn params(mut self, params: impl Into<Value>) -> Self {
        self.params = Some(params.into());
        self
    }

    fn issue(&self, base: &[PathSegment]) -> Issue {
        let mut data = IssueData::new(IssueKind::Custom {
            params: self.params.clone(),
        })
        .at(self.path.iter().cloned());
        if let Some(message) = &self.message {
            data = data.message(message.clone());
        }
        data.into_issue(base)
    }
}

impl From<&str> for RefineParams {
    fn from(message: &str) -> Self {
        Self::new().message(message)
    }
}

impl From<String> for RefineParams {
    fn from(message: String) -> Self {
        Self::new().message(message)
    }
}

pub(crate) type RewriteFn = Arc<dyn Fn(Value, &mut RefinementCtx) -> Value + Send + Sync>;
pub(crate) type CheckFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;
pub(crate) type AsyncCheckFn = Arc<dyn Fn(Value) -> BoxFuture<'static, bool> + Send + Sync>;
pub(crate) type InspectFn = Arc<dyn Fn(&Value, &mut RefinementCtx) + Send + Sync>;
pub(crate) type AsyncInspectFn =
    Arc<dyn Fn(Value, RefinementCtx) -> BoxFuture<'static, RefinementCtx> + Send + Sync>;
pub(crate) type AsyncRewriteFn =
    Arc<dyn Fn(Value, RefinementCtx) -> BoxFuture<'static, (Value, RefinementCtx)> + Send + Sync>;

/// One attached step.
#[derive(Clone)]
pub(crate) enum Step {
    Preprocess(RewriteFn),
    Refine(CheckFn, RefineParams),
    RefineAsync(AsyncCheckFn, RefineParams),
    SuperRefine(InspectFn),
    SuperRefineAsync(AsyncInspectFn),
    Transform(RewriteFn),
    TransformAsync(AsyncRewriteFn),
}

impl Step {
    pub(crate) fn is_preprocess(&self) -> bool {
        matches!(self, Step::Preprocess(_))
    }

    pub(crate) async fn apply(&self, value: Value, scope: &Scope) -> Outcome {
        match self {
            Step::Preprocess(f) | Step::Transform(f) => {
                let mut ctx = RefinementCtx::new(scope.path.clone());
                let out = f(value, &mut ctx);
                Ok(ctx.finish(out))
            }
            Step::Refine(check, params) => Ok(if check(&value) {
                Validation::success(value)
            } else {
                Validation::failure(NonEmptyVec::singleton(params.issue(&scope.path)))
            }),
            Step::RefineAsync(check, params) => {
                scope.require_async("refinement")?;
                Ok(if check(value.clone()).await {
                    Validation::success(value)
                } else {
                    Validation::failure(NonEmptyVec::singleton(params.issue(&scope.path)))
                })
            }
            Step::SuperRefine(f) => {
                let mut ctx = RefinementCtx::new(scope.path.clone());
                f(&value, &mut ctx);
                Ok(ctx.finish(value))
            }
            Step::SuperRefineAsync(f) => {
                scope.require_async("refinement")?;
                let ctx = f(value.clone(), RefinementCtx::new(scope.path.clone())).await;
                Ok(ctx.finish(value))
            }
            Step::TransformAsync(f) => {
                scope.require_async("transform")?;
                let (out, ctx) = f(value, RefinementCtx::new(scope.path.clone())).await;
                Ok(ctx.finish(out))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::issue::IssueCode;
    use crate::parse::Mode;
    use futures::FutureExt;

    fn scope(mode: Mode) -> Scope {
        Scope::new(mode, vec![PathSegment::from("field")])
    }

    fn run(step: &Step, value: Value, mode: Mode) -> Outcome {
        step.apply(value, &scope(mode))
            .now_or_never()
            .expect("step completes without suspending")
    }

    #[test]
    fn test_ctx_prefixes_node_path() {
        let mut ctx = RefinementCtx::new(vec![PathSegment::from("a")]);
        ctx.add_issue(IssueData::custom("first"));
        ctx.add_issue(IssueData::custom("second").at(["b"]));
        assert_eq!(ctx.issue_count(), 2);

        let issues = ctx.finish(Value::Null).errors().cloned().unwrap();
        assert_eq!(issues[0].path(), &[PathSegment::from("a")]);
        assert_eq!(
            issues[1].path(),
            &[PathSegment::from("a"), PathSegment::from("b")]
        );
    }

    #[test]
    fn test_refine_reports_custom_issue() {
        let step = Step::Refine(
            Arc::new(|v: &Value| v.as_str() == Some("ok")),
            RefineParams::from("not ok").path(["inner"]),
        );
        assert!(run(&step, Value::from("ok"), Mode::Sync).unwrap().is_success());

        let issues = run(&step, Value::from("no"), Mode::Sync)
            .unwrap()
            .errors()
            .cloned()
            .unwrap();
        assert_eq!(issues.head().code(), IssueCode::Custom);
        assert_eq!(issues.head().message(), "not ok");
        assert_eq!(
            issues.head().path(),
            &[PathSegment::from("field"), PathSegment::from("inner")]
        );
    }

    #[test]
    fn test_refine_default_message() {
        let step = Step::Refine(Arc::new(|_: &Value| false), RefineParams::new());
        let issues = run(&step, Value::Null, Mode::Sync).unwrap().errors().cloned().unwrap();
        assert_eq!(issues.head().message(), "Invalid input");
    }

    #[test]
    fn test_transform_with_issue_discards_value() {
        let step = Step::Transform(Arc::new(|_: Value, ctx: &mut RefinementCtx| {
            ctx.add_issue(IssueData::custom("cannot convert"));
            Value::from(0)
        }));
        assert!(run(&step, Value::from("x"), Mode::Sync).unwrap().is_failure());
    }

    #[test]
    fn test_async_step_is_fatal_in_sync_mode() {
        let step = Step::RefineAsync(
            Arc::new(|_: Value| async { true }.boxed()),
            RefineParams::new(),
        );
        assert!(matches!(
            run(&step, Value::Null, Mode::Sync),
            Err(Error::AsyncInSync { step: "refinement" })
        ));
    }

    #[tokio::test]
    async fn test_async_transform_runs_in_async_mode() {
        let step = Step::TransformAsync(Arc::new(|v: Value, ctx: RefinementCtx| {
            async move {
                let n = v.as_f64().unwrap_or_default();
                (Value::from(n * 2.0), ctx)
            }
            .boxed()
        }));
        let checked = step.apply(Value::from(21), &scope(Mode::Async)).await.unwrap();
        assert_eq!(checked.value(), Some(&Value::from(42)));
    }
}
