use crate::error::{Error, Report};
use crate::issue::{Issue, IssueKind, ParsedType};
use crate::parse::Scope;
use crate::runner::Checked;
use crate::schema::{Kind, Schema, SchemaExt, TupleSchema};
use crate::validation::Validation;
use crate::value::{Function, Value};

/// Schema for callables with checked arguments and return value.
///
/// Parsing a function yields a wrapper. Calling the wrapper checks the
/// arguments first and fails with an `invalid_arguments` issue without
/// calling through; after the call the return value is checked and fails
/// with an `invalid_return_type` issue.
///
/// # Example
///
/// ```
/// use weir::prelude::*;
///
/// let greet = weir::function()
///     .args([weir::string()])
///     .returns(weir::string().min(3))
///     .implement(|args| Value::from(format!("hi {}", args[0].as_str().unwrap_or(""))));
///
/// assert_eq!(greet.call(vec!["ada".into()]).unwrap(), Value::from("hi ada"));
/// let err = greet.call(vec![1.into()]).unwrap_err();
/// assert_eq!(err.report().unwrap().codes(), vec![IssueCode::InvalidArguments]);
/// ```
#[derive(Debug, Clone)]
pub struct FunctionSchema {
    args: Option<Schema>,
    returns: Option<Schema>,
}

impl FunctionSchema {
    pub(crate) fn new() -> Self {
        Self {
            args: None,
            returns: None,
        }
    }

    /// Check positional arguments, one schema per position.
    pub fn args<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Schema>,
    {
        let tuple = TupleSchema::new(items.into_iter().map(Into::into).collect());
        self.args = Some(tuple.into());
        self
    }

    /// Check arguments with an arbitrary schema over the argument array,
    /// e.g. a tuple with a rest element.
    pub fn args_schema(mut self, schema: impl Into<Schema>) -> Self {
        self.args = Some(schema.into());
        self
    }

    /// Check the return value.
    pub fn returns(mut self, schema: impl Into<Schema>) -> Self {
        self.returns = Some(schema.into());
        self
    }

    /// Wrap a closure with this schema's checks.
    pub fn implement<F>(&self, f: F) -> Function
    where
        F: Fn(Vec<Value>) -> Value + Send + Sync + 'static,
    {
        self.wrap(Function::new(f))
    }

    /// Wrap an existing function with this schema's checks.
    pub fn wrap(&self, inner: Function) -> Function {
        let args = self.args.clone();
        let returns = self.returns.clone();
        Function::fallible(move |input| {
            let input = match &args {
                Some(schema) => match schema.parse(Value::Array(input)) {
                    Ok(Value::Array(parsed)) => parsed,
                    Ok(other) => vec![other],
                    Err(Error::Invalid(report)) => {
                        return Err(nested(IssueKind::InvalidArguments {
                            argument_errors: report,
                        }))
                    }
                    Err(fatal) => return Err(fatal),
                },
                None => input,
            };
            let output = inner.call(input)?;
            match &returns {
                Some(schema) => schema.parse(output).map_err(|error| match error {
                    Error::Invalid(report) => nested(IssueKind::InvalidReturnType {
                        return_type_errors: report,
                    }),
                    fatal => fatal,
                }),
                None => Ok(output),
            }
        })
    }

    pub(crate) fn check(&self, value: Value, scope: &Scope) -> Checked {
        match value {
            Value::Function(function) => Validation::success(Value::Function(self.wrap(function))),
            other => scope.invalid_type(ParsedType::Function, &other),
        }
    }
}

fn nested(kind: IssueKind) -> Error {
    Error::Invalid(Report::from_issue(Issue::new(kind, Vec::new(), None)))
}

impl From<FunctionSchema> for Schema {
    fn from(schema: FunctionSchema) -> Self {
        Schema::new(Kind::Function(schema))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::IssueCode;
    use crate::{function, number, string, tuple};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_invalid_arguments_skip_call() {
        let called = Arc::new(AtomicBool::new(false));
        let flag = called.clone();
        let f = function().args([number()]).implement(move |args| {
            flag.store(true, Ordering::SeqCst);
            args[0].clone()
        });
        let err = f.call(vec!["x".into()]).unwrap_err();
        assert_eq!(err.report().unwrap().issues().head().message(), "Invalid function arguments");
        assert!(!called.load(Ordering::SeqCst));
    }

    #[test]
    fn test_invalid_return_type() {
        let f = function().returns(number()).implement(|_| Value::from("nope"));
        let report = f.call(vec![]).unwrap_err().into_report().unwrap();
        assert_eq!(report.codes(), vec![IssueCode::InvalidReturnType]);
        match report.issues().head().kind() {
            IssueKind::InvalidReturnType { return_type_errors } => {
                assert_eq!(return_type_errors.codes(), vec![IssueCode::InvalidType])
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_wraps_function_values() {
        let schema = function().args([string()]).returns(string());
        let raw = Function::new(|args| args[0].clone());
        let parsed = schema.parse(raw).unwrap();
        let wrapped = parsed.as_function().unwrap();
        assert_eq!(wrapped.call(vec!["a".into()]).unwrap(), Value::from("a"));
        assert!(wrapped.call(vec![1.into()]).is_err());
        assert!(schema.parse(1).is_err());
    }

    #[test]
    fn test_rest_arguments() {
        let sum = function()
            .args_schema(tuple([number()]).rest(number()))
            .implement(|args| Value::from(args.iter().filter_map(Value::as_f64).sum::<f64>()));
        assert_eq!(sum.call(vec![1.into(), 2.into(), 3.into()]).unwrap(), Value::from(6));
    }
}
