use crate::issue::{IssueKind, ParsedType, SizeOrigin};
use crate::parse::Scope;
use crate::predicate::{ge, gt, is_integer, le, lt, multiple_of, Predicate};
use crate::runner::{Checked, Collected};
use crate::schema::{Kind, Schema};
use crate::value::Value;

/// Schema for finite numbers.
///
/// `NaN` is reported as `invalid_type` received `nan`, infinities as received
/// `infinity`. Checks run in the order they were added and all of them are
/// reported.
///
/// # Example
///
/// ```
/// use weir::prelude::*;
///
/// let schema = weir::number().int().positive().multiple_of(5.0);
/// assert!(schema.parse(15).is_ok());
/// assert_eq!(
///     schema.safe_parse(-2.5).into_result().unwrap_err().codes(),
///     vec![IssueCode::InvalidType, IssueCode::TooSmall, IssueCode::NotMultipleOf]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct NumberSchema {
    checks: Vec<NumberCheck>,
}

#[derive(Debug, Clone)]
enum NumberCheck {
    Min {
        value: f64,
        inclusive: bool,
        message: Option<String>,
    },
    Max {
        value: f64,
        inclusive: bool,
        message: Option<String>,
    },
    Int {
        message: Option<String>,
    },
    MultipleOf {
        value: f64,
        message: Option<String>,
    },
}

impl NumberSchema {
    pub(crate) fn new() -> Self {
        Self { checks: Vec::new() }
    }

    fn with(mut self, check: NumberCheck) -> Self {
        self.checks.push(check);
        self
    }

    fn min_bound(self, value: f64, inclusive: bool) -> Self {
        self.with(NumberCheck::Min {
            value,
            inclusive,
            message: None,
        })
    }

    fn max_bound(self, value: f64, inclusive: bool) -> Self {
        self.with(NumberCheck::Max {
            value,
            inclusive,
            message: None,
        })
    }

    /// Greater than `value`.
    pub fn gt(self, value: f64) -> Self {
        self.min_bound(value, false)
    }

    /// Greater than or equal to `value`.
    pub fn gte(self, value: f64) -> Self {
        self.min_bound(value, true)
    }

    /// Alias of [`gte`](NumberSchema::gte).
    pub fn min(self, value: f64) -> Self {
        self.gte(value)
    }

    /// Less than `value`.
    pub fn lt(self, value: f64) -> Self {
        self.max_bound(value, false)
    }

    /// Less than or equal to `value`.
    pub fn lte(self, value: f64) -> Self {
        self.max_bound(value, true)
    }

    /// Alias of [`lte`](NumberSchema::lte).
    pub fn max(self, value: f64) -> Self {
        self.lte(value)
    }

    /// Greater than zero.
    pub fn positive(self) -> Self {
        self.gt(0.0)
    }

    /// Zero or greater.
    pub fn nonnegative(self) -> Self {
        self.gte(0.0)
    }

    /// Less than zero.
    pub fn negative(self) -> Self {
        self.lt(0.0)
    }

    /// Zero or less.
    pub fn nonpositive(self) -> Self {
        self.lte(0.0)
    }

    /// No fractional part.
    pub fn int(self) -> Self {
        self.with(NumberCheck::Int { message: None })
    }

    /// An integral multiple of `step`.
    pub fn multiple_of(self, step: f64) -> Self {
        self.with(NumberCheck::MultipleOf {
            value: step,
            message: None,
        })
    }

    /// Replace the message of the most recently added check.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        if let Some(
            NumberCheck::Min { message: slot, .. }
            | NumberCheck::Max { message: slot, .. }
            | NumberCheck::Int { message: slot }
            | NumberCheck::MultipleOf { message: slot, .. },
        ) = self.checks.last_mut()
        {
            *slot = Some(message.into());
        }
        self
    }

    pub(crate) fn check(&self, value: Value, scope: &Scope) -> Checked {
        let n = match value {
            Value::Number(n) if n.is_nan() => {
                return scope.invalid_type(ParsedType::Number, &value)
            }
            Value::Number(n) if n.is_infinite() => {
                return scope.fail(IssueKind::InvalidType {
                    expected: ParsedType::Number,
                    received: ParsedType::Infinity,
                })
            }
            Value::Number(n) => n,
            other => return scope.invalid_type(ParsedType::Number, &other),
        };

        let mut collected = Collected::default();
        for check in &self.checks {
            let failure = match check {
                NumberCheck::Min {
                    value,
                    inclusive,
                    message,
                } => {
                    let ok = if *inclusive {
                        ge(*value).check(&n)
                    } else {
                        gt(*value).check(&n)
                    };
                    (!ok).then(|| {
                        let kind = IssueKind::TooSmall {
                            minimum: *value,
                            inclusive: *inclusive,
                            exact: false,
                            origin: SizeOrigin::Number,
                        };
                        (kind, message)
                    })
                }
                NumberCheck::Max {
                    value,
                    inclusive,
                    message,
                } => {
                    let ok = if *inclusive {
                        le(*value).check(&n)
                    } else {
                        lt(*value).check(&n)
                    };
                    (!ok).then(|| {
                        let kind = IssueKind::TooBig {
                            maximum: *value,
                            inclusive: *inclusive,
                            exact: false,
                            origin: SizeOrigin::Number,
                        };
                        (kind, message)
                    })
                }
                NumberCheck::Int { message } => (!is_integer().check(&n)).then(|| {
                    let kind = IssueKind::InvalidType {
                        expected: ParsedType::Integer,
                        received: ParsedType::Float,
                    };
                    (kind, message)
                }),
                NumberCheck::MultipleOf { value, message } => {
                    (!multiple_of(*value).check(&n)).then(|| {
                        (IssueKind::NotMultipleOf { multiple_of: *value }, message)
                    })
                }
            };
            if let Some((kind, message)) = failure {
                collected.push(scope.issue(kind, message.clone()));
            }
        }
        collected.finish(Value::Number(n))
    }
}

impl From<NumberSchema> for Schema {
    fn from(schema: NumberSchema) -> Self {
        Schema::new(Kind::Number(schema))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::IssueCode;
    use crate::{number, SchemaExt};

    #[test]
    fn test_nan_and_infinity() {
        let nan = number().parse(f64::NAN).unwrap_err().into_report().unwrap();
        assert_eq!(nan.issues().head().message(), "Expected number, received nan");

        let inf = number().parse(f64::INFINITY).unwrap_err().into_report().unwrap();
        assert_eq!(
            inf.issues().head().message(),
            "Expected number, received infinity"
        );
    }

    #[test]
    fn test_bounds() {
        let schema = number().gt(0.0).lte(10.0);
        assert!(schema.parse(10).is_ok());
        let report = schema.parse(0).unwrap_err().into_report().unwrap();
        assert_eq!(report.issues().head().message(), "Number must be greater than 0");
        let report = schema.parse(11).unwrap_err().into_report().unwrap();
        assert_eq!(
            report.issues().head().message(),
            "Number must be less than or equal to 10"
        );
    }

    #[test]
    fn test_sign_helpers() {
        assert!(number().nonnegative().parse(0).is_ok());
        assert!(number().positive().parse(0).is_err());
        assert!(number().negative().parse(-1).is_ok());
        assert!(number().nonpositive().parse(1).is_err());
    }

    #[test]
    fn test_int() {
        let report = number().int().parse(1.5).unwrap_err().into_report().unwrap();
        assert_eq!(report.issues().head().message(), "Expected integer, received float");
    }

    #[test]
    fn test_multiple_of() {
        let report = number().multiple_of(3.0).parse(4).unwrap_err().into_report().unwrap();
        assert_eq!(report.codes(), vec![IssueCode::NotMultipleOf]);
        assert_eq!(report.issues().head().message(), "Number must be a multiple of 3");
    }

    #[test]
    fn test_custom_message() {
        let report = number()
            .min(18.0)
            .message("adults only")
            .parse(17)
            .unwrap_err()
            .into_report()
            .unwrap();
        assert_eq!(report.issues().head().message(), "adults only");
    }
}
