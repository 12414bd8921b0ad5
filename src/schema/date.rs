use chrono::{DateTime, Utc};

use crate::coerce::read_date;
use crate::issue::{IssueKind, ParsedType, SizeOrigin};
use crate::parse::Scope;
use crate::runner::{Checked, Collected};
use crate::schema::{Kind, Schema};
use crate::value::Value;

/// Schema for date instants.
///
/// With [`coerce`](DateSchema::coerce), strings and epoch-millisecond numbers
/// are converted first; input that cannot be read reports `invalid_date`.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use weir::prelude::*;
///
/// let schema = weir::date().coerce().min(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());
/// assert!(schema.parse("2022-01-12").is_ok());
/// assert_eq!(
///     schema.safe_parse("2019-06-01").into_result().unwrap_err().issues().head().message(),
///     "Date must be greater than or equal to 2020-01-01T00:00:00.000Z"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct DateSchema {
    checks: Vec<DateCheck>,
    coerce: bool,
}

#[derive(Debug, Clone)]
struct DateCheck {
    bound: DateTime<Utc>,
    at_least: bool,
    message: Option<String>,
}

impl DateSchema {
    pub(crate) fn new() -> Self {
        Self {
            checks: Vec::new(),
            coerce: false,
        }
    }

    /// Convert strings and epoch milliseconds before checking.
    pub fn coerce(mut self) -> Self {
        self.coerce = true;
        self
    }

    /// No earlier than `bound`.
    pub fn min(mut self, bound: DateTime<Utc>) -> Self {
        self.checks.push(DateCheck {
            bound,
            at_least: true,
            message: None,
        });
        self
    }

    /// No later than `bound`.
    pub fn max(mut self, bound: DateTime<Utc>) -> Self {
        self.checks.push(DateCheck {
            bound,
            at_least: false,
            message: None,
        });
        self
    }

    /// Replace the message of the most recently added check.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        if let Some(check) = self.checks.last_mut() {
            check.message = Some(message.into());
        }
        self
    }

    pub(crate) fn check(&self, value: Value, scope: &Scope) -> Checked {
        let value = match value {
            Value::String(_) | Value::Number(_) if self.coerce => match read_date(&value) {
                Some(date) => Value::Date(date),
                None => return scope.fail(IssueKind::InvalidDate),
            },
            other => other,
        };
        let date = match value {
            Value::Date(date) => date,
            other => return scope.invalid_type(ParsedType::Date, &other),
        };

        let mut collected = Collected::default();
        for check in &self.checks {
            let millis = check.bound.timestamp_millis() as f64;
            let kind = if check.at_least && date < check.bound {
                IssueKind::TooSmall {
                    minimum: millis,
                    inclusive: true,
                    exact: false,
                    origin: SizeOrigin::Date,
                }
            } else if !check.at_least && date > check.bound {
                IssueKind::TooBig {
                    maximum: millis,
                    inclusive: true,
                    exact: false,
                    origin: SizeOrigin::Date,
                }
            } else {
                continue;
            };
            collected.push(scope.issue(kind, check.message.clone()));
        }
        collected.finish(Value::Date(date))
    }
}

impl From<DateSchema> for Schema {
    fn from(schema: DateSchema) -> Self {
        Schema::new(Kind::Date(schema))
    }
}
