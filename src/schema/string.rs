use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::SchemaError;
use crate::issue::{IssueKind, ParsedType, SizeOrigin, StringValidation};
use crate::parse::Scope;
use crate::predicate::{self, Predicate};
use crate::runner::{Checked, Collected};
use crate::schema::{Bound, Kind, Schema, SizeCheck};
use crate::value::Value;

/// Schema for strings.
///
/// Checks run in the order they were added and all of them are reported; a
/// failed length check does not hide a failed format check. `trim`,
/// `to_lowercase` and `to_uppercase` rewrite the value for the checks after
/// them and for the result.
///
/// # Example
///
/// ```
/// use weir::prelude::*;
///
/// let schema = weir::string().trim().min(3).email();
/// assert_eq!(schema.parse("  a@example.com ").unwrap(), Value::from("a@example.com"));
///
/// let report = schema.safe_parse("x").into_result().unwrap_err();
/// assert_eq!(report.codes(), vec![IssueCode::TooSmall, IssueCode::InvalidString]);
/// ```
#[derive(Clone)]
pub struct StringSchema {
    checks: Vec<StringCheck>,
}

#[derive(Clone)]
enum StringCheck {
    Size(SizeCheck),
    Format {
        validation: StringValidation,
        test: Arc<dyn Predicate<str>>,
        message: Option<String>,
    },
    Satisfies {
        test: Arc<dyn Predicate<str>>,
        message: Option<String>,
    },
    Trim,
    Lowercase,
    Uppercase,
}

impl StringSchema {
    pub(crate) fn new() -> Self {
        Self { checks: Vec::new() }
    }

    fn with(mut self, check: StringCheck) -> Self {
        self.checks.push(check);
        self
    }

    fn format<P>(self, validation: StringValidation, test: P) -> Self
    where
        P: Predicate<str> + 'static,
    {
        self.with(StringCheck::Format {
            validation,
            test: Arc::new(test),
            message: None,
        })
    }

    /// At least `len` characters.
    pub fn min(self, len: usize) -> Self {
        self.with(StringCheck::Size(SizeCheck::new(Bound::Min, len)))
    }

    /// At most `len` characters.
    pub fn max(self, len: usize) -> Self {
        self.with(StringCheck::Size(SizeCheck::new(Bound::Max, len)))
    }

    /// Exactly `len` characters.
    pub fn length(self, len: usize) -> Self {
        self.with(StringCheck::Size(SizeCheck::new(Bound::Exact, len)))
    }

    /// At least one character.
    pub fn nonempty(self) -> Self {
        self.min(1)
    }

    /// An email address.
    pub fn email(self) -> Self {
        self.format(StringValidation::Email, predicate::is_email())
    }

    /// An absolute URL.
    pub fn url(self) -> Self {
        self.format(StringValidation::Url, predicate::is_url())
    }

    /// A hyphenated UUID.
    pub fn uuid(self) -> Self {
        self.format(StringValidation::Uuid, predicate::is_uuid())
    }

    /// An RFC 3339 timestamp.
    pub fn datetime(self) -> Self {
        self.format(StringValidation::Datetime, predicate::is_datetime())
    }

    /// Matches the regular expression `pattern` anywhere in the string.
    ///
    /// Fails with [`SchemaError::InvalidPattern`] if the pattern does not
    /// compile.
    pub fn regex(self, pattern: &str) -> Result<Self, SchemaError> {
        let compiled =
            Regex::new(pattern).map_err(|e| SchemaError::InvalidPattern(e.to_string()))?;
        Ok(self.matches(compiled))
    }

    /// Matches an already compiled regular expression.
    pub fn matches(self, pattern: Regex) -> Self {
        let source = pattern.as_str().to_string();
        self.format(StringValidation::Regex(source), predicate::matches(pattern))
    }

    /// Starts with `prefix`.
    pub fn starts_with(self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.format(
            StringValidation::StartsWith(prefix.clone()),
            predicate::starts_with(prefix),
        )
    }

    /// Ends with `suffix`.
    pub fn ends_with(self, suffix: impl Into<String>) -> Self {
        let suffix = suffix.into();
        self.format(
            StringValidation::EndsWith(suffix.clone()),
            predicate::ends_with(suffix),
        )
    }

    /// Contains `needle`.
    pub fn includes(self, needle: impl Into<String>) -> Self {
        let needle = needle.into();
        self.format(
            StringValidation::Includes(needle.clone()),
            predicate::contains(needle),
        )
    }

    /// Satisfies a predicate; failure reports a `custom` issue with `message`.
    ///
    /// Unlike `refine`, this runs with the other checks and does not stop them.
    ///
    /// # Example
    ///
    /// ```
    /// use weir::predicate::{any_char, PredicateExt};
    /// use weir::prelude::*;
    ///
    /// let schema = weir::string()
    ///     .min(8)
    ///     .satisfies(any_char(char::is_lowercase).and(any_char(char::is_uppercase)), "mixed case");
    /// assert!(schema.parse("Password").is_ok());
    /// assert_eq!(schema.safe_parse("pass").into_result().unwrap_err().len(), 2);
    /// ```
    pub fn satisfies<P>(self, test: P, message: impl Into<String>) -> Self
    where
        P: Predicate<str> + 'static,
    {
        self.with(StringCheck::Satisfies {
            test: Arc::new(test),
            message: Some(message.into()),
        })
    }

    /// Strip leading and trailing whitespace.
    pub fn trim(self) -> Self {
        self.with(StringCheck::Trim)
    }

    /// Convert to lowercase.
    pub fn to_lowercase(self) -> Self {
        self.with(StringCheck::Lowercase)
    }

    /// Convert to uppercase.
    pub fn to_uppercase(self) -> Self {
        self.with(StringCheck::Uppercase)
    }

    /// Replace the message of the most recently added check.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        match self.checks.last_mut() {
            Some(StringCheck::Size(size)) => size.set_message(message),
            Some(StringCheck::Format { message: slot, .. })
            | Some(StringCheck::Satisfies { message: slot, .. }) => *slot = Some(message),
            _ => {}
        }
        self
    }

    pub(crate) fn check(&self, value: Value, scope: &Scope) -> Checked {
        let mut text = match value {
            Value::String(text) => text,
            other => return scope.invalid_type(ParsedType::String, &other),
        };

        let mut collected = Collected::default();
        for check in &self.checks {
            match check {
                StringCheck::Size(size) => {
                    if let Some(issue) = size.issue(text.chars().count(), SizeOrigin::String, scope) {
                        collected.push(issue);
                    }
                }
                StringCheck::Format {
                    validation,
                    test,
                    message,
                } => {
                    if !test.check(text.as_str()) {
                        collected.push(scope.issue(
                            IssueKind::InvalidString {
                                validation: validation.clone(),
                            },
                            message.clone(),
                        ));
                    }
                }
                StringCheck::Satisfies { test, message } => {
                    if !test.check(text.as_str()) {
                        collected.push(scope.issue(IssueKind::Custom { params: None }, message.clone()));
                    }
                }
                StringCheck::Trim => text = text.trim().to_string(),
                StringCheck::Lowercase => text = text.to_lowercase(),
                StringCheck::Uppercase => text = text.to_uppercase(),
            }
        }
        collected.finish(Value::String(text))
    }
}

impl fmt::Debug for StringSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self
            .checks
            .iter()
            .map(|check| match check {
                StringCheck::Size(_) => "size",
                StringCheck::Format { .. } => "format",
                StringCheck::Satisfies { .. } => "satisfies",
                StringCheck::Trim => "trim",
                StringCheck::Lowercase => "lowercase",
                StringCheck::Uppercase => "uppercase",
            })
            .collect();
        f.debug_struct("StringSchema").field("checks", &names).finish()
    }
}

impl From<StringSchema> for Schema {
    fn from(schema: StringSchema) -> Self {
        Schema::new(Kind::String(schema))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::IssueCode;
    use crate::{string, SchemaExt};

    #[test]
    fn test_rejects_non_strings() {
        let report = string().parse(1).unwrap_err().into_report().unwrap();
        assert_eq!(report.codes(), vec![IssueCode::InvalidType]);
    }

    #[test]
    fn test_length_bounds_collect_all() {
        let schema = string().min(8).max(16);
        assert!(schema.parse("Password1!").is_ok());

        let long = "1".repeat(101);
        let report = schema.parse(long.as_str()).unwrap_err().into_report().unwrap();
        assert_eq!(report.codes(), vec![IssueCode::TooBig]);
        assert_eq!(
            report.issues().head().message(),
            "String must contain at most 16 character(s)"
        );
    }

    #[test]
    fn test_exact_length() {
        let schema = string().length(2);
        let short = schema.parse("a").unwrap_err().into_report().unwrap();
        assert_eq!(
            short.issues().head().message(),
            "String must contain exactly 2 character(s)"
        );
        assert!(schema.parse("ab").is_ok());
    }

    #[test]
    fn test_nonempty_email_both_reported() {
        let report = string()
            .nonempty()
            .email()
            .parse("")
            .unwrap_err()
            .into_report()
            .unwrap();
        assert_eq!(report.codes(), vec![IssueCode::TooSmall, IssueCode::InvalidString]);
        assert_eq!(report.issues()[1].message(), "Invalid email");
    }

    #[test]
    fn test_regex() {
        let schema = string().regex("^[a-z]+$").unwrap();
        assert!(schema.parse("abc").is_ok());
        let report = schema.parse("ABC").unwrap_err().into_report().unwrap();
        assert_eq!(
            report.issues().head().kind(),
            &IssueKind::InvalidString {
                validation: StringValidation::Regex("^[a-z]+$".to_string())
            }
        );
        assert!(matches!(
            string().regex("("),
            Err(SchemaError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_affix_messages() {
        let report = string()
            .starts_with("https://")
            .ends_with(".com")
            .includes("example")
            .parse("ftp://x.org")
            .unwrap_err()
            .into_report()
            .unwrap();
        let messages: Vec<_> = report.issues().iter().map(|i| i.message().to_string()).collect();
        assert_eq!(
            messages,
            vec![
                "Invalid input: must start with \"https://\"",
                "Invalid input: must end with \".com\"",
                "Invalid input: must include \"example\"",
            ]
        );
    }

    #[test]
    fn test_custom_message() {
        let report = string()
            .min(3)
            .message("too short")
            .parse("a")
            .unwrap_err()
            .into_report()
            .unwrap();
        assert_eq!(report.issues().head().message(), "too short");
    }

    #[test]
    fn test_rewrites_apply_in_order() {
        let schema = string().trim().to_uppercase().length(3);
        assert_eq!(schema.parse("  abc ").unwrap(), Value::from("ABC"));
        assert_eq!(string().to_lowercase().parse("MiXeD").unwrap(), Value::from("mixed"));
    }

    #[test]
    fn test_formats() {
        assert!(string().url().parse("https://example.com").is_ok());
        assert!(string().uuid().parse("nope").is_err());
        assert!(string().datetime().parse("2022-01-12T00:00:00.000Z").is_ok());
    }
}
