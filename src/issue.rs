//! The vocabulary of validation failures
//!
//! An [`Issue`] is one localized failure: where it happened ([`Path`]), what
//! went wrong ([`IssueKind`], with a machine-readable [`IssueCode`]) and a
//! human-readable message. Issues are produced while a schema tree is walked and
//! are never mutated afterwards; moving an issue under a parent path builds a new
//! one.
//!
//! # Example
//!
//! ```
//! use weir::prelude::*;
//!
//! let report = weir::object()
//!     .field("age", weir::number())
//!     .safe_parse(serde_json::json!({ "age": "ten" }))
//!     .into_result()
//!     .unwrap_err();
//!
//! let issue = report.issues().head();
//! assert_eq!(issue.code(), IssueCode::InvalidType);
//! assert_eq!(issue.path(), &[PathSegment::from("age")]);
//! assert_eq!(issue.message(), "Expected number, received string");
//! ```

use std::fmt;

use chrono::{DateTime, SecondsFormat};

use crate::error::Report;
use crate::value::Value;

#[cfg(feature = "serde")]
use serde::Serialize;

/// One step of a [`Path`]: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(untagged))]
pub enum PathSegment {
    /// Object member name
    Key(String),
    /// Array or tuple position
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Location of a value inside the input, outermost segment first.
pub type Path = Vec<PathSegment>;

/// Runtime classification of a [`Value`], as reported by issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(rename_all = "lowercase"))]
pub enum ParsedType {
    /// A string
    String,
    /// A number that is not NaN
    Number,
    /// Not a number
    Nan,
    /// An integral number, used as an expectation
    Integer,
    /// A non-integral number
    Float,
    /// Infinite number
    Infinity,
    /// A boolean
    Boolean,
    /// A date instant
    Date,
    /// The absence of a value
    Undefined,
    /// An explicit null
    Null,
    /// An ordered sequence
    Array,
    /// A key-value record
    Object,
    /// A promise
    Promise,
    /// A callable
    Function,
    /// Nothing is acceptable
    Never,
}

impl ParsedType {
    /// The lowercase name used in messages.
    pub fn as_str(self) -> &'static str {
        match self {
            ParsedType::String => "string",
            ParsedType::Number => "number",
            ParsedType::Nan => "nan",
            ParsedType::Integer => "integer",
            ParsedType::Float => "float",
            ParsedType::Infinity => "infinity",
            ParsedType::Boolean => "boolean",
            ParsedType::Date => "date",
            ParsedType::Undefined => "undefined",
            ParsedType::Null => "null",
            ParsedType::Array => "array",
            ParsedType::Object => "object",
            ParsedType::Promise => "promise",
            ParsedType::Function => "function",
            ParsedType::Never => "never",
        }
    }
}

impl fmt::Display for ParsedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a size bound was measured on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(rename_all = "lowercase"))]
pub enum SizeOrigin {
    /// String length in characters
    String,
    /// Numeric value
    Number,
    /// Element count
    Array,
    /// Milliseconds since the epoch
    Date,
}

/// The format a string failed to match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(rename_all = "snake_case"))]
pub enum StringValidation {
    /// Email address
    Email,
    /// Absolute URL
    Url,
    /// UUID in hyphenated form
    Uuid,
    /// RFC 3339 timestamp
    Datetime,
    /// Regular expression, with its source pattern
    Regex(String),
    /// Required prefix
    StartsWith(String),
    /// Required suffix
    EndsWith(String),
    /// Required substring
    Includes(String),
}

/// Machine-readable issue code; a closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(rename_all = "snake_case"))]
pub enum IssueCode {
    /// Wrong runtime type
    InvalidType,
    /// Value, length or count below a bound
    TooSmall,
    /// Value, length or count above a bound
    TooBig,
    /// String format mismatch
    InvalidString,
    /// Raised by a refinement or transform
    Custom,
    /// No union member matched
    InvalidUnion,
    /// Not one of the enum options
    InvalidEnumValue,
    /// Not the expected literal
    InvalidLiteral,
    /// Discriminant selects no union member
    InvalidUnionDiscriminator,
    /// Keys outside a strict object's shape
    UnrecognizedKeys,
    /// Number not a multiple of the step
    NotMultipleOf,
    /// Input could not be read as a date
    InvalidDate,
    /// Function called with invalid arguments
    InvalidArguments,
    /// Function returned an invalid value
    InvalidReturnType,
    /// Both sides of an intersection passed but disagree
    InvalidIntersectionTypes,
}

impl IssueCode {
    /// The snake_case code string.
    pub fn as_str(self) -> &'static str {
        match self {
            IssueCode::InvalidType => "invalid_type",
            IssueCode::TooSmall => "too_small",
            IssueCode::TooBig => "too_big",
            IssueCode::InvalidString => "invalid_string",
            IssueCode::Custom => "custom",
            IssueCode::InvalidUnion => "invalid_union",
            IssueCode::InvalidEnumValue => "invalid_enum_value",
            IssueCode::InvalidLiteral => "invalid_literal",
            IssueCode::InvalidUnionDiscriminator => "invalid_union_discriminator",
            IssueCode::UnrecognizedKeys => "unrecognized_keys",
            IssueCode::NotMultipleOf => "not_multiple_of",
            IssueCode::InvalidDate => "invalid_date",
            IssueCode::InvalidArguments => "invalid_arguments",
            IssueCode::InvalidReturnType => "invalid_return_type",
            IssueCode::InvalidIntersectionTypes => "invalid_intersection_types",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An issue's code together with its context data.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize),
    serde(tag = "code", rename_all = "snake_case")
)]
pub enum IssueKind {
    /// Wrong runtime type
    InvalidType {
        /// Type the schema wanted
        expected: ParsedType,
        /// Type of the input
        received: ParsedType,
    },
    /// Not the expected literal
    InvalidLiteral {
        /// The literal
        expected: Value,
    },
    /// Raised by a refinement or transform
    Custom {
        /// Caller supplied data
        #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
        params: Option<Value>,
    },
    /// No union member matched; one report per member
    InvalidUnion {
        /// Per-member failures, in member order
        union_errors: Vec<Report>,
    },
    /// Discriminant selects no union member
    InvalidUnionDiscriminator {
        /// Accepted discriminant values
        options: Vec<Value>,
    },
    /// Not one of the enum options
    InvalidEnumValue {
        /// Accepted options, in declaration order
        options: Vec<String>,
        /// The input
        received: Value,
    },
    /// Keys outside a strict object's shape
    UnrecognizedKeys {
        /// The offending keys, in input order
        keys: Vec<String>,
    },
    /// Function called with invalid arguments
    InvalidArguments {
        /// Issues of the argument tuple
        argument_errors: Report,
    },
    /// Function returned an invalid value
    InvalidReturnType {
        /// Issues of the return value
        return_type_errors: Report,
    },
    /// Input could not be read as a date
    InvalidDate,
    /// String format mismatch
    InvalidString {
        /// The failed format
        validation: StringValidation,
    },
    /// Below a bound
    TooSmall {
        /// The bound
        minimum: f64,
        /// Whether the bound itself is allowed
        inclusive: bool,
        /// Whether the bound is an exact size
        exact: bool,
        /// What was measured
        origin: SizeOrigin,
    },
    /// Above a bound
    TooBig {
        /// The bound
        maximum: f64,
        /// Whether the bound itself is allowed
        inclusive: bool,
        /// Whether the bound is an exact size
        exact: bool,
        /// What was measured
        origin: SizeOrigin,
    },
    /// Both sides of an intersection passed but disagree
    InvalidIntersectionTypes,
    /// Number not a multiple of the step
    NotMultipleOf {
        /// The step
        multiple_of: f64,
    },
}

fn quote_all(options: impl IntoIterator<Item = String>) -> String {
    options
        .into_iter()
        .map(|o| format!("'{}'", o))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn bare(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn date_bound(millis: f64) -> String {
    DateTime::from_timestamp_millis(millis as i64)
        .map(|d| d.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| millis.to_string())
}

impl IssueKind {
    /// The machine-readable code.
    pub fn code(&self) -> IssueCode {
        match self {
            IssueKind::InvalidType { .. } => IssueCode::InvalidType,
            IssueKind::InvalidLiteral { .. } => IssueCode::InvalidLiteral,
            IssueKind::Custom { .. } => IssueCode::Custom,
            IssueKind::InvalidUnion { .. } => IssueCode::InvalidUnion,
            IssueKind::InvalidUnionDiscriminator { .. } => IssueCode::InvalidUnionDiscriminator,
            IssueKind::InvalidEnumValue { .. } => IssueCode::InvalidEnumValue,
            IssueKind::UnrecognizedKeys { .. } => IssueCode::UnrecognizedKeys,
            IssueKind::InvalidArguments { .. } => IssueCode::InvalidArguments,
            IssueKind::InvalidReturnType { .. } => IssueCode::InvalidReturnType,
            IssueKind::InvalidDate => IssueCode::InvalidDate,
            IssueKind::InvalidString { .. } => IssueCode::InvalidString,
            IssueKind::TooSmall { .. } => IssueCode::TooSmall,
            IssueKind::TooBig { .. } => IssueCode::TooBig,
            IssueKind::InvalidIntersectionTypes => IssueCode::InvalidIntersectionTypes,
            IssueKind::NotMultipleOf { .. } => IssueCode::NotMultipleOf,
        }
    }

    /// The English message used when no custom message was configured.
    pub fn default_message(&self) -> String {
        match self {
            IssueKind::InvalidType { received: ParsedType::Undefined, .. } => "Required".to_string(),
            IssueKind::InvalidType { expected, received } => {
                format!("Expected {}, received {}", expected, received)
            }
            IssueKind::InvalidLiteral { expected } => {
                format!("Invalid literal value, expected {}", expected)
            }
            IssueKind::Custom { .. } | IssueKind::InvalidUnion { .. } => "Invalid input".to_string(),
            IssueKind::InvalidUnionDiscriminator { options } => format!(
                "Invalid discriminator value. Expected {}",
                quote_all(options.iter().map(bare))
            ),
            IssueKind::InvalidEnumValue { options, received } => format!(
                "Invalid enum value. Expected {}, received '{}'",
                quote_all(options.iter().cloned()),
                bare(received)
            ),
            IssueKind::UnrecognizedKeys { keys } => format!(
                "Unrecognized key(s) in object: {}",
                keys.iter()
                    .map(|k| format!("'{}'", k))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            IssueKind::InvalidArguments { .. } => "Invalid function arguments".to_string(),
            IssueKind::InvalidReturnType { .. } => "Invalid function return type".to_string(),
            IssueKind::InvalidDate => "Invalid date".to_string(),
            IssueKind::InvalidString { validation } => match validation {
                StringValidation::Email => "Invalid email".to_string(),
                StringValidation::Url => "Invalid url".to_string(),
                StringValidation::Uuid => "Invalid uuid".to_string(),
                StringValidation::Datetime => "Invalid datetime".to_string(),
                StringValidation::Regex(_) => "Invalid".to_string(),
                StringValidation::StartsWith(p) => {
                    format!("Invalid input: must start with \"{}\"", p)
                }
                StringValidation::EndsWith(s) => format!("Invalid input: must end with \"{}\"", s),
                StringValidation::Includes(s) => format!("Invalid input: must include \"{}\"", s),
            },
            IssueKind::TooSmall { minimum, inclusive, exact, origin } => match origin {
                SizeOrigin::String => format!(
                    "String must contain {} {} character(s)",
                    if *exact { "exactly" } else if *inclusive { "at least" } else { "over" },
                    minimum
                ),
                SizeOrigin::Array => format!(
                    "Array must contain {} {} element(s)",
                    if *exact { "exactly" } else if *inclusive { "at least" } else { "more than" },
                    minimum
                ),
                SizeOrigin::Number => format!(
                    "Number must be {}{}",
                    if *exact {
                        "exactly "
                    } else if *inclusive {
                        "greater than or equal to "
                    } else {
                        "greater than "
                    },
                    minimum
                ),
                SizeOrigin::Date => format!(
                    "Date must be {}{}",
                    if *exact {
                        "exactly equal to "
                    } else if *inclusive {
                        "greater than or equal to "
                    } else {
                        "greater than "
                    },
                    date_bound(*minimum)
                ),
            },
            IssueKind::TooBig { maximum, inclusive, exact, origin } => match origin {
                SizeOrigin::String => format!(
                    "String must contain {} {} character(s)",
                    if *exact { "exactly" } else if *inclusive { "at most" } else { "under" },
                    maximum
                ),
                SizeOrigin::Array => format!(
                    "Array must contain {} {} element(s)",
                    if *exact { "exactly" } else if *inclusive { "at most" } else { "less than" },
                    maximum
                ),
                SizeOrigin::Number => format!(
                    "Number must be {}{}",
                    if *exact {
                        "exactly "
                    } else if *inclusive {
                        "less than or equal to "
                    } else {
                        "less than "
                    },
                    maximum
                ),
                SizeOrigin::Date => format!(
                    "Date must be {}{}",
                    if *exact {
                        "exactly equal to "
                    } else if *inclusive {
                        "smaller than or equal to "
                    } else {
                        "smaller than "
                    },
                    date_bound(*maximum)
                ),
            },
            IssueKind::InvalidIntersectionTypes => {
                "Intersection results could not be merged".to_string()
            }
            IssueKind::NotMultipleOf { multiple_of } => {
                format!("Number must be a multiple of {}", multiple_of)
            }
        }
    }
}

/// One validation failure.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Issue {
    #[cfg_attr(feature = "serde", serde(flatten))]
    kind: IssueKind,
    path: Path,
    message: String,
}

impl Issue {
    /// Create an issue; `message` falls back to the kind's default message.
    pub fn new(kind: IssueKind, path: Path, message: Option<String>) -> Self {
        let message = message.unwrap_or_else(|| kind.default_message());
        Self { kind, path, message }
    }

    /// The issue code.
    pub fn code(&self) -> IssueCode {
        self.kind.code()
    }

    /// The code and its context data.
    pub fn kind(&self) -> &IssueKind {
        &self.kind
    }

    /// Where in the input the failure happened.
    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    /// Human-readable description.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Re-root this issue under `prefix`.
    pub(crate) fn prefixed(self, prefix: &[PathSegment]) -> Self {
        if prefix.is_empty() {
            return self;
        }
        let mut path = prefix.to_vec();
        path.extend(self.path);
        Self { path, ..self }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{} ({})", self.message, self.code())
        } else {
            let path: Vec<String> = self.path.iter().map(ToString::to_string).collect();
            write!(f, "{}: {} ({})", path.join("."), self.message, self.code())
        }
    }
}

/// An issue described by a refinement or transform, relative to the node it is
/// attached to.
///
/// # Example
///
/// ```
/// use weir::IssueData;
///
/// let data = IssueData::custom("passwords do not match").at(["confirmation"]);
/// assert_eq!(data.message_text(), Some("passwords do not match"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct IssueData {
    kind: IssueKind,
    message: Option<String>,
    path: Path,
}

impl IssueData {
    /// An issue of the given kind, with the default message.
    pub fn new(kind: IssueKind) -> Self {
        Self {
            kind,
            message: None,
            path: Vec::new(),
        }
    }

    /// A `custom` issue with a message.
    pub fn custom(message: impl Into<String>) -> Self {
        Self::new(IssueKind::Custom { params: None }).message(message)
    }

    /// Override the message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Place the issue below the node, at a relative path.
    pub fn at<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathSegment>,
    {
        self.path = path.into_iter().map(Into::into).collect();
        self
    }

    /// The configured message, if any.
    pub fn message_text(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub(crate) fn into_issue(self, base: &[PathSegment]) -> Issue {
        let mut path = base.to_vec();
        path.extend(self.path);
        Issue::new(self.kind, path, self.message)
    }
}
