//! Reports and errors
//!
//! A [`Report`] is the ordered, never-empty collection of [`Issue`]s produced by
//! one parse call. It renders as a flat list ([`Report::issues`]), as a tree that
//! mirrors the input ([`Report::format`]) or as form/field buckets
//! ([`Report::flatten`]).
//!
//! [`Error`] is what the raising entry points return; [`SchemaError`] is returned
//! when a schema is built from inconsistent parts.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use weir::prelude::*;
//!
//! let schema = weir::object().field("location", weir::object().field("latitude", weir::number()));
//! let report = schema
//!     .safe_parse(json!({ "location": { "latitude": "north" } }))
//!     .into_result()
//!     .unwrap_err();
//!
//! let tree = report.format();
//! assert_eq!(
//!     tree.to_json(),
//!     json!({
//!         "_errors": [],
//!         "location": {
//!             "_errors": [],
//!             "latitude": { "_errors": ["Expected number, received string"] }
//!         }
//!     })
//! );
//! ```

use std::fmt;

use indexmap::IndexMap;
use thiserror::Error as ThisError;

use crate::issue::{Issue, IssueCode, IssueKind, ParsedType, PathSegment};
use crate::nonempty::NonEmptyVec;
use crate::Semigroup;

/// The issues of one failed parse, in the order they were found.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    // Boxed: issues can nest reports of their own.
    issues: Box<NonEmptyVec<Issue>>,
}

impl Report {
    /// Create a report from at least one issue.
    pub fn new(issues: NonEmptyVec<Issue>) -> Self {
        Self {
            issues: Box::new(issues),
        }
    }

    /// A report holding a single issue.
    pub fn from_issue(issue: Issue) -> Self {
        Self::new(NonEmptyVec::singleton(issue))
    }

    /// The flat, ordered issue list.
    pub fn issues(&self) -> &NonEmptyVec<Issue> {
        &self.issues
    }

    /// Take the issue list.
    pub fn into_issues(self) -> NonEmptyVec<Issue> {
        *self.issues
    }

    /// Number of issues; always at least one.
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Always `false`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Issue codes in order.
    pub fn codes(&self) -> Vec<IssueCode> {
        self.issues.iter().map(Issue::code).collect()
    }

    /// Re-root every issue under `prefix`.
    pub(crate) fn prefixed(self, prefix: &[PathSegment]) -> Self {
        Self::new(self.into_issues().map(|issue| issue.prefixed(prefix)))
    }

    /// Render as a tree mirroring the input.
    ///
    /// Each level lists the messages of issues ending there under `_errors`, with
    /// one child per path segment. Issues nested inside union, argument and return
    /// type failures are folded into the same tree.
    pub fn format(&self) -> ErrorTree {
        let mut root = ErrorTree::default();
        fold_into(&mut root, self);
        root
    }

    /// Split issues into top-level messages and messages per first path segment.
    ///
    /// # Example
    ///
    /// ```
    /// use serde_json::json;
    /// use weir::prelude::*;
    ///
    /// let schema = weir::object()
    ///     .field("email", weir::string().email())
    ///     .field("name", weir::string());
    /// let report = schema
    ///     .safe_parse(json!({ "email": "nope", "extra": 1 }))
    ///     .into_result()
    ///     .unwrap_err();
    ///
    /// let flat = report.flatten();
    /// assert_eq!(flat.form_errors, vec!["Unrecognized key(s) in object: 'extra'"]);
    /// assert_eq!(flat.field_errors["email"], vec!["Invalid email"]);
    /// assert_eq!(flat.field_errors["name"], vec!["Required"]);
    /// ```
    pub fn flatten(&self) -> FlattenedErrors {
        let mut flat = FlattenedErrors::default();
        for issue in self.issues.iter() {
            match issue.path().first() {
                Some(segment) => flat
                    .field_errors
                    .entry(segment.to_string())
                    .or_default()
                    .push(issue.message().to_string()),
                None => flat.form_errors.push(issue.message().to_string()),
            }
        }
        flat
    }
}

fn fold_into(root: &mut ErrorTree, report: &Report) {
    for issue in report.issues.iter() {
        match issue.kind() {
            IssueKind::InvalidUnion { union_errors } => {
                for member in union_errors {
                    fold_into(root, member);
                }
            }
            IssueKind::InvalidArguments { argument_errors } => fold_into(root, argument_errors),
            IssueKind::InvalidReturnType { return_type_errors } => {
                fold_into(root, return_type_errors)
            }
            _ => {
                let mut node = &mut *root;
                for segment in issue.path() {
                    node = node.children.entry(segment.to_string()).or_default();
                }
                node.errors.push(issue.message().to_string());
            }
        }
    }
}

impl Semigroup for Report {
    fn combine(self, other: Self) -> Self {
        Self::new(self.into_issues().combine(other.into_issues()))
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed with {} issue(s)", self.len())?;
        for issue in self.issues.iter() {
            write!(f, "\n  - {}", issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for Report {}

/// Nested rendering of a [`Report`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorTree {
    errors: Vec<String>,
    children: IndexMap<String, ErrorTree>,
}

impl ErrorTree {
    /// Messages of issues located exactly at this level.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// The subtree below one path segment.
    pub fn get(&self, segment: impl Into<PathSegment>) -> Option<&ErrorTree> {
        self.children.get(&segment.into().to_string())
    }

    /// All subtrees, in the order they were first reached.
    pub fn children(&self) -> &IndexMap<String, ErrorTree> {
        &self.children
    }

    /// The JSON form: `{"_errors": [...], "<segment>": {...}}`.
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert(
            "_errors".to_string(),
            serde_json::Value::Array(
                self.errors
                    .iter()
                    .cloned()
                    .map(serde_json::Value::String)
                    .collect(),
            ),
        );
        for (key, child) in &self.children {
            map.insert(key.clone(), child.to_json());
        }
        serde_json::Value::Object(map)
    }
}

/// Messages split into form-level and per-field buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlattenedErrors {
    /// Messages of issues with an empty path
    pub form_errors: Vec<String>,
    /// Messages keyed by the first path segment
    pub field_errors: IndexMap<String, Vec<String>>,
}

/// Errors returned by the raising entry points and by function calls.
#[derive(Debug, ThisError)]
pub enum Error {
    /// The input failed validation.
    #[error("{0}")]
    Invalid(Report),

    /// A synchronous parse reached a step that can only complete asynchronously.
    #[error("asynchronous {step} encountered during a synchronous parse; use parse_async")]
    AsyncInSync {
        /// Which kind of step
        step: &'static str,
    },

    /// A value has no JSON representation.
    #[error("{found} values have no JSON representation")]
    NotJson {
        /// The offending value's type
        found: ParsedType,
    },

    /// The parsed value did not deserialize into the requested type.
    #[cfg(feature = "serde")]
    #[error("parsed value does not deserialize: {0}")]
    Deserialize(#[from] serde_json::Error),
}

impl Error {
    /// The validation report, if this is a validation failure.
    pub fn report(&self) -> Option<&Report> {
        match self {
            Error::Invalid(report) => Some(report),
            _ => None,
        }
    }

    /// Take the validation report, if this is a validation failure.
    pub fn into_report(self) -> Option<Report> {
        match self {
            Error::Invalid(report) => Some(report),
            _ => None,
        }
    }
}

impl From<Report> for Error {
    fn from(report: Report) -> Self {
        Error::Invalid(report)
    }
}

/// Errors raised while building a schema.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum SchemaError {
    /// A discriminated union member is not an object schema.
    #[error("discriminated union member {index} is not an object schema")]
    NotAnObject {
        /// Member position
        index: usize,
    },

    /// A member lacks a literal or enum discriminant field.
    #[error("discriminated union member {index} has no literal or enum field `{discriminator}`")]
    MissingDiscriminator {
        /// Member position
        index: usize,
        /// The discriminant field name
        discriminator: String,
    },

    /// Two members share a discriminant value.
    #[error("discriminator value {value} is used by more than one member")]
    DuplicateDiscriminator {
        /// The shared value
        value: String,
    },

    /// A regular expression failed to compile.
    #[error("invalid regular expression: {0}")]
    InvalidPattern(String),
}
