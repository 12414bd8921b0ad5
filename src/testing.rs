//! Assertion macros for tests of schemas
//!
//! # Examples
//!
//! ```rust
//! use weir::prelude::*;
//! use weir::{assert_failure, assert_issues, assert_success};
//!
//! let schema = weir::object().field("age", weir::number().int());
//! assert_success!(schema.safe_parse(serde_json::json!({ "age": 3 })));
//! assert_failure!(schema.safe_parse(serde_json::json!({})));
//! assert_issues!(
//!     schema.safe_parse(serde_json::json!({ "age": 1.5, "x": 0 })),
//!     [(IssueCode::InvalidType, ["age"]), (IssueCode::UnrecognizedKeys, [])]
//! );
//! ```

/// Assert that a validation succeeds.
///
/// This macro will panic if the validation is a `Failure`.
///
/// # Example
///
/// ```rust
/// use weir::{Validation, assert_success};
///
/// let val = Validation::<_, Vec<String>>::success(42);
/// assert_success!(val);
/// ```
#[macro_export]
macro_rules! assert_success {
    ($validation:expr) => {
        match $validation {
            $crate::Validation::Success(_) => {}
            $crate::Validation::Failure(e) => {
                panic!("Expected Success, got Failure: {:?}", e);
            }
        }
    };
}

/// Assert that a validation fails.
///
/// This macro will panic if the validation is a `Success`.
///
/// # Example
///
/// ```rust
/// use weir::{Validation, assert_failure};
///
/// let val = Validation::<i32, _>::failure(vec!["error".to_string()]);
/// assert_failure!(val);
/// ```
#[macro_export]
macro_rules! assert_failure {
    ($validation:expr) => {
        match $validation {
            $crate::Validation::Failure(_) => {}
            $crate::Validation::Success(v) => {
                panic!("Expected Failure, got Success: {:?}", v);
            }
        }
    };
}

/// Assert that a parse failed with exactly these issue codes at these paths,
/// in order.
///
/// Each expected issue is written as `(code, [segment, ...])`; segments are
/// anything convertible into a [`PathSegment`](crate::PathSegment).
#[macro_export]
macro_rules! assert_issues {
    ($validation:expr, [$(($code:expr, [$($segment:expr),* $(,)?])),* $(,)?]) => {
        match $validation {
            $crate::Validation::Failure(report) => {
                let actual: Vec<($crate::IssueCode, Vec<$crate::PathSegment>)> = report
                    .issues()
                    .iter()
                    .map(|issue| (issue.code(), issue.path().to_vec()))
                    .collect();
                let expected: Vec<($crate::IssueCode, Vec<$crate::PathSegment>)> = vec![
                    $(($code, vec![$($crate::PathSegment::from($segment)),*])),*
                ];
                assert_eq!(actual, expected, "issues of {}", report);
            }
            $crate::Validation::Success(v) => {
                panic!("Expected Failure with issues, got Success: {:?}", v);
            }
        }
    };
}
