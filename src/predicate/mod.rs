//! Predicate combinators for composable validation logic
//!
//! The primitive schemas express their checks (length bounds, formats, numeric
//! bounds) as predicates from this module, and callers can hand their own
//! predicates to [`StringSchema::satisfies`](crate::schema::StringSchema::satisfies).
//! Predicates combine with `and`, `or` and `not`.
//!
//! # Example
//!
//! ```rust
//! use weir::predicate::*;
//!
//! let alphanumeric = any_char(|c: char| c.is_ascii_digit()).and(any_char(char::is_alphabetic));
//! assert!(alphanumeric.check("Password1"));
//! assert!(!alphanumeric.check("Password"));
//! ```

mod combinators;
mod number;
mod string;

pub use combinators::{And, Not, Or, Predicate, PredicateExt};

pub use string::{
    all_chars, any_char, contains, ends_with, is_datetime, is_email, is_url, is_uuid, len_between,
    len_eq, len_max, len_min, matches, starts_with, AllChars, AnyChar, Contains, EndsWith,
    IsDatetime, IsEmail, IsUrl, IsUuid, LenBetween, Matches, StartsWith,
};

pub use number::{ge, gt, is_integer, le, lt, multiple_of, Ge, Gt, IsInteger, Le, Lt, MultipleOf};
