//! # weir
//!
//! Composable runtime schemas for validating and transforming dynamic values.
//!
//! A schema describes what a value should look like. Parsing walks the value
//! against the schema tree, collects **every** issue with the path where it
//! happened, and returns either the parsed value or a [`Report`]. Refinements
//! and transforms attach to any schema and run only on values that already
//! passed the structural checks.
//!
//! ## Quick Example
//!
//! ```rust
//! use serde_json::json;
//! use weir::prelude::*;
//!
//! let password = weir::string().min(8).max(16);
//! let login = weir::object()
//!     .field("email", weir::string().email())
//!     .field("password", password);
//!
//! assert!(login.parse(json!({ "email": "a@example.com", "password": "Password1!" })).is_ok());
//!
//! match login.safe_parse(json!({ "email": "", "password": "short" })) {
//!     Validation::Success(value) => println!("valid: {}", value),
//!     Validation::Failure(report) => {
//!         assert_eq!(report.len(), 2);
//!         let tree = report.format();
//!         assert_eq!(tree.get("email").unwrap().errors(), ["Invalid email"]);
//!     }
//! }
//! ```
//!
//! Schemas with asynchronous steps or promises are parsed with
//! [`SchemaExt::parse_async`]; the synchronous entry points report
//! [`Error::AsyncInSync`] when they reach one.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod coerce;
pub mod error;
pub mod issue;
pub mod nonempty;
pub mod predicate;
pub mod schema;
pub mod semigroup;
pub mod testing;
pub mod validation;
pub mod value;

mod parse;
mod refine;
mod runner;
#[cfg(feature = "serde")]
mod serde_impl;

// Re-exports
pub use error::{Error, ErrorTree, FlattenedErrors, Report, SchemaError};
pub use issue::{Issue, IssueCode, IssueData, IssueKind, ParsedType, Path, PathSegment};
pub use nonempty::NonEmptyVec;
pub use parse::ParseOptions;
pub use refine::{RefineParams, RefinementCtx};
pub use schema::{
    ArraySchema, DateSchema, EnumSchema, FunctionSchema, NumberSchema, ObjectSchema, RecordSchema,
    Schema, SchemaExt, StringSchema, TupleSchema, UnknownKeys,
};
pub use semigroup::Semigroup;
pub use validation::Validation;
pub use value::{Function, Object, Promise, Value};

use schema::{DiscriminatedUnion, Kind, LazySchema};

/// Any string.
pub fn string() -> StringSchema {
    StringSchema::new()
}

/// Any finite number.
pub fn number() -> NumberSchema {
    NumberSchema::new()
}

/// `true` or `false`.
pub fn boolean() -> Schema {
    Schema::new(Kind::Boolean)
}

/// A date instant.
pub fn date() -> DateSchema {
    DateSchema::new()
}

/// Exactly `value`.
pub fn literal(value: impl Into<Value>) -> Schema {
    Schema::new(Kind::Literal(value.into()))
}

/// One of `options`.
pub fn enumeration<I, S>(options: I) -> EnumSchema
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    EnumSchema::new(options)
}

/// Only `Null`.
pub fn null() -> Schema {
    Schema::new(Kind::Null)
}

/// Only `Undefined`.
pub fn undefined() -> Schema {
    Schema::new(Kind::Undefined)
}

/// Anything, unchecked.
pub fn any() -> Schema {
    Schema::new(Kind::Any)
}

/// Anything, unchecked.
pub fn unknown() -> Schema {
    Schema::new(Kind::Unknown)
}

/// Nothing.
pub fn never() -> Schema {
    Schema::new(Kind::Never)
}

/// An object with no fields yet; add them with [`ObjectSchema::field`].
pub fn object() -> ObjectSchema {
    ObjectSchema::new()
}

/// An array of `element`.
pub fn array(element: impl Into<Schema>) -> ArraySchema {
    ArraySchema::new(element.into())
}

/// A fixed-length array with one schema per position.
pub fn tuple<I, S>(items: I) -> TupleSchema
where
    I: IntoIterator<Item = S>,
    S: Into<Schema>,
{
    TupleSchema::new(items.into_iter().map(Into::into).collect())
}

/// A map from string keys to `value`.
pub fn record(value: impl Into<Schema>) -> RecordSchema {
    RecordSchema::new(None, value.into())
}

/// A map whose keys match `key` and whose values match `value`.
pub fn record_with_keys(key: impl Into<Schema>, value: impl Into<Schema>) -> RecordSchema {
    RecordSchema::new(Some(key.into()), value.into())
}

/// The first of `members` that accepts the value.
pub fn union<I, S>(members: I) -> Schema
where
    I: IntoIterator<Item = S>,
    S: Into<Schema>,
{
    Schema::new(Kind::Union(members.into_iter().map(Into::into).collect()))
}

/// The object member whose `discriminator` field matches.
///
/// Every member must be an object schema whose `discriminator` field is a
/// literal or an enum, and no two members may share a value.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use weir::prelude::*;
///
/// let event = weir::discriminated_union(
///     "type",
///     [
///         weir::object().field("type", weir::literal("a")).field("a", weir::string()),
///         weir::object().field("type", weir::literal("b")).field("b", weir::string()),
///     ],
/// )?;
///
/// assert!(event.parse(json!({ "type": "a", "a": "abc" })).is_ok());
/// let report = event.safe_parse(json!({ "type": "c" })).into_result().unwrap_err();
/// assert_eq!(report.codes(), vec![IssueCode::InvalidUnionDiscriminator]);
/// # Ok::<(), weir::SchemaError>(())
/// ```
pub fn discriminated_union<I, S>(
    discriminator: impl Into<String>,
    members: I,
) -> Result<Schema, SchemaError>
where
    I: IntoIterator<Item = S>,
    S: Into<Schema>,
{
    DiscriminatedUnion::new(discriminator, members.into_iter().map(Into::into)).map(Schema::from)
}

/// Both `left` and `right`, with the results merged.
pub fn intersection(left: impl Into<Schema>, right: impl Into<Schema>) -> Schema {
    Schema::new(Kind::Intersection(left.into(), right.into()))
}

/// A schema built by `init` on first use, for recursive definitions.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use weir::prelude::*;
///
/// fn tree() -> Schema {
///     weir::object()
///         .field("value", weir::number())
///         .field("children", weir::lazy(tree).array())
///         .into()
/// }
///
/// assert!(tree().parse(json!({ "value": 1, "children": [{ "value": 2, "children": [] }] })).is_ok());
/// ```
pub fn lazy<F>(init: F) -> Schema
where
    F: Fn() -> Schema + Send + Sync + 'static,
{
    LazySchema::new(init).into()
}

/// A promise resolving to a value matching `inner`.
pub fn promise(inner: impl Into<Schema>) -> Schema {
    Schema::new(Kind::Promise(inner.into()))
}

/// A callable; add checks with [`FunctionSchema::args`] and
/// [`FunctionSchema::returns`].
pub fn function() -> FunctionSchema {
    FunctionSchema::new()
}

/// `schema` with `f` applied to the raw input first.
pub fn preprocess<F>(f: F, schema: impl Into<Schema>) -> Schema
where
    F: Fn(Value, &mut RefinementCtx) -> Value + Send + Sync + 'static,
{
    let schema: Schema = schema.into();
    schema.preprocess(f)
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Report, SchemaError};
    pub use crate::issue::{IssueCode, IssueData, IssueKind, PathSegment};
    pub use crate::parse::ParseOptions;
    pub use crate::refine::{RefineParams, RefinementCtx};
    pub use crate::schema::{
        ArraySchema, DateSchema, EnumSchema, FunctionSchema, NumberSchema, ObjectSchema,
        RecordSchema, Schema, SchemaExt, StringSchema, TupleSchema, UnknownKeys,
    };
    pub use crate::semigroup::Semigroup;
    pub use crate::validation::Validation;
    pub use crate::value::{Function, Object, Promise, Value};
}
