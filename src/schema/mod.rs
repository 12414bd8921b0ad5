//! Schemas
//!
//! A [`Schema`] is an immutable, cheaply cloneable handle to a validation rule.
//! The kind-specific builders ([`StringSchema`], [`ObjectSchema`], ...) carry
//! their own chainable checks and convert into a `Schema`; the modifiers every
//! schema shares (`optional`, `refine`, `transform`, ...) and the parse entry
//! points live on the [`SchemaExt`] extension trait.
//!
//! Modifiers never change a schema in place. They return a new handle that
//! shares its children with the original, so a schema can be reused in many
//! places and validated from many threads at once.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use weir::prelude::*;
//!
//! let user = weir::object()
//!     .field("name", weir::string().min(1))
//!     .field("age", weir::number().int().nonnegative().optional());
//!
//! assert!(user.parse(json!({ "name": "Ada" })).is_ok());
//! assert!(user.parse(json!({ "name": "", "age": 1.5 })).is_err());
//! ```

mod array;
mod date;
mod enumeration;
mod function;
mod intersection;
mod lazy;
mod number;
mod object;
mod promise;
mod record;
mod string;
mod union;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

pub use array::{ArraySchema, TupleSchema};
pub use date::DateSchema;
pub use enumeration::EnumSchema;
pub use function::FunctionSchema;
pub use number::NumberSchema;
pub use object::{ObjectSchema, UnknownKeys};
pub use record::RecordSchema;
pub use string::StringSchema;

pub(crate) use lazy::LazySchema;
pub(crate) use union::DiscriminatedUnion;

use crate::error::{Error, Report};
use crate::issue::{Issue, IssueKind, ParsedType, SizeOrigin};
use crate::parse::{self, ParseOptions, Scope};
use crate::refine::{RefineParams, RefinementCtx, Step};
use crate::runner::Outcome;
use crate::validation::Validation;
use crate::value::Value;

/// A validation rule, possibly composite.
#[derive(Clone)]
pub struct Schema {
    node: Arc<Node>,
}

struct Node {
    kind: Kind,
    steps: Vec<Step>,
}

#[derive(Clone)]
pub(crate) enum Kind {
    Any,
    Unknown,
    Never,
    Boolean,
    Null,
    Undefined,
    String(StringSchema),
    Number(NumberSchema),
    Date(DateSchema),
    Literal(Value),
    Enum(EnumSchema),
    Object(ObjectSchema),
    Array(ArraySchema),
    Tuple(TupleSchema),
    Record(RecordSchema),
    Union(Vec<Schema>),
    DiscriminatedUnion(DiscriminatedUnion),
    Intersection(Schema, Schema),
    Lazy(LazySchema),
    Promise(Schema),
    Function(FunctionSchema),
    Optional(Schema),
    Nullable(Schema),
    Default(Schema, Value),
}

impl Kind {
    fn name(&self) -> &'static str {
        match self {
            Kind::Any => "any",
            Kind::Unknown => "unknown",
            Kind::Never => "never",
            Kind::Boolean => "boolean",
            Kind::Null => "null",
            Kind::Undefined => "undefined",
            Kind::String(_) => "string",
            Kind::Number(_) => "number",
            Kind::Date(_) => "date",
            Kind::Literal(_) => "literal",
            Kind::Enum(_) => "enum",
            Kind::Object(_) => "object",
            Kind::Array(_) => "array",
            Kind::Tuple(_) => "tuple",
            Kind::Record(_) => "record",
            Kind::Union(_) => "union",
            Kind::DiscriminatedUnion(_) => "discriminated_union",
            Kind::Intersection(..) => "intersection",
            Kind::Lazy(_) => "lazy",
            Kind::Promise(_) => "promise",
            Kind::Function(_) => "function",
            Kind::Optional(_) => "optional",
            Kind::Nullable(_) => "nullable",
            Kind::Default(..) => "default",
        }
    }

    async fn check(&self, value: Value, scope: Scope) -> Outcome {
        match self {
            Kind::Any | Kind::Unknown => Ok(Validation::success(value)),
            Kind::Never => Ok(scope.invalid_type(ParsedType::Never, &value)),
            Kind::Boolean => Ok(match value {
                Value::Bool(_) => Validation::success(value),
                other => scope.invalid_type(ParsedType::Boolean, &other),
            }),
            Kind::Null => Ok(match value {
                Value::Null => Validation::success(value),
                other => scope.invalid_type(ParsedType::Null, &other),
            }),
            Kind::Undefined => Ok(match value {
                Value::Undefined => Validation::success(value),
                other => scope.invalid_type(ParsedType::Undefined, &other),
            }),
            Kind::String(string) => Ok(string.check(value, &scope)),
            Kind::Number(number) => Ok(number.check(value, &scope)),
            Kind::Date(date) => Ok(date.check(value, &scope)),
            Kind::Literal(expected) => Ok(if &value == expected {
                Validation::success(value)
            } else {
                scope.fail(IssueKind::InvalidLiteral {
                    expected: expected.clone(),
                })
            }),
            Kind::Enum(options) => Ok(options.check(value, &scope)),
            Kind::Object(object) => object.check(value, scope).await,
            Kind::Array(array) => array.check(value, scope).await,
            Kind::Tuple(tuple) => tuple.check(value, scope).await,
            Kind::Record(record) => record.check(value, scope).await,
            Kind::Union(members) => union::check(members, value, scope).await,
            Kind::DiscriminatedUnion(union) => union.check(value, scope).await,
            Kind::Intersection(left, right) => {
                intersection::check(left, right, value, scope).await
            }
            Kind::Lazy(lazy) => lazy.resolve().run(value, scope).await,
            Kind::Promise(inner) => promise::check(inner, value, scope).await,
            Kind::Function(function) => Ok(function.check(value, &scope)),
            Kind::Optional(inner) => match value {
                Value::Undefined => Ok(Validation::success(value)),
                other => inner.run(other, scope).await,
            },
            Kind::Nullable(inner) => match value {
                Value::Null => Ok(Validation::success(value)),
                other => inner.run(other, scope).await,
            },
            Kind::Default(inner, fallback) => match value {
                Value::Undefined => inner.run(fallback.clone(), scope).await,
                other => inner.run(other, scope).await,
            },
        }
    }
}

impl Schema {
    pub(crate) fn new(kind: Kind) -> Self {
        Self {
            node: Arc::new(Node {
                kind,
                steps: Vec::new(),
            }),
        }
    }

    pub(crate) fn kind(&self) -> &Kind {
        &self.node.kind
    }

    pub(crate) fn has_steps(&self) -> bool {
        !self.node.steps.is_empty()
    }

    fn with_step(&self, step: Step) -> Self {
        let mut steps = self.node.steps.clone();
        steps.push(step);
        Self {
            node: Arc::new(Node {
                kind: self.node.kind.clone(),
                steps,
            }),
        }
    }

    /// The object builder behind this schema, if it is an object schema.
    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match &self.node.kind {
            Kind::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Returns `true` if this schema accepts a missing value on its own.
    ///
    /// Schemas with refinements or transforms attached report `false`, since
    /// those steps may still reject `Undefined`.
    pub fn is_optional(&self) -> bool {
        if self.has_steps() {
            return false;
        }
        match &self.node.kind {
            Kind::Any | Kind::Unknown | Kind::Undefined | Kind::Optional(_) => true,
            Kind::Default(..) => true,
            Kind::Nullable(inner) => inner.is_optional(),
            _ => false,
        }
    }

    /// Check `input` at `scope`, running preprocess steps, the structural
    /// check and then the remaining steps while the node stays issue-free.
    pub(crate) fn run(&self, input: Value, scope: Scope) -> BoxFuture<'_, Outcome> {
        async move {
            let mut value = input;
            for step in self.node.steps.iter().filter(|s| s.is_preprocess()) {
                match step.apply(value, &scope).await? {
                    Validation::Success(next) => value = next,
                    failure => return Ok(failure),
                }
            }

            let mut checked = self.node.kind.check(value, scope.clone()).await?;
            for step in self.node.steps.iter().filter(|s| !s.is_preprocess()) {
                checked = match checked {
                    Validation::Success(value) => step.apply(value, &scope).await?,
                    failure => return Ok(failure),
                };
            }
            Ok(checked)
        }
        .boxed()
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("kind", &self.node.kind.name())
            .field("steps", &self.node.steps.len())
            .finish()
    }
}

/// Modifiers and parse entry points shared by every schema.
///
/// Implemented for [`Schema`] and for every builder that converts into one.
///
/// # Example
///
/// ```
/// use weir::prelude::*;
///
/// let port = weir::string()
///     .transform(|v, ctx| match v.as_str().map(str::parse::<u16>) {
///         Some(Ok(port)) => Value::from(port as u32),
///         _ => {
///             ctx.add_issue(IssueData::custom("not a port"));
///             v
///         }
///     })
///     .default("8080");
///
/// assert_eq!(port.parse(Value::Undefined).unwrap(), Value::from(8080));
/// assert!(port.parse("http").is_err());
/// ```
pub trait SchemaExt: Into<Schema> + Clone {
    /// Convert into a [`Schema`] handle.
    fn schema(self) -> Schema {
        self.into()
    }

    /// Also accept `Undefined`.
    fn optional(self) -> Schema {
        Schema::new(Kind::Optional(self.into()))
    }

    /// Also accept `Null`.
    fn nullable(self) -> Schema {
        Schema::new(Kind::Nullable(self.into()))
    }

    /// Also accept `Undefined` and `Null`.
    fn nullish(self) -> Schema {
        self.nullable().optional()
    }

    /// Substitute `value` for `Undefined` before validating.
    fn default(self, value: impl Into<Value>) -> Schema {
        Schema::new(Kind::Default(self.into(), value.into()))
    }

    /// Either this schema or `other`, first match wins.
    fn or(self, other: impl Into<Schema>) -> Schema {
        Schema::new(Kind::Union(vec![self.into(), other.into()]))
    }

    /// Both this schema and `other`, results merged.
    fn and(self, other: impl Into<Schema>) -> Schema {
        Schema::new(Kind::Intersection(self.into(), other.into()))
    }

    /// An array of this schema.
    fn array(self) -> ArraySchema {
        ArraySchema::new(self.into())
    }

    /// Add a predicate; `false` reports one `custom` issue described by `params`.
    fn refine<F>(self, check: F, params: impl Into<RefineParams>) -> Schema
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.schema()
            .with_step(Step::Refine(Arc::new(check), params.into()))
    }

    /// Add an asynchronous predicate; only usable with the async entry points.
    fn refine_async<F, Fut>(self, check: F, params: impl Into<RefineParams>) -> Schema
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        let check = Arc::new(move |value: Value| check(value).boxed());
        self.schema().with_step(Step::RefineAsync(check, params.into()))
    }

    /// Add a callback that may report any number of issues.
    fn super_refine<F>(self, f: F) -> Schema
    where
        F: Fn(&Value, &mut RefinementCtx) + Send + Sync + 'static,
    {
        self.schema().with_step(Step::SuperRefine(Arc::new(f)))
    }

    /// Asynchronous [`super_refine`](SchemaExt::super_refine); the callback
    /// hands the context back when done.
    fn super_refine_async<F, Fut>(self, f: F) -> Schema
    where
        F: Fn(Value, RefinementCtx) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = RefinementCtx> + Send + 'static,
    {
        let f = Arc::new(move |value: Value, ctx: RefinementCtx| f(value, ctx).boxed());
        self.schema().with_step(Step::SuperRefineAsync(f))
    }

    /// Rewrite the validated value. Reporting an issue fails the node and
    /// discards the returned value.
    fn transform<F>(self, f: F) -> Schema
    where
        F: Fn(Value, &mut RefinementCtx) -> Value + Send + Sync + 'static,
    {
        self.schema().with_step(Step::Transform(Arc::new(f)))
    }

    /// Asynchronous [`transform`](SchemaExt::transform).
    fn transform_async<F, Fut>(self, f: F) -> Schema
    where
        F: Fn(Value, RefinementCtx) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = (Value, RefinementCtx)> + Send + 'static,
    {
        let f = Arc::new(move |value: Value, ctx: RefinementCtx| f(value, ctx).boxed());
        self.schema().with_step(Step::TransformAsync(f))
    }

    /// Rewrite the raw input before the structural check.
    fn preprocess<F>(self, f: F) -> Schema
    where
        F: Fn(Value, &mut RefinementCtx) -> Value + Send + Sync + 'static,
    {
        self.schema().with_step(Step::Preprocess(Arc::new(f)))
    }

    /// Validate synchronously.
    ///
    /// Fails with [`Error::Invalid`] carrying every issue, or with
    /// [`Error::AsyncInSync`] if an asynchronous step is reached.
    fn parse(&self, input: impl Into<Value>) -> Result<Value, Error> {
        self.parse_with(input, ParseOptions::default())
    }

    /// Validate synchronously with per-call options.
    fn parse_with(&self, input: impl Into<Value>, options: ParseOptions) -> Result<Value, Error> {
        parse::run_sync(&self.clone().into(), input.into(), options)
    }

    /// Validate synchronously without raising on invalid data.
    ///
    /// # Panics
    ///
    /// Panics if the schema needs asynchronous work; use
    /// [`safe_parse_async`](SchemaExt::safe_parse_async) for such schemas.
    fn safe_parse(&self, input: impl Into<Value>) -> Validation<Value, Report> {
        parse::into_validation(self.parse(input))
    }

    /// Validate, awaiting asynchronous steps and promises.
    fn parse_async(&self, input: impl Into<Value>) -> BoxFuture<'static, Result<Value, Error>> {
        let schema: Schema = self.clone().into();
        let input = input.into();
        async move { parse::run_async(&schema, input, ParseOptions::default()).await }.boxed()
    }

    /// Asynchronous [`safe_parse`](SchemaExt::safe_parse).
    fn safe_parse_async(
        &self,
        input: impl Into<Value>,
    ) -> BoxFuture<'static, Validation<Value, Report>> {
        self.parse_async(input).map(parse::into_validation).boxed()
    }

    /// Validate synchronously, then deserialize the JSON form of the result.
    #[cfg(feature = "serde")]
    fn parse_into<T: serde::de::DeserializeOwned>(&self, input: impl Into<Value>) -> Result<T, Error> {
        let value = self.parse(input)?;
        Ok(serde_json::from_value(value.to_json()?)?)
    }
}

impl<T: Into<Schema> + Clone> SchemaExt for T {}

/// A length or count bound shared by strings and arrays.
#[derive(Debug, Clone)]
pub(crate) struct SizeCheck {
    bound: Bound,
    value: usize,
    message: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Bound {
    Min,
    Max,
    Exact,
}

impl SizeCheck {
    pub(crate) fn new(bound: Bound, value: usize) -> Self {
        Self {
            bound,
            value,
            message: None,
        }
    }

    pub(crate) fn set_message(&mut self, message: String) {
        self.message = Some(message);
    }

    pub(crate) fn issue(&self, len: usize, origin: SizeOrigin, scope: &Scope) -> Option<Issue> {
        let bound = self.value as f64;
        let too_small = |exact| IssueKind::TooSmall {
            minimum: bound,
            inclusive: true,
            exact,
            origin,
        };
        let too_big = |exact| IssueKind::TooBig {
            maximum: bound,
            inclusive: true,
            exact,
            origin,
        };
        let kind = match self.bound {
            Bound::Min if len < self.value => too_small(false),
            Bound::Max if len > self.value => too_big(false),
            Bound::Exact if len < self.value => too_small(true),
            Bound::Exact if len > self.value => too_big(true),
            _ => return None,
        };
        Some(scope.issue(kind, self.message.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::{IssueCode, PathSegment};
    use crate::parse::Mode;
    use crate::{boolean, literal, never, null, number, string, undefined, unknown};
    use serde_json::json;

    #[test]
    fn test_simple_kinds() {
        assert!(boolean().parse(true).is_ok());
        assert!(null().parse(Value::Null).is_ok());
        assert!(undefined().parse(Value::Undefined).is_ok());
        assert!(unknown().parse(json!({ "x": 1 })).is_ok());
        let err = never().parse(1).unwrap_err().into_report().unwrap();
        assert_eq!(err.issues().head().message(), "Expected never, received number");
    }

    #[test]
    fn test_literal_is_strict_equality() {
        let schema = literal("a");
        assert_eq!(schema.parse("a").unwrap(), Value::from("a"));
        let report = schema.parse("b").unwrap_err().into_report().unwrap();
        assert_eq!(report.codes(), vec![IssueCode::InvalidLiteral]);
        assert_eq!(
            report.issues().head().message(),
            "Invalid literal value, expected \"a\""
        );
    }

    #[test]
    fn test_modifiers_return_new_handles() {
        let base = string();
        let optional = base.clone().optional();
        assert!(optional.parse(Value::Undefined).is_ok());
        assert!(base.parse(Value::Undefined).is_err());
    }

    #[test]
    fn test_nullish_and_default() {
        let schema = number().nullish();
        assert!(schema.parse(Value::Null).is_ok());
        assert!(schema.parse(Value::Undefined).is_ok());

        let schema = number().default(3);
        assert_eq!(schema.parse(Value::Undefined).unwrap(), Value::from(3));
        assert_eq!(schema.parse(5).unwrap(), Value::from(5));
    }

    #[test]
    fn test_preprocess_runs_before_structural_check() {
        let schema = number().preprocess(|v, _| match v.as_str().map(str::parse::<f64>) {
            Some(Ok(n)) => Value::from(n),
            _ => v,
        });
        assert_eq!(schema.parse("12").unwrap(), Value::from(12));
        assert!(schema.parse("twelve").is_err());
    }

    #[test]
    fn test_failed_refinement_stops_later_steps() {
        let schema = number()
            .refine(|v| v.as_f64() != Some(0.0), "zero")
            .refine(|_| false, "second");
        let report = schema.parse(0).unwrap_err().into_report().unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.issues().head().message(), "zero");
    }

    #[test]
    fn test_refinements_skip_structurally_invalid_values() {
        let schema = string().refine(|_| panic!("must not run"), "never");
        assert!(schema.parse(1).is_err());
    }

    #[test]
    fn test_run_uses_scope_path() {
        let scope = Scope::new(Mode::Sync, vec![PathSegment::from("root")]);
        let checked = Schema::from(string())
            .run(Value::from(1), scope).now_or_never().unwrap().unwrap();
        assert_eq!(
            checked.errors().unwrap().head().path(),
            &[PathSegment::from("root")]
        );
    }

    #[test]
    fn test_size_check() {
        let scope = Scope::new(Mode::Sync, vec![]);
        let exact = SizeCheck::new(Bound::Exact, 2);
        assert!(exact.issue(2, SizeOrigin::Array, &scope).is_none());
        assert_eq!(
            exact.issue(3, SizeOrigin::Array, &scope).unwrap().message(),
            "Array must contain exactly 2 element(s)"
        );
    }

    #[test]
    fn test_is_optional_covers_wrappers() {
        assert!(string().optional().is_optional());
        assert!(string().nullish().is_optional());
        assert!(string().optional().nullable().is_optional());
        assert!(number().default(1).is_optional());
        assert!(undefined().is_optional());
        assert!(unknown().is_optional());

        assert!(!Schema::from(string()).is_optional());
        assert!(!string().nullable().is_optional());
        assert!(!string()
            .optional()
            .refine(|v| !v.is_undefined(), "required")
            .is_optional());
    }

    #[test]
    fn test_debug_names_kind() {
        let schema = string().optional();
        assert_eq!(format!("{:?}", schema), "Schema { kind: \"optional\", steps: 0 }");
    }
}
