//! Dynamic values checked by schemas
//!
//! Schemas validate input whose shape is not known at compile time. [`Value`] is
//! that input: a JSON-like tree extended with the things a dynamic runtime can
//! hand over besides plain data, namely an explicit `Undefined`, date instants,
//! promises and callables.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use weir::Value;
//!
//! let value = Value::from(json!({ "name": "Ada", "tags": ["math"] }));
//! assert_eq!(value.get("name").and_then(Value::as_str), Some("Ada"));
//! assert!(value.get("missing").is_none());
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use indexmap::IndexMap;

use crate::error::{Error, Report};
use crate::issue::ParsedType;

/// Ordered key-value record held by [`Value::Object`].
pub type Object = IndexMap<String, Value>;

/// A dynamically typed value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// The absence of a value, as seen for a missing object key
    #[default]
    Undefined,
    /// An explicit null
    Null,
    /// A boolean
    Bool(bool),
    /// A double-precision number
    Number(f64),
    /// A string
    String(String),
    /// A valid date instant
    Date(DateTime<Utc>),
    /// An ordered sequence
    Array(Vec<Value>),
    /// An ordered key-value record
    Object(Object),
    /// A value that resolves later
    Promise(Promise),
    /// A callable
    Function(Function),
}

impl Value {
    /// Build an object value from key-value pairs.
    ///
    /// ```
    /// use weir::Value;
    ///
    /// let v = Value::object([("id", Value::from("a1")), ("count", Value::from(2))]);
    /// assert_eq!(v.get("count"), Some(&Value::Number(2.0)));
    /// ```
    pub fn object<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Classify this value the way issues report it.
    pub fn parsed_type(&self) -> ParsedType {
        match self {
            Value::Undefined => ParsedType::Undefined,
            Value::Null => ParsedType::Null,
            Value::Bool(_) => ParsedType::Boolean,
            Value::Number(n) if n.is_nan() => ParsedType::Nan,
            Value::Number(_) => ParsedType::Number,
            Value::String(_) => ParsedType::String,
            Value::Date(_) => ParsedType::Date,
            Value::Array(_) => ParsedType::Array,
            Value::Object(_) => ParsedType::Object,
            Value::Promise(_) => ParsedType::Promise,
            Value::Function(_) => ParsedType::Function,
        }
    }

    /// Returns `true` for [`Value::Undefined`].
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The string slice, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The number, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The boolean, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The date instant, if this is a date.
    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::Date(d) => Some(d),
            _ => None,
        }
    }

    /// The elements, if this is an array.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The record, if this is an object.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// The promise handle, if this is a promise.
    pub fn as_promise(&self) -> Option<&Promise> {
        match self {
            Value::Promise(p) => Some(p),
            _ => None,
        }
    }

    /// The callable, if this is a function.
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Look up a member of an object value.
    ///
    /// Returns `None` for non-objects and for absent keys.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Convert into a JSON value.
    ///
    /// Dates become RFC 3339 strings, `Undefined` object members are dropped and
    /// `Undefined` array items become `null`. Promises and functions have no JSON
    /// form and produce [`Error::NotJson`].
    pub fn to_json(&self) -> Result<serde_json::Value, Error> {
        Ok(match self {
            Value::Undefined | Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Date(d) => serde_json::Value::String(d.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Value::Array(items) => serde_json::Value::Array(
                items.iter().map(Value::to_json).collect::<Result<_, _>>()?,
            ),
            Value::Object(map) => {
                let mut out = serde_json::Map::new();
                for (key, value) in map {
                    if !value.is_undefined() {
                        out.insert(key.clone(), value.to_json()?);
                    }
                }
                serde_json::Value::Object(out)
            }
            Value::Promise(_) | Value::Function(_) => {
                return Err(Error::NotJson {
                    found: self.parsed_type(),
                })
            }
        })
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Promise(a), Value::Promise(b)) => a.ptr_eq(b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    match serde_json::to_string(s) {
        Ok(quoted) => f.write_str(&quoted),
        Err(_) => write!(f, "\"{}\"", s),
    }
}

/// JSON-like rendering used in issue messages.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write_quoted(f, s),
            Value::Date(d) => write_quoted(f, &d.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Object(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write_quoted(f, key)?;
                    write!(f, ":{}", value)?;
                }
                f.write_str("}")
            }
            Value::Promise(_) => f.write_str("[promise]"),
            Value::Function(_) => f.write_str("[function]"),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),+) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Number(n as f64)
                }
            }
        )+
    };
}

impl_from_integer!(i32, i64, u32, u64, usize);

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d)
    }
}

impl From<Object> for Value {
    fn from(map: Object) -> Self {
        Value::Object(map)
    }
}

impl From<Promise> for Value {
    fn from(p: Promise) -> Self {
        Value::Promise(p)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

/// A shared handle to a value that settles later.
///
/// Cloning the handle does not duplicate the underlying work: every clone observes
/// the same settlement. A rejection carries a [`Report`].
///
/// # Example
///
/// ```
/// use weir::{Promise, Value};
///
/// # tokio_test::block_on(async {
/// let p = Promise::new(async { Value::from(7) });
/// assert_eq!(p.settle().await.ok(), Some(Value::from(7)));
/// # });
/// ```
#[derive(Clone)]
pub struct Promise {
    inner: Shared<BoxFuture<'static, Result<Value, Report>>>,
}

impl Promise {
    /// Wrap a future that always resolves.
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Value> + Send + 'static,
    {
        Self::from_future(future.map(Ok))
    }

    /// Wrap a future that may reject.
    pub fn from_future<F>(future: F) -> Self
    where
        F: Future<Output = Result<Value, Report>> + Send + 'static,
    {
        Self {
            inner: future.boxed().shared(),
        }
    }

    /// A promise already resolved with `value`.
    pub fn resolved(value: impl Into<Value>) -> Self {
        let value = value.into();
        Self::from_future(async move { Ok(value) })
    }

    /// A promise already rejected with `report`.
    pub fn rejected(report: Report) -> Self {
        Self::from_future(async move { Err(report) })
    }

    /// Wait for the promise to settle.
    pub async fn settle(&self) -> Result<Value, Report> {
        self.inner.clone().await
    }

    /// Returns `true` if both handles point at the same promise.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Shared::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Promise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Promise(..)")
    }
}

type Callable = dyn Fn(Vec<Value>) -> Result<Value, Error> + Send + Sync;

/// A shared handle to a callable taking positional arguments.
///
/// # Example
///
/// ```
/// use weir::{Function, Value};
///
/// let add = Function::new(|args| {
///     let sum: f64 = args.iter().filter_map(Value::as_f64).sum();
///     Value::from(sum)
/// });
/// assert_eq!(add.call(vec![1.into(), 2.into()]).ok(), Some(Value::from(3)));
/// ```
#[derive(Clone)]
pub struct Function {
    inner: Arc<Callable>,
}

impl Function {
    /// Wrap an infallible callable.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Vec<Value>) -> Value + Send + Sync + 'static,
    {
        Self::fallible(move |args| Ok(f(args)))
    }

    /// Wrap a callable that may fail.
    pub fn fallible<F>(f: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Value, Error> + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Invoke the callable.
    pub fn call(&self, args: Vec<Value>) -> Result<Value, Error> {
        (self.inner)(args)
    }

    /// Returns `true` if both handles point at the same callable.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Function(..)")
    }
}
