use indexmap::IndexMap;
use tracing::trace;

use crate::issue::{IssueKind, ParsedType};
use crate::parse::Scope;
use crate::runner::{check_all, Collected, Outcome};
use crate::schema::{EnumSchema, Kind, Schema};
use crate::value::{Object, Value};

/// What an object schema does with keys outside its shape.
#[derive(Debug, Clone, Default)]
pub enum UnknownKeys {
    /// Report them in one `unrecognized_keys` issue
    #[default]
    Strict,
    /// Drop them from the output
    Strip,
    /// Copy them to the output unchecked
    Passthrough,
    /// Validate each against a schema and keep them
    Catchall(Schema),
}

/// Schema for records with a known set of fields.
///
/// Fields are checked in shape order against the input value, or against
/// `Undefined` when the key is missing. Keys that were missing and parse to
/// `Undefined` stay missing in the output. Every shape combinator returns a
/// new schema.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use weir::prelude::*;
///
/// let staff = weir::object()
///     .field("name", weir::string())
///     .field("subjects", weir::string().array());
///
/// let report = staff
///     .safe_parse(json!({ "name": "Ms. Frizzle", "subjects": ["science", 1], "bus": true }))
///     .into_result()
///     .unwrap_err();
/// assert_eq!(report.codes(), vec![IssueCode::InvalidType, IssueCode::UnrecognizedKeys]);
///
/// let loose = staff.clone().strip();
/// assert_eq!(
///     loose.parse(json!({ "name": "Ms. Frizzle", "subjects": [], "bus": true })).unwrap(),
///     Value::from(json!({ "name": "Ms. Frizzle", "subjects": [] }))
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    shape: IndexMap<String, Schema>,
    unknown: UnknownKeys,
}

impl ObjectSchema {
    pub(crate) fn new() -> Self {
        Self {
            shape: IndexMap::new(),
            unknown: UnknownKeys::default(),
        }
    }

    /// Add or replace a field.
    pub fn field(mut self, key: impl Into<String>, schema: impl Into<Schema>) -> Self {
        self.shape.insert(key.into(), schema.into());
        self
    }

    /// The fields, in declaration order.
    pub fn shape(&self) -> &IndexMap<String, Schema> {
        &self.shape
    }

    /// The schema of one field.
    pub fn get(&self, key: &str) -> Option<&Schema> {
        self.shape.get(key)
    }

    /// The unknown-key policy.
    pub fn unknown_keys(&self) -> &UnknownKeys {
        &self.unknown
    }

    /// Add the fields of `other`, replacing fields with the same key in place.
    /// This schema's unknown-key policy is kept.
    pub fn extend(mut self, other: ObjectSchema) -> Self {
        self.shape.extend(other.shape);
        self
    }

    /// Like [`extend`](ObjectSchema::extend), but the result takes `other`'s
    /// unknown-key policy.
    pub fn merge(mut self, other: ObjectSchema) -> Self {
        self.shape.extend(other.shape);
        self.unknown = other.unknown;
        self
    }

    /// Keep only the named fields. Unknown names are ignored.
    pub fn pick<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> Self {
        let keys: Vec<&str> = keys.into_iter().collect();
        self.retain(|key| keys.contains(&key))
    }

    /// Drop the named fields. Unknown names are ignored.
    pub fn omit<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> Self {
        let keys: Vec<&str> = keys.into_iter().collect();
        self.retain(|key| !keys.contains(&key))
    }

    fn retain(&self, keep: impl Fn(&str) -> bool) -> Self {
        Self {
            shape: self
                .shape
                .iter()
                .filter(|(key, _)| keep(key.as_str()))
                .map(|(key, schema)| (key.clone(), schema.clone()))
                .collect(),
            unknown: self.unknown.clone(),
        }
    }

    fn map_fields(&self, f: impl Fn(&str, &Schema) -> Schema) -> Self {
        Self {
            shape: self
                .shape
                .iter()
                .map(|(key, schema)| (key.clone(), f(key, schema)))
                .collect(),
            unknown: self.unknown.clone(),
        }
    }

    /// Make every field optional.
    pub fn partial(&self) -> Self {
        self.map_fields(|_, schema| optional(schema))
    }

    /// Make the named fields optional.
    pub fn partial_fields<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> Self {
        let keys: Vec<&str> = keys.into_iter().collect();
        self.map_fields(|key, schema| {
            if keys.contains(&key) {
                optional(schema)
            } else {
                schema.clone()
            }
        })
    }

    /// Make every field required, unwrapping optional fields.
    pub fn required(&self) -> Self {
        self.map_fields(|_, schema| {
            let mut schema = schema.clone();
            while let (Kind::Optional(inner), false) = (schema.kind(), schema.has_steps()) {
                schema = inner.clone();
            }
            schema
        })
    }

    /// Make every field optional, recursing through nested objects, arrays,
    /// tuples and optional or nullable wrappers.
    ///
    /// Schemas with refinements or transforms attached are kept as they are
    /// below the top level.
    ///
    /// # Example
    ///
    /// ```
    /// use serde_json::json;
    /// use weir::prelude::*;
    ///
    /// let user = weir::object()
    ///     .field("username", weir::string())
    ///     .field(
    ///         "location",
    ///         weir::object()
    ///             .field("latitude", weir::number())
    ///             .field("longitude", weir::number()),
    ///     )
    ///     .deep_partial();
    ///
    /// assert!(user.parse(json!({})).is_ok());
    /// assert!(user.parse(json!({ "location": { "latitude": 1 } })).is_ok());
    /// ```
    pub fn deep_partial(&self) -> Self {
        self.map_fields(|_, schema| optional(&deep_partial(schema)))
    }

    /// An enum of the field names.
    pub fn keyof(&self) -> EnumSchema {
        EnumSchema::new(self.shape.keys().cloned())
    }

    /// Report unknown keys. This is the default.
    pub fn strict(mut self) -> Self {
        self.unknown = UnknownKeys::Strict;
        self
    }

    /// Drop unknown keys.
    pub fn strip(mut self) -> Self {
        self.unknown = UnknownKeys::Strip;
        self
    }

    /// Keep unknown keys unchecked.
    pub fn passthrough(mut self) -> Self {
        self.unknown = UnknownKeys::Passthrough;
        self
    }

    /// Validate unknown keys against `schema`.
    pub fn catchall(mut self, schema: impl Into<Schema>) -> Self {
        self.unknown = UnknownKeys::Catchall(schema.into());
        self
    }

    pub(crate) async fn check(&self, value: Value, scope: Scope) -> Outcome {
        let mut input = match value {
            Value::Object(map) => map,
            other => return Ok(scope.invalid_type(ParsedType::Object, &other)),
        };

        let mut present = Vec::with_capacity(self.shape.len());
        let mut checks = Vec::with_capacity(input.len().max(self.shape.len()));
        for (key, schema) in &self.shape {
            let field = input.shift_remove(key);
            present.push(field.is_some());
            checks.push(schema.run(field.unwrap_or_default(), scope.child(key.as_str())));
        }
        let extras = input;
        if let UnknownKeys::Catchall(schema) = &self.unknown {
            for (key, value) in &extras {
                checks.push(schema.run(value.clone(), scope.child(key.as_str())));
            }
        }

        let mut results = check_all(scope.mode, checks).await?;
        let extra_results = results.split_off(self.shape.len());

        let mut collected = Collected::default();
        let mut output = Object::with_capacity(self.shape.len());
        for ((key, was_present), checked) in self.shape.keys().zip(present).zip(results) {
            if let Some(parsed) = collected.take(checked) {
                if was_present || !parsed.is_undefined() {
                    output.insert(key.clone(), parsed);
                }
            }
        }

        match &self.unknown {
            UnknownKeys::Strict if !extras.is_empty() => {
                let keys: Vec<String> = extras.into_keys().collect();
                trace!(?keys, "unrecognized keys");
                collected.push(scope.issue(IssueKind::UnrecognizedKeys { keys }, None));
            }
            UnknownKeys::Strict | UnknownKeys::Strip => {}
            UnknownKeys::Passthrough => output.extend(extras),
            UnknownKeys::Catchall(_) => {
                for (key, checked) in extras.into_keys().zip(extra_results) {
                    if let Some(parsed) = collected.take(checked) {
                        output.insert(key, parsed);
                    }
                }
            }
        }
        Ok(collected.finish(Value::Object(output)))
    }
}

impl From<ObjectSchema> for Schema {
    fn from(schema: ObjectSchema) -> Self {
        Schema::new(Kind::Object(schema))
    }
}

fn optional(schema: &Schema) -> Schema {
    if schema.is_optional() {
        schema.clone()
    } else {
        Schema::new(Kind::Optional(schema.clone()))
    }
}

fn deep_partial(schema: &Schema) -> Schema {
    if schema.has_steps() {
        return schema.clone();
    }
    match schema.kind() {
        Kind::Object(object) => object.deep_partial().into(),
        Kind::Array(array) => array.map_element(deep_partial).into(),
        Kind::Tuple(tuple) => tuple.map_items(deep_partial).into(),
        Kind::Optional(inner) => Schema::new(Kind::Optional(deep_partial(inner))),
        Kind::Nullable(inner) => Schema::new(Kind::Nullable(deep_partial(inner))),
        _ => schema.clone(),
    }
}
