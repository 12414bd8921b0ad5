use crate::issue::ParsedType;
use crate::parse::Scope;
use crate::runner::{check_all, Collected, Outcome};
use crate::schema::{Kind, Schema};
use crate::value::{Object, Value};

/// Schema for string-keyed maps with uniform values.
///
/// Values are checked at their key's path. With a key schema, each key is
/// checked too, as a string value at the same path; a key rewritten by its
/// schema is renamed in the output.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use weir::prelude::*;
///
/// let scores = weir::record_with_keys(weir::string().min(2), weir::number().int());
/// let report = scores.safe_parse(json!({ "ann": 3, "b": 1.5 })).into_result().unwrap_err();
/// assert_eq!(report.len(), 2);
/// assert!(report.issues().iter().all(|i| i.path() == [PathSegment::from("b")]));
/// ```
#[derive(Debug, Clone)]
pub struct RecordSchema {
    key: Option<Schema>,
    value: Schema,
}

impl RecordSchema {
    pub(crate) fn new(key: Option<Schema>, value: Schema) -> Self {
        Self { key, value }
    }

    /// The value schema.
    pub fn value_schema(&self) -> &Schema {
        &self.value
    }

    pub(crate) async fn check(&self, value: Value, scope: Scope) -> Outcome {
        let entries = match value {
            Value::Object(map) => map,
            other => return Ok(scope.invalid_type(ParsedType::Object, &other)),
        };

        let mut checks = Vec::with_capacity(entries.len() * 2);
        let mut keys = Vec::with_capacity(entries.len());
        for (key, item) in entries {
            let at = scope.child(key.as_str());
            if let Some(key_schema) = &self.key {
                checks.push(key_schema.run(Value::String(key.clone()), at.clone()));
            }
            checks.push(self.value.run(item, at));
            keys.push(key);
        }

        let mut results = check_all(scope.mode, checks).await?.into_iter();
        let mut collected = Collected::default();
        let mut output = Object::with_capacity(keys.len());
        for key in keys {
            let key = match &self.key {
                Some(_) => results.next().and_then(|checked| collected.take(checked)),
                None => Some(Value::String(key)),
            };
            let item = results.next().and_then(|checked| collected.take(checked));
            if let (Some(key), Some(item)) = (key, item) {
                let key = match key {
                    Value::String(text) => text,
                    other => other.to_string(),
                };
                output.insert(key, item);
            }
        }
        Ok(collected.finish(Value::Object(output)))
    }
}

impl From<RecordSchema> for Schema {
    fn from(schema: RecordSchema) -> Self {
        Schema::new(Kind::Record(schema))
    }
}
