//! Serde support for values and reports (feature-gated)
//!
//! Values serialize the way [`Value::to_json`] converts them: `Undefined`
//! object members are skipped, dates become RFC 3339 strings, and promises
//! or functions are an error. A [`Report`] serializes as `{"issues": [...]}`
//! with each issue carrying its `code`, context fields, `path` and `message`.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use weir::prelude::*;
//!
//! let report = weir::string().safe_parse(1).into_result().unwrap_err();
//! assert_eq!(
//!     serde_json::to_value(&report).unwrap(),
//!     json!({ "issues": [{
//!         "code": "invalid_type",
//!         "expected": "string",
//!         "received": "number",
//!         "path": [],
//!         "message": "Expected string, received number"
//!     }] })
//! );
//! ```

use chrono::SecondsFormat;
use serde::ser::{Error as _, SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::error::Report;
use crate::value::Value;

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Undefined | Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
                    serializer.serialize_i64(*n as i64)
                } else {
                    serializer.serialize_f64(*n)
                }
            }
            Value::String(s) => serializer.serialize_str(s),
            Value::Date(d) => {
                serializer.serialize_str(&d.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Value::Array(items) => serializer.collect_seq(items),
            Value::Object(fields) => {
                let present = fields.iter().filter(|(_, v)| !v.is_undefined());
                let mut map = serializer.serialize_map(None)?;
                for (key, value) in present {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            other => Err(S::Error::custom(format!(
                "{} values have no JSON representation",
                other.parsed_type()
            ))),
        }
    }
}

impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let issues: Vec<_> = self.issues().iter().collect();
        let mut state = serializer.serialize_struct("Report", 1)?;
        state.serialize_field("issues", &issues)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Function, Promise};
    use crate::{object, number, SchemaExt};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_value_serializes_like_json() {
        let value = Value::object([
            ("n", Value::from(1)),
            ("f", Value::from(1.5)),
            ("gone", Value::Undefined),
            ("at", Value::from(Utc.with_ymd_and_hms(2022, 1, 12, 0, 0, 0).unwrap())),
            ("list", Value::from(vec![Value::Null, Value::from(true)])),
        ]);
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!({ "n": 1, "f": 1.5, "at": "2022-01-12T00:00:00.000Z", "list": [null, true] })
        );
    }

    #[test]
    fn test_callables_do_not_serialize() {
        assert!(serde_json::to_value(Value::from(Promise::resolved(1))).is_err());
        assert!(serde_json::to_value(Value::from(Function::new(|_| Value::Null))).is_err());
    }

    #[test]
    fn test_report_paths_and_bounds() {
        let report = object()
            .field("age", number().min(18.0))
            .safe_parse(json!({ "age": 3 }))
            .into_result()
            .unwrap_err();
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({ "issues": [{
                "code": "too_small",
                "minimum": 18.0,
                "inclusive": true,
                "exact": false,
                "origin": "number",
                "path": ["age"],
                "message": "Number must be greater than or equal to 18"
            }] })
        );
    }
}
