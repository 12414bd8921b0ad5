use futures::future::join;

use crate::issue::IssueKind;
use crate::parse::{Mode, Scope};
use crate::runner::{Collected, Outcome};
use crate::schema::Schema;
use crate::value::{Object, Value};

/// Check `value` against both sides and merge the two results.
pub(crate) async fn check(left: &Schema, right: &Schema, value: Value, scope: Scope) -> Outcome {
    let (left, right) = match scope.mode {
        Mode::Sync => (
            left.run(value.clone(), scope.clone()).await?,
            right.run(value, scope.clone()).await?,
        ),
        Mode::Async => {
            let (left, right) = join(
                left.run(value.clone(), scope.clone()),
                right.run(value, scope.clone()),
            )
            .await;
            (left?, right?)
        }
    };

    let mut collected = Collected::default();
    let (left, right) = (collected.take(left), collected.take(right));
    match (left, right) {
        (Some(left), Some(right)) => match merge_values(left, right) {
            Some(merged) => Ok(collected.finish(merged)),
            None => Ok(scope.fail(IssueKind::InvalidIntersectionTypes)),
        },
        _ => Ok(collected.finish(Value::Undefined)),
    }
}

/// Merge two parsed values: equal values are kept, objects are merged key by
/// key and arrays of equal length element by element.
pub(crate) fn merge_values(left: Value, right: Value) -> Option<Value> {
    match (left, right) {
        (left, right) if left == right => Some(left),
        (Value::Object(left), Value::Object(mut right)) => {
            let mut merged = Object::with_capacity(left.len() + right.len());
            for (key, value) in left {
                let value = match right.shift_remove(&key) {
                    Some(other) => merge_values(value, other)?,
                    None => value,
                };
                merged.insert(key, value);
            }
            merged.extend(right);
            Some(Value::Object(merged))
        }
        (Value::Array(left), Value::Array(right)) if left.len() == right.len() => left
            .into_iter()
            .zip(right)
            .map(|(l, r)| merge_values(l, r))
            .collect::<Option<Vec<_>>>()
            .map(Value::Array),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::IssueCode;
    use crate::{intersection, number, object, string, SchemaExt};
    use serde_json::json;

    #[test]
    fn test_merges_object_results() {
        let person = object().field("name", string()).strip();
        let employee = object().field("role", string()).strip();
        let schema = intersection(person, employee);
        assert_eq!(
            schema.parse(json!({ "name": "Ada", "role": "eng" })).unwrap(),
            Value::from(json!({ "name": "Ada", "role": "eng" }))
        );
    }

    #[test]
    fn test_collects_both_sides() {
        let schema = string().min(5).and(string().email());
        let report = schema.parse("ab").unwrap_err().into_report().unwrap();
        assert_eq!(report.codes(), vec![IssueCode::TooSmall, IssueCode::InvalidString]);
    }

    #[test]
    fn test_conflicting_results() {
        let schema = string()
            .transform(|_, _| Value::from("a"))
            .and(string().transform(|_, _| Value::from("b")));
        let report = schema.parse("x").unwrap_err().into_report().unwrap();
        assert_eq!(report.codes(), vec![IssueCode::InvalidIntersectionTypes]);
    }

    #[test]
    fn test_merge_values() {
        let merged = merge_values(
            Value::from(json!({ "a": 1, "n": { "x": 1 } })),
            Value::from(json!({ "b": 2, "n": { "y": 2 } })),
        );
        assert_eq!(
            merged,
            Some(Value::from(json!({ "a": 1, "n": { "x": 1, "y": 2 }, "b": 2 })))
        );
        assert_eq!(
            merge_values(Value::from(json!([1, 2])), Value::from(json!([1]))),
            None
        );
        assert_eq!(merge_values(Value::from(1), Value::from(1)), Some(Value::from(1)));
        assert!(number().and(number()).parse(2).is_ok());
    }
}
