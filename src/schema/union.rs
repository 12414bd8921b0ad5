use indexmap::IndexMap;
use tracing::trace;

use crate::error::{Report, SchemaError};
use crate::issue::{IssueKind, ParsedType};
use crate::parse::Scope;
use crate::runner::Outcome;
use crate::schema::{Kind, Schema};
use crate::validation::Validation;
use crate::value::Value;

/// Try `members` in order and keep the first success.
///
/// Members run one at a time in both modes; later members are never started
/// once one passes.
pub(crate) async fn check(members: &[Schema], value: Value, scope: Scope) -> Outcome {
    let mut failures = Vec::with_capacity(members.len());
    for member in members {
        match member.run(value.clone(), scope.clone()).await? {
            Validation::Success(parsed) => return Ok(Validation::Success(parsed)),
            Validation::Failure(issues) => failures.push(Report::new(issues)),
        }
    }
    trace!(members = members.len(), "no union member matched");
    Ok(scope.fail(IssueKind::InvalidUnion {
        union_errors: failures,
    }))
}

/// Union of object schemas selected by the value of one field.
#[derive(Debug, Clone)]
pub(crate) struct DiscriminatedUnion {
    discriminator: String,
    options: Vec<Value>,
    members: IndexMap<String, Schema>,
}

impl DiscriminatedUnion {
    pub(crate) fn new(
        discriminator: impl Into<String>,
        members: impl IntoIterator<Item = Schema>,
    ) -> Result<Self, SchemaError> {
        let discriminator = discriminator.into();
        let mut options = Vec::new();
        let mut lookup = IndexMap::new();
        for (index, member) in members.into_iter().enumerate() {
            let object = member.as_object().ok_or(SchemaError::NotAnObject { index })?;
            let missing = || SchemaError::MissingDiscriminator {
                index,
                discriminator: discriminator.clone(),
            };
            let values: Vec<Value> = match object.get(&discriminator).map(Schema::kind) {
                Some(Kind::Literal(value)) => vec![value.clone()],
                Some(Kind::Enum(options)) => {
                    options.options().iter().cloned().map(Value::String).collect()
                }
                _ => return Err(missing()),
            };
            for value in values {
                let key = value.to_string();
                if lookup.insert(key.clone(), member.clone()).is_some() {
                    return Err(SchemaError::DuplicateDiscriminator { value: key });
                }
                options.push(value);
            }
        }
        Ok(Self {
            discriminator,
            options,
            members: lookup,
        })
    }

    pub(crate) async fn check(&self, value: Value, scope: Scope) -> Outcome {
        let member = match &value {
            Value::Object(fields) => fields
                .get(&self.discriminator)
                .and_then(|tag| self.members.get(&tag.to_string())),
            other => return Ok(scope.invalid_type(ParsedType::Object, other)),
        };
        match member {
            Some(member) => member.run(value, scope).await,
            None => Ok(scope
                .child(self.discriminator.as_str())
                .fail(IssueKind::InvalidUnionDiscriminator {
                    options: self.options.clone(),
                })),
        }
    }
}

impl From<DiscriminatedUnion> for Schema {
    fn from(union: DiscriminatedUnion) -> Self {
        Schema::new(Kind::DiscriminatedUnion(union))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::{IssueCode, PathSegment};
    use crate::{discriminated_union, enumeration, literal, number, object, string, union, SchemaExt};
    use serde_json::json;

    fn shapes() -> Schema {
        discriminated_union(
            "kind",
            [
                object()
                    .field("kind", literal("circle"))
                    .field("radius", number())
                    .schema(),
                object()
                    .field("kind", enumeration(["square", "box"]))
                    .field("side", number())
                    .schema(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_first_match_wins() {
        let schema = union([
            string().transform(|_, _| Value::from("first")),
            string().transform(|_, _| Value::from("second")),
        ]);
        assert_eq!(schema.parse("x").unwrap(), Value::from("first"));
    }

    #[test]
    fn test_all_fail_keeps_member_reports() {
        let report = string().or(number()).parse(true).unwrap_err().into_report().unwrap();
        assert_eq!(report.codes(), vec![IssueCode::InvalidUnion]);
        match report.issues().head().kind() {
            IssueKind::InvalidUnion { union_errors } => assert_eq!(union_errors.len(), 2),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_discriminated_selects_member() {
        assert!(shapes().parse(json!({ "kind": "box", "side": 2 })).is_ok());
        let report = shapes()
            .parse(json!({ "kind": "circle", "side": 2 }))
            .unwrap_err()
            .into_report()
            .unwrap();
        assert_eq!(report.codes(), vec![IssueCode::InvalidType, IssueCode::UnrecognizedKeys]);
    }

    #[test]
    fn test_discriminated_unknown_tag() {
        let report = shapes()
            .parse(json!({ "kind": "hexagon" }))
            .unwrap_err()
            .into_report()
            .unwrap();
        let issue = report.issues().head();
        assert_eq!(issue.path(), &[PathSegment::from("kind")]);
        assert_eq!(
            issue.message(),
            "Invalid discriminator value. Expected 'circle' | 'square' | 'box'"
        );
    }

    #[test]
    fn test_discriminated_construction_errors() {
        let not_object = discriminated_union("kind", [string().schema()]);
        assert_eq!(not_object.unwrap_err(), SchemaError::NotAnObject { index: 0 });

        let missing = discriminated_union("kind", [object().field("id", number()).schema()]);
        assert!(matches!(
            missing.unwrap_err(),
            SchemaError::MissingDiscriminator { index: 0, .. }
        ));

        let duplicate = discriminated_union(
            "kind",
            [
                object().field("kind", literal("a")).schema(),
                object().field("kind", literal("a")).schema(),
            ],
        );
        assert!(matches!(
            duplicate.unwrap_err(),
            SchemaError::DuplicateDiscriminator { .. }
        ));
    }
}
