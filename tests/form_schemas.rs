//! Integration tests for a realistic set of form, record and recursive schemas

use serde_json::json;
use weir::prelude::*;
use weir::{assert_failure, assert_issues, assert_success};

fn has(value: &Value, test: impl Fn(char) -> bool) -> bool {
    value.as_str().is_some_and(|s| s.chars().any(test))
}

fn password() -> Schema {
    weir::string()
        .min(8)
        .max(16)
        .refine(
            |v| has(v, |c| c.is_ascii_lowercase()) && has(v, |c| c.is_ascii_uppercase()),
            "password must include capital letter and small letter.",
        )
        .refine(
            |v| has(v, |c| c.is_ascii_digit()) && has(v, |c| c.is_ascii_alphabetic()),
            "password must include alphanumeric.",
        )
        .refine(
            |v| has(v, |c| c.is_ascii_punctuation()),
            "password must include special character.",
        )
}

fn login() -> ObjectSchema {
    weir::object()
        .field("email", weir::string().email())
        .field("password", password())
}

fn change_password() -> Schema {
    weir::object()
        .field("oldPassword", weir::string().nonempty())
        .field("newPassword", password())
        .field("confirmationPassword", password())
        .refine(
            |v| match (v.get("newPassword"), v.get("confirmationPassword")) {
                (_, None) => true,
                (new, confirmation) => new == confirmation,
            },
            RefineParams::new()
                .path(["confirmationPassword"])
                .message("confirmationPassword does not match."),
        )
}

fn instructor() -> ObjectSchema {
    weir::object()
        .field("students", weir::string().array())
        .merge(weir::object().field("id", weir::string()))
}

fn user() -> ObjectSchema {
    weir::object()
        .field("username", weir::string())
        .field(
            "location",
            weir::object()
                .field("latitude", weir::number())
                .field("longitude", weir::number()),
        )
        .field(
            "strings",
            weir::object().field("value", weir::string()).array(),
        )
}

fn json_schema() -> Schema {
    let literal = weir::union([
        weir::string().schema(),
        weir::number().schema(),
        weir::boolean(),
        weir::null(),
    ]);
    weir::union([
        literal,
        weir::lazy(json_schema).array().schema(),
        weir::record(weir::lazy(json_schema)).schema(),
    ])
}

fn name_and_email() -> Schema {
    weir::object()
        .field("name", weir::string())
        .field("email", weir::string().email())
        .or(weir::object()
            .field("name", weir::literal(""))
            .field("email", weir::literal("")))
}

#[test]
fn test_login_accepts_valid_credentials() {
    assert_success!(login().safe_parse(json!({
        "email": "test@example.com",
        "password": "Password1!",
    })));
}

#[test]
fn test_login_returns_fields_unchanged() {
    let input = json!({ "email": "test@example.com", "password": "short1A!" });
    assert_eq!(login().parse(input.clone()).unwrap(), Value::from(input));
}

#[test]
fn test_login_password_without_special_character() {
    assert_issues!(
        login().safe_parse(json!({ "email": "test@example.com", "password": "Password1" })),
        [(IssueCode::Custom, ["password"])]
    );
}

#[test]
fn test_login_reports_every_field() {
    let long = "1234567890".repeat(10) + "1";
    let result = login().safe_parse(json!({ "email": "", "password": long }));
    assert_issues!(
        result.clone(),
        [(IssueCode::InvalidString, ["email"]), (IssueCode::TooBig, ["password"])]
    );
    let report = result.into_result().unwrap_err();
    assert_eq!(report.issues()[1].message(), "String must contain at most 16 character(s)");
}

#[test]
fn test_password_refinements_stop_at_first_failure() {
    let report = password().safe_parse("password").into_result().unwrap_err();
    assert_eq!(report.len(), 1);
    assert_eq!(
        report.issues().head().message(),
        "password must include capital letter and small letter."
    );

    let report = password().safe_parse("Password").into_result().unwrap_err();
    assert_eq!(report.issues().head().message(), "password must include alphanumeric.");

    let report = password().safe_parse("Password1").into_result().unwrap_err();
    assert_eq!(
        report.issues().head().message(),
        "password must include special character."
    );
}

#[test]
fn test_change_password() {
    assert_success!(change_password().safe_parse(json!({
        "oldPassword": "Password1!",
        "newPassword": "Password2!",
        "confirmationPassword": "Password2!",
    })));

    // The object-level refinement does not run while a field is invalid.
    assert_issues!(
        change_password().safe_parse(json!({
            "oldPassword": "",
            "newPassword": "Password2!",
            "confirmationPassword": "Password1!",
        })),
        [(IssueCode::TooSmall, ["oldPassword"])]
    );

    let mismatch = json!({
        "oldPassword": "Password0!",
        "newPassword": "Password2!",
        "confirmationPassword": "Password1!",
    });
    assert_issues!(
        change_password().safe_parse(mismatch.clone()),
        [(IssueCode::Custom, ["confirmationPassword"])]
    );
    let report = change_password()
        .safe_parse(mismatch)
        .into_result()
        .unwrap_err();
    let flat = report.flatten();
    assert_eq!(
        flat.field_errors["confirmationPassword"],
        vec!["confirmationPassword does not match."]
    );
}

#[test]
fn test_merge_and_extend_agree() {
    let base = weir::object().field("students", weir::string().array());
    let has_id = weir::object().field("id", weir::string());
    let merged = base.clone().merge(has_id.clone());
    let extended = base.extend(has_id);

    for input in [
        json!({ "students": ["a"], "id": "t1" }),
        json!({ "students": ["a"] }),
        json!({ "students": [1], "id": 2 }),
        json!({ "id": "t1", "extra": true }),
    ] {
        assert_eq!(
            merged.safe_parse(input.clone()).into_result().map_err(|r| r.codes()),
            extended.safe_parse(input).into_result().map_err(|r| r.codes())
        );
    }
}

#[test]
fn test_pick_omit_partial() {
    let no_id = instructor().omit(["id"]);
    let students_only = instructor().pick(["students"]);
    let input = json!({ "students": ["a", "b"] });
    assert_eq!(no_id.parse(input.clone()).unwrap(), students_only.parse(input.clone()).unwrap());
    assert_failure!(instructor().safe_parse(input.clone()));

    assert_success!(instructor().partial().safe_parse(json!({})));
    assert_success!(instructor().partial_fields(["id"]).safe_parse(input));
    assert_issues!(
        instructor().partial_fields(["id"]).safe_parse(json!({ "id": "x" })),
        [(IssueCode::InvalidType, ["students"])]
    );
}

#[test]
fn test_deep_partial_user() {
    let partial = user().deep_partial();
    assert_success!(partial.safe_parse(json!({})));
    assert_success!(partial.safe_parse(json!({ "location": {} })));
    assert_success!(partial.safe_parse(json!({ "location": { "latitude": 1 } })));
    assert_success!(partial.safe_parse(json!({ "strings": [{}] })));
    assert_issues!(
        partial.safe_parse(json!({ "location": { "latitude": "north" } })),
        [(IssueCode::InvalidType, ["location", "latitude"])]
    );
    assert_failure!(user().safe_parse(json!({})));
}

#[test]
fn test_intersection_of_person_and_employee() {
    let person = weir::object().field("name", weir::string()).strip();
    let employee = weir::object().field("role", weir::string()).strip();
    let employed = weir::intersection(person.clone(), employee.clone());

    assert_eq!(
        employed.parse(json!({ "name": "Ada", "role": "engineer" })).unwrap(),
        Value::from(json!({ "name": "Ada", "role": "engineer" }))
    );
    assert_issues!(
        person.and(employee).safe_parse(json!({ "name": 1 })),
        [(IssueCode::InvalidType, ["name"]), (IssueCode::InvalidType, ["role"])]
    );
}

#[test]
fn test_recursive_category() {
    fn category() -> Schema {
        weir::object()
            .field("name", weir::string())
            .field("subCategories", weir::lazy(category).array())
            .into()
    }

    assert_success!(category().safe_parse(json!({
        "name": "People",
        "subCategories": [
            { "name": "Politicians", "subCategories": [
                { "name": "Presidents", "subCategories": [] }
            ] }
        ]
    })));
    assert_issues!(
        category().safe_parse(json!({
            "name": "People",
            "subCategories": [{ "name": "Politicians" }]
        })),
        [(IssueCode::InvalidType, ["subCategories", 0usize, "subCategories"])]
    );
}

#[test]
fn test_json_schema() {
    let schema = json_schema();
    for input in [
        json!(null),
        json!("a"),
        json!(1.5),
        json!([1, "two", [false, { "x": null }]]),
        json!({ "a": { "b": [1, 2, { "c": "d" }] } }),
    ] {
        assert_eq!(schema.parse(input.clone()).unwrap(), Value::from(input));
    }
    assert_failure!(schema.safe_parse(Value::Undefined));
    assert_failure!(schema.safe_parse(Value::from(vec![Value::Undefined])));
}

#[test]
fn test_name_and_email_union() {
    let list = name_and_email().array();
    assert_success!(list.safe_parse(json!([
        { "name": "Ada", "email": "ada@example.com" },
        { "name": "", "email": "" },
    ])));

    let report = list
        .safe_parse(json!([{ "name": "Ada", "email": "" }]))
        .into_result()
        .unwrap_err();
    assert_eq!(report.codes(), vec![IssueCode::InvalidUnion]);
    assert_eq!(report.issues().head().path(), &[PathSegment::from(0usize)]);

    let tree = report.format();
    let entry = tree.get(0usize).unwrap();
    assert_eq!(entry.get("email").unwrap().errors(), ["Invalid email"]);
    assert_eq!(entry.get("name").unwrap().errors(), ["Invalid literal value, expected \"\""]);
}

#[test]
fn test_date_schema() {
    let schema = weir::date().coerce();
    let from_local = schema.parse("1/12/22").unwrap();
    let from_iso = schema.parse("2022-01-12T00:00:00.000Z").unwrap();
    assert_eq!(from_local, from_iso);
    assert!(matches!(from_iso, Value::Date(_)));
    assert_issues!(schema.safe_parse("someday"), [(IssueCode::InvalidDate, [])]);
}

#[test]
fn test_enum_schema() {
    let fish = weir::enumeration(["Salmon", "Tuna", "Trout"]);
    assert_eq!(fish.options(), ["Salmon", "Tuna", "Trout"]);
    assert_eq!(fish.get("Salmon"), Some("Salmon"));
    assert_issues!(fish.safe_parse("Cod"), [(IssueCode::InvalidEnumValue, [])]);
}

#[test]
fn test_discriminated_union() {
    let schema = weir::discriminated_union(
        "type",
        [
            weir::object().field("type", weir::literal("a")).field("a", weir::string()),
            weir::object().field("type", weir::literal("b")).field("b", weir::string()),
        ],
    )
    .unwrap();

    assert_success!(schema.safe_parse(json!({ "type": "a", "a": "abc" })));
    assert_issues!(
        schema.safe_parse(json!({ "type": "a", "b": "abc" })),
        [(IssueCode::InvalidType, ["a"]), (IssueCode::UnrecognizedKeys, [])]
    );
    assert_issues!(
        schema.safe_parse(json!({ "type": "b", "a": "abc" })),
        [(IssueCode::InvalidType, ["b"]), (IssueCode::UnrecognizedKeys, [])]
    );
    assert_issues!(
        schema.safe_parse(json!({ "type": "c" })),
        [(IssueCode::InvalidUnionDiscriminator, ["type"])]
    );
}
