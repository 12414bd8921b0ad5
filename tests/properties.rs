//! Property-based tests for parsing

use proptest::prelude::*;
use serde_json::json;
use weir::prelude::*;

fn profile() -> ObjectSchema {
    weir::object()
        .field("name", weir::string().min(1).max(20))
        .field("age", weir::number().int().nonnegative())
        .field("tags", weir::string().array().max(5))
}

proptest! {
    #[test]
    fn prop_valid_profiles_round_trip(
        name in "[a-z]{1,20}",
        age in 0u32..150,
        tags in prop::collection::vec("[a-z]{0,8}", 0..=5),
    ) {
        let input = json!({ "name": name, "age": age, "tags": tags });
        let parsed = profile().parse(input.clone());
        prop_assert_eq!(parsed.ok(), Some(Value::from(input)));
    }

    #[test]
    fn prop_reparsing_transformed_output_is_idempotent(text in "\\PC{0,30}") {
        let normalize = weir::string().trim().to_lowercase();
        let once = normalize.parse(text.as_str()).unwrap();
        let twice = weir::string().parse(once.clone()).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_one_bad_element_one_issue(
        items in prop::collection::vec(any::<i32>(), 1..20),
        bad in any::<prop::sample::Index>(),
    ) {
        let at = bad.index(items.len());
        let mut values: Vec<Value> = items.iter().map(|&n| Value::from(n)).collect();
        values[at] = Value::from("not a number");

        let report = weir::number().array().safe_parse(values).into_result().unwrap_err();
        prop_assert_eq!(report.len(), 1);
        prop_assert_eq!(report.issues().head().path(), &[PathSegment::from(at)][..]);
    }

    #[test]
    fn prop_union_takes_first_match(n in any::<i32>()) {
        let schema = weir::union([
            weir::number().transform(|_, _| Value::from("first")),
            weir::number().transform(|_, _| Value::from("second")),
        ]);
        prop_assert_eq!(schema.parse(n).unwrap(), Value::from("first"));
    }

    #[test]
    fn prop_string_length_bounds(text in "\\PC{0,40}", min in 0usize..20, max in 20usize..40) {
        let len = text.chars().count();
        let result = weir::string().min(min).max(max).safe_parse(text.as_str());
        prop_assert_eq!(result.is_success(), len >= min && len <= max);
    }
}
