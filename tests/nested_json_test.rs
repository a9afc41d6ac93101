//! Integration tests for nested JSON validation.

use reqguard::{
    Bound, Enum, IntRule, IsEmail, ItemError, ItemKind, JsonParam, Max, Min, MinLength, NodeKind, Number, ObjectParam,
    PathError, PathErrorKind, Rule, RuleChain, RuleError,
};
use serde_json::{json, Value};

fn rules<R: Rule + 'static>(rule: R) -> RuleChain {
    RuleChain::builder().rule(rule).build().unwrap()
}

fn range(min: i64, max: i64) -> RuleChain {
    RuleChain::builder().rule(Min::new(min)).rule(Max::new(max)).build().unwrap()
}

fn warehouse_schema() -> ObjectParam {
    JsonParam::object()
        .field("street", rules(Enum::new(["Jakuba Kolasa"])))
        .field(
            "meta",
            JsonParam::object()
                .field(
                    "description",
                    JsonParam::object().field("color", rules(Enum::new(["green", "yellow", "blue"]))),
                )
                .field(
                    "buildings",
                    JsonParam::object().field(
                        "warehouses",
                        JsonParam::object()
                            .field("small", JsonParam::object().field("count", range(0, 99)))
                            .field("large", range(1, 10)),
                    ),
                )
                .field("not_required", JsonParam::object().field("text", RuleChain::empty()).optional()),
        )
}

fn contacts_schema() -> ObjectParam {
    JsonParam::object().field(
        "person",
        JsonParam::object().field(
            "info",
            JsonParam::object().field(
                "contacts",
                JsonParam::object()
                    .field("phones", JsonParam::scalar_list(rules(Enum::new(["+375", "+49"]))))
                    .field(
                        "networks",
                        JsonParam::object_list().field("name", rules(Enum::new(["facebook", "telegram"]))),
                    )
                    .field("emails", JsonParam::scalar_list(rules(IsEmail)))
                    .field(
                        "addresses",
                        JsonParam::object().field("street", RuleChain::empty()).optional(),
                    ),
            ),
        ),
    )
}

fn depths(errors: &[PathError]) -> Vec<String> {
    errors.iter().map(|e| e.depth.to_string()).collect()
}

#[test]
fn test_path_tracking() {
    let schema = JsonParam::object().field(
        "meta",
        JsonParam::object().field(
            "buildings",
            JsonParam::object().field("warehouses", JsonParam::object().field("large", rules(Min::new(1)))),
        ),
    );

    let (_, errors) = schema.validate(json!({"meta": {"buildings": {"warehouses": {"large": 0}}}}));

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].depth, ["root", "meta", "buildings", "warehouses"]);
    assert!(!errors[0].is_sequence_context());
    assert_eq!(
        errors[0].field("large").unwrap().first(),
        &RuleError::Min {
            bound: Bound::Int(1),
            include_boundary: true
        }
    );
}

#[test]
fn test_every_depth_reported() {
    let doc = json!({
        "street": "Rampische",
        "meta": {"buildings": {"warehouses": {"small": {"count": 100}, "large": 0}}}
    });

    let (_, errors) = warehouse_schema().validate(doc);

    assert_eq!(
        depths(&errors),
        vec![
            "root|meta|buildings|warehouses|small",
            "root|meta|buildings|warehouses",
            "root|meta",
            "root",
        ]
    );
    assert_eq!(errors[0].field("count").unwrap().first().code(), "max_value");
    assert_eq!(errors[1].field("large").unwrap().first().code(), "min_value");
    assert_eq!(
        errors[2].field("description").unwrap().first(),
        &RuleError::MissingKey {
            key: "description".to_string()
        }
    );
    assert_eq!(errors[3].field("street").unwrap().first().code(), "enum");
}

#[test]
fn test_valid_document_passes_unchanged() {
    let doc = json!({
        "country": "Belarus",
        "street": "Jakuba Kolasa",
        "meta": {
            "buildings": {"warehouses": {"small": {"count": 99}, "large": 1}},
            "description": {"color": "green"}
        }
    });

    let (value, errors) = warehouse_schema().validate(doc.clone());

    assert!(errors.is_empty());
    assert_eq!(value, doc);
}

#[test]
fn test_list_items_keyed_by_index() {
    let doc = json!({
        "person": {"info": {"contacts": {
            "phones": ["+375", "+49", {"code": "+420"}, {"code": "+10000"}],
            "emails": [{"work": "bad_type1"}, {"work": "bad_type2"}, "bad_mail"],
            "networks": [{"name": "facebook"}, {"name": "insta"}, {"name": "linkedin"}]
        }}}
    });

    let (_, errors) = contacts_schema().validate(doc);

    assert_eq!(
        depths(&errors),
        vec![
            "root|person|info|contacts|phones",
            "root|person|info|contacts|networks",
            "root|person|info|contacts|emails",
        ]
    );
    assert!(errors.iter().all(PathError::is_sequence_context));

    let scalar_expected = ItemError::InvalidType {
        expected: ItemKind::Scalar,
    };
    assert_eq!(errors[0].item(2), Some(&scalar_expected));
    assert_eq!(errors[0].item(3), Some(&scalar_expected));
    assert!(errors[0].item(0).is_none());

    match errors[1].item(1) {
        Some(ItemError::Fields(fields)) => assert_eq!(fields["name"].first().code(), "enum"),
        other => panic!("unexpected {:?}", other),
    }
    assert!(errors[1].item(2).is_some());
    assert!(errors[1].item(0).is_none());

    assert_eq!(errors[2].item(0), Some(&scalar_expected));
    assert_eq!(errors[2].item(1), Some(&scalar_expected));
    match errors[2].item(2) {
        Some(ItemError::Rules(e)) => assert_eq!(e.first(), &RuleError::Email),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_end_to_end_root_list() {
    let schema = JsonParam::object_list()
        .field("age", rules(Number))
        .field("name", rules(MinLength(1)))
        .field("tags", JsonParam::object_list().field("name", rules(MinLength(1))).optional());

    let (_, errors) = schema.validate(json!([{"age": "ab"}]));

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].depth, ["root"]);
    assert!(errors[0].is_sequence_context());
    let PathErrorKind::Array(items) = &errors[0].kind else {
        panic!("expected array context");
    };
    assert_eq!(items.len(), 1);
    match &items[&0] {
        ItemError::Fields(fields) => {
            assert_eq!(fields.len(), 1);
            assert_eq!(fields["age"].first(), &RuleError::Number);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_root_list_valid_with_optional_children() {
    let schema = JsonParam::object_list()
        .field("age", rules(Number))
        .field("name", rules(MinLength(1)))
        .field("tags", JsonParam::object_list().field("name", rules(MinLength(1))).optional());
    let doc = json!([
        {"age": 10, "name": "test", "tags": [{"name": "green"}, {"name": "light"}]},
        {"age": 20, "name": "test2"},
        {"age": 30, "name": "test3", "tags": [{"name": "cat"}, {"name": "dog"}]}
    ]);

    let (value, errors) = schema.validate(doc.clone());

    assert!(errors.is_empty());
    assert_eq!(value, doc);
}

#[test]
fn test_nested_list_inside_list_items() {
    let schema = JsonParam::object_list()
        .field("name", rules(MinLength(1)))
        .field("tags", JsonParam::object_list().field("name", rules(MinLength(1))).optional());
    let doc = json!([
        {"name": "a", "tags": [{"name": ""}]},
        {"name": "", "tags": [{"name": "ok"}, {"name": ""}]}
    ]);

    let (_, errors) = schema.validate(doc);

    // item errors of both inner lists share one depth, in document order
    assert_eq!(depths(&errors), vec!["root|tags", "root|tags", "root"]);
    assert!(errors[0].item(0).is_some());
    assert!(errors[1].item(1).is_some());
    assert!(errors[2].item(1).is_some());
    assert!(errors[2].item(0).is_none());
}

#[test]
fn test_required_nested_key() {
    let schema = JsonParam::object()
        .field("a", JsonParam::object().field("x", rules(Number)))
        .field("b", JsonParam::object().field("y", rules(Number)).optional());

    let (_, errors) = schema.validate(json!({}));

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].depth, ["root"]);
    let PathErrorKind::Object(fields) = &errors[0].kind else {
        panic!("expected object context");
    };
    assert_eq!(fields.len(), 1);
    assert_eq!(
        fields["a"].first(),
        &RuleError::MissingKey {
            key: "a".to_string()
        }
    );
}

#[test]
fn test_shape_precedence() {
    let schema = JsonParam::object()
        .field("list", JsonParam::object_list().field("x", rules(Number)))
        .field("obj", JsonParam::object().required_field("y", rules(Number)));

    let (value, errors) = schema.validate(json!({"list": {"x": "bad"}, "obj": ["bad"]}));

    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].depth, ["root", "list"]);
    assert_eq!(
        errors[0].kind,
        PathErrorKind::ShapeMismatch {
            expected: NodeKind::Array
        }
    );
    assert_eq!(errors[1].depth, ["root", "obj"]);
    assert_eq!(
        errors[1].kind,
        PathErrorKind::ShapeMismatch {
            expected: NodeKind::Object
        }
    );
    assert_eq!(value, json!({"list": {"x": "bad"}, "obj": ["bad"]}));
}

#[test]
fn test_sequence_item_typing() {
    let schema = JsonParam::object_list().field("x", rules(Number));

    let (_, errors) = schema.validate(json!([{"x": 1}, "not-an-object"]));

    assert_eq!(errors.len(), 1);
    let PathErrorKind::Array(items) = &errors[0].kind else {
        panic!("expected array context");
    };
    assert_eq!(items.len(), 1);
    assert_eq!(
        items[&1],
        ItemError::InvalidType {
            expected: ItemKind::Object
        }
    );
}

#[test]
fn test_completeness() {
    let schema = JsonParam::object()
        .field("a", rules(Number))
        .field("b", rules(MinLength(3)))
        .field("c", rules(IsEmail))
        .field("inner", JsonParam::object().field("d", rules(Max::new(5))).field("e", rules(Number)));

    let (_, errors) = schema.validate(json!({
        "a": "x",
        "b": "xy",
        "c": "nope",
        "inner": {"d": 6, "e": "y"}
    }));

    let reported: usize = errors.iter().map(PathError::len).sum();
    assert_eq!(reported, 5);
}

#[test]
fn test_conversions_written_back() {
    let schema = JsonParam::object()
        .field("count", rules(IntRule::new()))
        .field("items", JsonParam::object_list().field("qty", rules(IntRule::new())))
        .field("ids", JsonParam::scalar_list(rules(IntRule::new())));

    let (value, errors) = schema.validate(json!({
        "count": "3",
        "items": [{"qty": "1"}, {"qty": "two"}],
        "ids": ["7", 8]
    }));

    assert_eq!(errors.len(), 1);
    assert_eq!(
        value,
        json!({"count": 3, "items": [{"qty": 1}, {"qty": "two"}], "ids": [7, 8]})
    );
}

#[test]
fn test_idempotence_of_converted_document() {
    let schema = JsonParam::object()
        .field("count", rules(IntRule::new()))
        .field("ids", JsonParam::scalar_list(rules(IntRule::new())));

    let (once, errors) = schema.validate(json!({"count": "3", "ids": ["1", "2"]}));
    assert!(errors.is_empty());

    let (twice, errors) = schema.validate(once.clone());
    assert!(errors.is_empty());
    assert_eq!(once, twice);
}

#[test]
fn test_schema_bounds_recursion_depth() {
    let schema = JsonParam::object().field("a", JsonParam::object().field("b", RuleChain::empty()));

    let mut deep = json!("leaf");
    for _ in 0..500 {
        deep = json!({ "b": deep });
    }
    let doc = json!({ "a": deep });

    let (value, errors) = schema.validate(doc.clone());
    assert!(errors.is_empty());
    assert_eq!(value, doc);
}

#[test]
fn test_check_returns_validation() {
    let schema = JsonParam::object().field("n", rules(Number));

    let ok: Value = schema.check(json!({"n": 1})).into_result().unwrap();
    assert_eq!(ok, json!({"n": 1}));

    let errors = schema.check(json!({"n": "x"})).into_result().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.at_depth(&reqguard::Depth::root()).len(), 1);
}
