//! Patching with literal change sets and builder-described change sets.
use handy_doc::{merge, Document, Value};
use serde_json::json;

fn settings() -> Document {
    Document::try_from(json!({
        "host_name": "www.myapp.com",
        "some_lib": {
            "path": "/lib/some_lib",
            "init_opts": {
                "flags": 3465873,
                "secret": "78396nxry837d"
            },
            "methods": ["one", "two"]
        },
        "the_false_value": false
    }))
    .unwrap()
}

fn literal(value: serde_json::Value) -> Document {
    Document::try_from(value).unwrap()
}

/// Patch with a literal mapping.
fn patched_literal(data: &Document) -> Document {
    data.patch(&literal(json!({
        "some_lib": {"path": "/lib/other_path"},
        "foo": "bar"
    })))
}

/// The same kind of change described with a builder.
fn patched_builder(data: &Document) -> Document {
    data.patch_with(|b| {
        b.scope("some_lib", |lib| {
            lib.child("init_opts").set("flags", 123);
        });
        b.set("foo", "bar");
    })
    .unwrap()
}

// ============================================================================
// 1. Changed values
// ============================================================================

#[test]
fn changes_values() {
    let data = settings();
    let p1 = patched_literal(&data);
    let p2 = patched_builder(&data);

    assert_eq!(p1.attr("some_lib").unwrap().attr("path").unwrap(), "/lib/other_path");
    assert_eq!(p1.attr("foo").unwrap(), "bar");
    assert_eq!(
        p2.attr("some_lib").unwrap().attr("init_opts").unwrap().attr("flags").unwrap(),
        &Value::from(123)
    );
    assert_eq!(p2.attr("foo").unwrap(), "bar");
}

// ============================================================================
// 2. Unmentioned branches survive
// ============================================================================

#[test]
fn leaves_unmentioned_values() {
    let data = settings();
    let p1 = patched_literal(&data);
    let p2 = patched_builder(&data);

    assert_eq!(p1["host_name"], json!("www.myapp.com"));
    assert_eq!(
        p1["some_lib"]["init_opts"],
        json!({"flags": 3465873, "secret": "78396nxry837d"})
    );
    assert_eq!(p1["some_lib"]["methods"], json!(["one", "two"]));

    assert_eq!(p2["host_name"], json!("www.myapp.com"));
    assert_eq!(p2["some_lib"]["path"], json!("/lib/some_lib"));
    assert_eq!(p2["some_lib"]["init_opts"]["secret"], json!("78396nxry837d"));
    assert_eq!(p2["some_lib"]["methods"], json!(["one", "two"]));
}

#[test]
fn does_not_change_the_original() {
    let data = settings();
    let before = data.clone();
    let _ = patched_literal(&data);
    let _ = patched_builder(&data);

    assert_eq!(data, before);
    assert_eq!(
        data,
        json!({
            "host_name": "www.myapp.com",
            "some_lib": {
                "path": "/lib/some_lib",
                "init_opts": {"flags": 3465873, "secret": "78396nxry837d"},
                "methods": ["one", "two"]
            },
            "the_false_value": false
        })
    );
}

#[test]
fn change_set_is_not_modified() {
    let data = settings();
    let changes = literal(json!({"some_lib": {"path": "/x"}, "new": {"k": 1}}));
    let before = changes.clone();
    let mut patched = data.patch(&changes);
    patched.set("new", 2).unwrap();
    assert_eq!(changes, before);
}

// ============================================================================
// 3. Folding several change sets
// ============================================================================

#[test]
fn later_change_sets_win_on_conflicting_scalars() {
    let data = settings();
    let c1 = literal(json!({"host_name": "one", "some_lib": {"path": "/one"}}));
    let c2 = literal(json!({"host_name": "two", "some_lib": {"extra": true}}));
    let patched = data.patch_all([&c1, &c2]);

    assert_eq!(patched["host_name"], json!("two"));
    assert_eq!(patched["some_lib"]["path"], json!("/one"));
    assert_eq!(patched["some_lib"]["extra"], json!(true));
    assert_eq!(patched["some_lib"]["init_opts"]["flags"], json!(3465873));
}

#[test]
fn literal_then_builder() {
    let data = settings();
    let patched = data
        .patch_both(&literal(json!({"host_name": "literal", "a": 1})), |b| {
            b.set("host_name", "builder");
        })
        .unwrap();
    assert_eq!(patched["host_name"], json!("builder"));
    assert_eq!(patched["a"], json!(1));
}

#[test]
fn fold_matches_nested_merges() {
    let data = settings();
    let c1 = literal(json!({"a": {"x": 1}}));
    let c2 = literal(json!({"a": {"y": 2}}));
    assert_eq!(data.patch_all([&c1, &c2]), merge(&merge(&data, &c1), &c2));
}

// ============================================================================
// 4. Frozen inputs and independent results
// ============================================================================

#[test]
fn patching_a_frozen_document_yields_a_mutable_result() {
    let mut data = settings();
    data.freeze();
    let mut patched = data.patch(&literal(json!({"foo": 1})));

    assert!(!patched.is_frozen());
    patched.set("host_name", "changed").unwrap();
    let lib = patched
        .get_mut("some_lib")
        .unwrap()
        .and_then(Value::as_document_mut)
        .unwrap();
    assert!(!lib.is_frozen());
    lib.set("path", "/changed").unwrap();

    assert_eq!(data["host_name"], json!("www.myapp.com"));
    assert_eq!(data["some_lib"]["path"], json!("/lib/some_lib"));
}

#[test]
fn patch_produces_a_fresh_document_when_nothing_changes() {
    let data = settings();
    let patched = data.patch(&Document::new());
    assert_eq!(patched, data);
}

#[test]
fn patching_the_nil_document_is_safe() {
    let patched = Document::nil().patch(&literal(json!({"a": 1})));
    assert_eq!(patched, json!({"a": 1}));
    assert!(!patched.is_nil());
    assert!(Document::nil().is_empty());
}

// ============================================================================
// 5. Example scenario
// ============================================================================

#[test]
fn patch_deep_flag() {
    let doc = literal(json!({"host": "h", "lib": {"opts": {"flag": 7}}}));
    let patched = doc.patch(&literal(json!({"lib": {"opts": {"flag": 9}}})));
    assert_eq!(
        patched.attr("lib").unwrap().attr("opts").unwrap().attr("flag").unwrap(),
        &Value::from(9)
    );
    assert_eq!(
        doc.attr("lib").unwrap().attr("opts").unwrap().attr("flag").unwrap(),
        &Value::from(7)
    );
    assert_eq!(patched["host"], json!("h"));
}
