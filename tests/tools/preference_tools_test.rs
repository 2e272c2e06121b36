//! Tests for `src/tools/` — preference tool dispatch and definitions.

use serde_json::{json, Value};

use laptop_advisor::preferences::{decode_lenient, Preference};
use laptop_advisor::session::{PreferenceStore, SessionId};
use laptop_advisor::tools::{
    execute_tool, tool_definitions, ToolError, MERGE_PREFERENCES_TOOL, UPDATE_PREFERENCES_TOOL,
};

fn run(store: &PreferenceStore, name: &str, input: Value) -> Value {
    match execute_tool(store, name, &input) {
        Ok(output) => output,
        Err(err) => panic!("{name} should succeed: {err}"),
    }
}

#[test]
fn definitions_cover_every_tool_with_object_schemas() {
    let definitions = tool_definitions();
    let names: Vec<&str> = definitions.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec![UPDATE_PREFERENCES_TOOL, MERGE_PREFERENCES_TOOL]);

    for definition in &definitions {
        assert_eq!(definition.input_schema["type"], "object");
        let properties = &definition.input_schema["properties"];
        for key in ["purpose", "processor", "ram", "storage", "graphics", "display", "price_range"] {
            assert!(properties.get(key).is_some(), "{} lacks {key}", definition.name);
        }
    }
    assert_eq!(
        definitions[0].input_schema["properties"]["purpose"]["type"],
        "array"
    );
}

#[test]
fn update_accumulates_in_the_default_session() {
    let store = PreferenceStore::new();

    let first = run(&store, UPDATE_PREFERENCES_TOOL, json!({"purpose": ["gaming"]}));
    assert_eq!(first["session_id"], "default");
    assert_eq!(first["missing_fields"].as_array().map(Vec::len), Some(6));

    let second = run(&store, UPDATE_PREFERENCES_TOOL, json!({"ram": "16GB"}));
    assert_eq!(
        second["search_text"],
        "gaming laptop 16GB RAM best laptop recommendations"
    );
    assert_eq!(second["missing_fields"].as_array().map(Vec::len), Some(5));
}

#[test]
fn update_uses_named_sessions() {
    let store = PreferenceStore::new();
    run(
        &store,
        UPDATE_PREFERENCES_TOOL,
        json!({"session_id": "alice", "display": "OLED"}),
    );

    let alice = store
        .snapshot(&SessionId::from("alice"))
        .expect("snapshot should succeed")
        .expect("session should exist");
    assert_eq!(alice.display, Preference::Value("OLED".to_owned()));
    assert!(store
        .snapshot(&SessionId::from("default"))
        .expect("snapshot should succeed")
        .is_none());
}

#[test]
fn update_reports_empty_missing_fields_when_complete() {
    let store = PreferenceStore::new();
    let output = run(
        &store,
        UPDATE_PREFERENCES_TOOL,
        json!({
            "purpose": ["unspecified"],
            "processor": "unspecified",
            "ram": "unspecified",
            "storage": "unspecified",
            "graphics": "unspecified",
            "display": "unspecified",
            "price_range": "unspecified",
        }),
    );
    assert_eq!(output["missing_fields"], json!([]));
    assert_eq!(output["search_text"], "laptop recommendations");
}

#[test]
fn merge_is_stateless() {
    let store = PreferenceStore::new();
    let first = run(&store, MERGE_PREFERENCES_TOOL, json!({"storage": "1TB SSD"}));
    let stored = first["preferences_json"]
        .as_str()
        .expect("preferences_json should be a string")
        .to_owned();

    let second = run(
        &store,
        MERGE_PREFERENCES_TOOL,
        json!({"preferences_json": stored, "price_range": "under $900"}),
    );
    assert_eq!(
        second["search_text"],
        "1TB SSD storage within budget under $900 best laptop recommendations"
    );
    assert!(second.get("missing_fields").is_none());
    assert!(store.is_empty());

    let record = decode_lenient(second["preferences_json"].as_str().unwrap_or_default());
    assert_eq!(record.storage, Preference::Value("1TB SSD".to_owned()));
}

#[test]
fn merge_tolerates_malformed_record() {
    let store = PreferenceStore::new();
    let output = run(
        &store,
        MERGE_PREFERENCES_TOOL,
        json!({"preferences_json": "not json", "ram": "16GB"}),
    );
    assert_eq!(output["search_text"], "16GB RAM best laptop recommendations");
}

#[test]
fn rejects_unknown_tool() {
    let store = PreferenceStore::new();
    let result = execute_tool(&store, "google_search", &json!({}));
    assert!(matches!(result, Err(ToolError::UnknownTool(name)) if name == "google_search"));
}

#[test]
fn rejects_wrongly_typed_values() {
    let store = PreferenceStore::new();
    for (tool, input) in [
        (UPDATE_PREFERENCES_TOOL, json!({"ram": 16})),
        (UPDATE_PREFERENCES_TOOL, json!({"purpose": [1, 2]})),
        (UPDATE_PREFERENCES_TOOL, json!({"session_id": 7})),
        (UPDATE_PREFERENCES_TOOL, json!("gaming")),
        (MERGE_PREFERENCES_TOOL, json!({"preferences_json": {"ram": "8GB"}})),
    ] {
        let result = execute_tool(&store, tool, &input);
        assert!(
            matches!(result, Err(ToolError::InvalidInput(_))),
            "{tool} should reject {input}"
        );
    }
    assert!(store.is_empty());
}
