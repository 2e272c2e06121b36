//! Preference tools: stateful update and stateless merge.

use serde_json::{json, Value};

use crate::preferences::{merge, PreferencePatch};
use crate::session::{PreferenceStore, SessionId};

use super::{ToolDefinition, ToolError};

/// Name of the stateful update tool. Agent instructions reference it.
pub const UPDATE_PREFERENCES_TOOL: &str = "update_laptop_preferences_and_build_search";

/// Name of the stateless merge tool.
pub const MERGE_PREFERENCES_TOOL: &str = "merge_laptop_preferences";

/// Session used when the caller does not name one.
pub const DEFAULT_SESSION: &str = "default";

// ---------------------------------------------------------------------------
// update_laptop_preferences_and_build_search
// ---------------------------------------------------------------------------

/// Apply a patch to a stored session and report what is still missing.
///
/// Reads an optional `session_id` (default [`DEFAULT_SESSION`]) and any of
/// the seven preference fields from `input`.
///
/// # Errors
///
/// Returns [`ToolError::InvalidInput`] if `input` is not an object, a field
/// has the wrong type, or `session_id` is not a string. Returns
/// [`ToolError::ExecutionFailed`] if the store is unusable.
pub fn update_preferences(store: &PreferenceStore, input: &Value) -> Result<Value, ToolError> {
    let session = session_id(input)?;
    let patch = patch(input)?;

    let outcome = store
        .update(&session, &patch)
        .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

    Ok(json!({
        "session_id": session,
        "preferences_json": outcome.preferences_json,
        "search_text": outcome.search_text,
        "missing_fields": outcome.missing_fields,
    }))
}

fn session_id(input: &Value) -> Result<SessionId, ToolError> {
    match input.get("session_id") {
        None | Some(Value::Null) => Ok(SessionId::from(DEFAULT_SESSION)),
        Some(Value::String(id)) if !id.trim().is_empty() => Ok(SessionId::from(id.trim())),
        Some(_) => Err(ToolError::InvalidInput(
            "session_id must be a non-empty string".to_owned(),
        )),
    }
}

// ---------------------------------------------------------------------------
// merge_laptop_preferences
// ---------------------------------------------------------------------------

/// Apply a patch to a caller-held record.
///
/// Reads `preferences_json` (a string, may be absent, empty or malformed)
/// and any of the seven preference fields from `input`.
///
/// # Errors
///
/// Returns [`ToolError::InvalidInput`] if `input` is not an object, a field
/// has the wrong type, or `preferences_json` is not a string.
pub fn merge_preferences(input: &Value) -> Result<Value, ToolError> {
    let serialized = match input.get("preferences_json") {
        None | Some(Value::Null) => "",
        Some(Value::String(text)) => text.as_str(),
        Some(_) => {
            return Err(ToolError::InvalidInput(
                "preferences_json must be a string".to_owned(),
            ))
        }
    };
    let patch = patch(input)?;

    let outcome = merge(serialized, &patch);
    serde_json::to_value(outcome).map_err(|e| ToolError::ExecutionFailed(e.to_string()))
}

fn patch(input: &Value) -> Result<PreferencePatch, ToolError> {
    PreferencePatch::from_value(input).map_err(|e| ToolError::InvalidInput(e.to_string()))
}

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

fn preference_properties() -> serde_json::Map<String, Value> {
    let text = |description: &str| {
        json!({
            "type": "string",
            "description": description,
        })
    };

    let mut properties = serde_json::Map::new();
    properties.insert(
        "purpose".to_owned(),
        json!({
            "type": "array",
            "items": { "type": "string" },
            "description": "Every use-case collected so far, e.g. [\"gaming\", \"coding\"]. \
                            Replaces the stored list. Pass [\"unspecified\"] if the user cannot say.",
        }),
    );
    properties.insert(
        "processor".to_owned(),
        text("Processor preference, e.g. \"Intel Core i7\" or \"unspecified\"."),
    );
    properties.insert(
        "ram".to_owned(),
        text("Memory preference, e.g. \"16GB\" or \"unspecified\"."),
    );
    properties.insert(
        "storage".to_owned(),
        text("Storage preference, e.g. \"512GB SSD\" or \"unspecified\"."),
    );
    properties.insert(
        "graphics".to_owned(),
        text("Graphics preference, e.g. \"integrated\" or \"RTX 4060\", or \"unspecified\"."),
    );
    properties.insert(
        "display".to_owned(),
        text("Display preference, e.g. \"15.6 inch OLED\" or \"unspecified\"."),
    );
    properties.insert(
        "price_range".to_owned(),
        text("Budget with currency, e.g. \"Rs 40000 - Rs 45000\" or \"unspecified\"."),
    );
    properties
}

/// Definitions of the preference tools.
pub fn preference_tool_definitions() -> Vec<ToolDefinition> {
    let mut update_properties = preference_properties();
    update_properties.insert(
        "session_id".to_owned(),
        json!({
            "type": "string",
            "description": "Conversation identifier. Defaults to \"default\".",
        }),
    );

    let mut merge_properties = preference_properties();
    merge_properties.insert(
        "preferences_json".to_owned(),
        json!({
            "type": "string",
            "description": "The preferences JSON returned by the previous call. \
                            Empty or invalid text starts from an empty record.",
        }),
    );

    vec![
        ToolDefinition {
            name: UPDATE_PREFERENCES_TOOL.to_owned(),
            description: "Store the user's laptop preferences for this conversation and build \
                          a web search text from them. Omitted fields keep their stored value. \
                          Returns preferences_json, search_text and missing_fields (fields \
                          never provided)."
                .to_owned(),
            input_schema: json!({
                "type": "object",
                "properties": update_properties,
            }),
        },
        ToolDefinition {
            name: MERGE_PREFERENCES_TOOL.to_owned(),
            description: "Apply preference changes to a previously returned preferences JSON \
                          and rebuild the web search text. Returns preferences_json and \
                          search_text."
                .to_owned(),
            input_schema: json!({
                "type": "object",
                "properties": merge_properties,
            }),
        },
    ]
}
