//! JSON boundary for preference records.
//!
//! Encoding always emits all seven keys in fixed order, `null` for unset
//! fields and the lowercase sentinel for unspecified ones. Decoding is
//! lenient: a record that cannot be read is replaced by an empty one, and a
//! field that cannot be read is left unset.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{
    build_search_text, Preference, PreferenceField, PreferencePatch, PreferenceRecord,
    UNSPECIFIED,
};

/// Result of [`merge`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeOutcome {
    /// The updated record, re-encoded.
    pub preferences_json: String,
    /// Search text for the updated record.
    pub search_text: String,
}

/// Encode `record` as a JSON value with the seven contract keys.
pub fn to_value(record: &PreferenceRecord) -> Value {
    let mut map = Map::new();
    for field in PreferenceField::ALL {
        let value = match record.scalar(field) {
            Some(scalar) => encode_scalar(scalar),
            None => encode_purpose(&record.purpose),
        };
        map.insert(field.as_str().to_owned(), value);
    }
    Value::Object(map)
}

/// Encode `record` as pretty-printed JSON text.
pub fn encode(record: &PreferenceRecord) -> String {
    format!("{:#}", to_value(record))
}

fn encode_scalar(value: &Preference<String>) -> Value {
    match value {
        Preference::Unset => Value::Null,
        Preference::Unspecified => Value::String(UNSPECIFIED.to_owned()),
        Preference::Value(text) => Value::String(text.clone()),
    }
}

fn encode_purpose(value: &Preference<Vec<String>>) -> Value {
    match value {
        Preference::Unset => Value::Null,
        Preference::Unspecified => Value::Array(vec![Value::String(UNSPECIFIED.to_owned())]),
        Preference::Value(list) => Value::Array(list.iter().cloned().map(Value::String).collect()),
    }
}

/// Decode a record, substituting an empty one when the text is empty, is
/// not JSON, or is not a JSON object.
///
/// Keys missing from the document are back-filled as unset. A key holding a
/// value of the wrong type is treated as unset. Unknown keys are ignored.
pub fn decode_lenient(text: &str) -> PreferenceRecord {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        debug!("no stored preferences, starting from an empty record");
        return PreferenceRecord::new();
    }

    let document = match serde_json::from_str::<Value>(trimmed) {
        Ok(document) => document,
        Err(e) => {
            warn!(error = %e, "malformed preferences JSON, starting from an empty record");
            return PreferenceRecord::new();
        }
    };

    match document {
        Value::Object(map) => from_map(&map),
        other => {
            warn!(
                kind = json_kind(&other),
                "preferences JSON is not an object, starting from an empty record"
            );
            PreferenceRecord::new()
        }
    }
}

fn from_map(map: &Map<String, Value>) -> PreferenceRecord {
    let mut record = PreferenceRecord::new();

    for field in PreferenceField::ALL {
        let Some(raw) = map.get(field.as_str()) else {
            continue;
        };
        if raw.is_null() {
            continue;
        }

        let decoded = if field == PreferenceField::Purpose {
            decode_purpose(raw).map(|purpose| record.purpose = purpose)
        } else {
            match (raw.as_str(), record.scalar_mut(field)) {
                (Some(text), Some(slot)) => {
                    *slot = Preference::from_text(text);
                    Some(())
                }
                _ => None,
            }
        };

        if decoded.is_none() {
            warn!(
                field = field.as_str(),
                kind = json_kind(raw),
                "ignoring preference with unexpected JSON type"
            );
        }
    }

    record
}

fn decode_purpose(raw: &Value) -> Option<Preference<Vec<String>>> {
    match raw {
        Value::String(single) => Some(Preference::from_list(vec![single.clone()])),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_owned))
            .collect::<Option<Vec<_>>>()
            .map(Preference::from_list),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Stateless update: decode `serialized` leniently, apply `patch`, and
/// return the re-encoded record with its search text.
///
/// Never fails; never reports missing fields.
pub fn merge(serialized: &str, patch: &PreferencePatch) -> MergeOutcome {
    let record = decode_lenient(serialized).apply(patch);
    let outcome = MergeOutcome {
        preferences_json: encode(&record),
        search_text: build_search_text(&record),
    };
    debug!(
        fields = ?patch.fields(),
        search_text = %outcome.search_text,
        "merged preference patch"
    );
    outcome
}
