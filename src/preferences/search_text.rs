//! Turns a preference record into a one-line web search query.

use super::{is_unspecified, Preference, PreferenceField, PreferenceRecord};

/// Returned when no field contributes a fragment.
pub const FALLBACK_SEARCH_TEXT: &str = "laptop recommendations";

/// Appended after the joined fragments.
const SEARCH_SUFFIX: &str = " best laptop recommendations";

/// Build the search query for `record`.
///
/// Fields are visited in fixed order and every set field contributes a
/// natural-language fragment built from its trimmed value. Unset and
/// unspecified fields, and values that trim to nothing, contribute nothing.
/// When no fragment is produced the result is exactly
/// [`FALLBACK_SEARCH_TEXT`].
///
/// ```
/// use laptop_advisor::preferences::{build_search_text, PreferencePatch, PreferenceField, PreferenceRecord};
///
/// let record = PreferenceRecord::new()
///     .apply(&PreferencePatch::new().with_purpose(["gaming"]).with(PreferenceField::Ram, "16GB"));
/// assert_eq!(build_search_text(&record), "gaming laptop 16GB RAM best laptop recommendations");
/// ```
pub fn build_search_text(record: &PreferenceRecord) -> String {
    let fragments = fragments(record);
    if fragments.is_empty() {
        return FALLBACK_SEARCH_TEXT.to_owned();
    }
    let mut text = fragments.join(" ");
    text.push_str(SEARCH_SUFFIX);
    text
}

fn fragments(record: &PreferenceRecord) -> Vec<String> {
    let mut parts = Vec::new();

    if let Preference::Value(purposes) = &record.purpose {
        parts.extend(
            purposes
                .iter()
                .map(|purpose| purpose.trim())
                .filter(|purpose| !purpose.is_empty() && !is_unspecified(purpose))
                .map(|purpose| format!("{purpose} laptop")),
        );
    }

    for field in PreferenceField::SCALARS {
        let Some(Preference::Value(value)) = record.scalar(field) else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        parts.push(fragment(field, value));
    }

    parts
}

fn fragment(field: PreferenceField, value: &str) -> String {
    match field {
        PreferenceField::Purpose => format!("{value} laptop"),
        PreferenceField::Processor => format!("with {value} processor"),
        PreferenceField::Ram => format!("{value} RAM"),
        PreferenceField::Storage => format!("{value} storage"),
        PreferenceField::Graphics => format!("{value} graphics"),
        PreferenceField::Display => format!("{value} display"),
        PreferenceField::PriceRange => format!("within budget {value}"),
    }
}
