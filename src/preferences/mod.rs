//! Laptop preference record and patch semantics.
//!
//! A [`PreferenceRecord`] holds seven fields, each of which is either
//! [`Preference::Unset`] (never provided), [`Preference::Unspecified`] (the
//! user has no preference) or [`Preference::Value`]. The literal sentinel
//! `"unspecified"` only exists at the JSON boundary (see [`codec`]); inside
//! the crate the three states are always explicit.

pub mod codec;
pub mod search_text;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

pub use codec::{decode_lenient, encode, merge, MergeOutcome};
pub use search_text::build_search_text;

/// Reserved value meaning "the user has no preference for this field".
pub const UNSPECIFIED: &str = "unspecified";

// ---------------------------------------------------------------------------
// PreferenceField
// ---------------------------------------------------------------------------

/// The seven preference fields, in their fixed reporting order.
///
/// The snake_case names are part of the external contract: prompt text and
/// orchestration logic reference them literally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceField {
    /// One or more use-cases (multi-valued).
    Purpose,
    /// Processor descriptor.
    Processor,
    /// Memory descriptor.
    Ram,
    /// Storage descriptor.
    Storage,
    /// GPU descriptor.
    Graphics,
    /// Display descriptor.
    Display,
    /// Budget descriptor.
    PriceRange,
}

impl PreferenceField {
    /// Every field in fixed order.
    pub const ALL: [PreferenceField; 7] = [
        PreferenceField::Purpose,
        PreferenceField::Processor,
        PreferenceField::Ram,
        PreferenceField::Storage,
        PreferenceField::Graphics,
        PreferenceField::Display,
        PreferenceField::PriceRange,
    ];

    /// The single-valued fields in fixed order (everything but `purpose`).
    pub const SCALARS: [PreferenceField; 6] = [
        PreferenceField::Processor,
        PreferenceField::Ram,
        PreferenceField::Storage,
        PreferenceField::Graphics,
        PreferenceField::Display,
        PreferenceField::PriceRange,
    ];

    /// Contract name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Purpose => "purpose",
            Self::Processor => "processor",
            Self::Ram => "ram",
            Self::Storage => "storage",
            Self::Graphics => "graphics",
            Self::Display => "display",
            Self::PriceRange => "price_range",
        }
    }
}

impl fmt::Display for PreferenceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing a name that is not one of the seven fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown preference field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for PreferenceField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownField(s.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Sentinel detection
// ---------------------------------------------------------------------------

/// Whether `value` is the "unspecified" sentinel, ignoring surrounding
/// whitespace and case.
pub fn is_unspecified(value: &str) -> bool {
    value.trim().to_lowercase() == UNSPECIFIED
}

/// Whether a purpose list means "unspecified": non-empty, and every element
/// is the sentinel. An empty list is not unspecified.
pub fn is_unspecified_list<S: AsRef<str>>(values: &[S]) -> bool {
    !values.is_empty() && values.iter().all(|v| is_unspecified(v.as_ref()))
}

// ---------------------------------------------------------------------------
// Preference<T>
// ---------------------------------------------------------------------------

/// Observable state of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldState {
    /// Never provided.
    Unset,
    /// Explicitly marked as "no preference".
    Unspecified,
    /// Holds a concrete value.
    Set,
}

/// Three-state value of a preference field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preference<T> {
    /// Never provided; the caller should keep asking.
    Unset,
    /// Provided as "no preference"; not re-asked, excluded from search text.
    Unspecified,
    /// A provided value.
    Value(T),
}

impl<T> Default for Preference<T> {
    fn default() -> Self {
        Self::Unset
    }
}

impl<T> Preference<T> {
    /// State of this value.
    pub fn state(&self) -> FieldState {
        match self {
            Self::Unset => FieldState::Unset,
            Self::Unspecified => FieldState::Unspecified,
            Self::Value(_) => FieldState::Set,
        }
    }

    /// True when the field was never provided.
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// The concrete value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Unset | Self::Unspecified => None,
        }
    }
}

impl Preference<String> {
    /// Classify a raw single-valued answer.
    pub fn from_text(value: impl Into<String>) -> Self {
        let value = value.into();
        if is_unspecified(&value) {
            Self::Unspecified
        } else {
            Self::Value(value)
        }
    }
}

impl Preference<Vec<String>> {
    /// Classify a raw purpose list.
    pub fn from_list(values: Vec<String>) -> Self {
        if is_unspecified_list(&values) {
            Self::Unspecified
        } else {
            Self::Value(values)
        }
    }
}

// ---------------------------------------------------------------------------
// PreferenceRecord
// ---------------------------------------------------------------------------

/// The preferences collected during one conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceRecord {
    /// Use-cases, e.g. `["gaming", "coding"]`.
    pub purpose: Preference<Vec<String>>,
    /// Processor, e.g. `"Intel i7"`.
    pub processor: Preference<String>,
    /// Memory, e.g. `"16GB"`.
    pub ram: Preference<String>,
    /// Storage, e.g. `"512GB SSD"`.
    pub storage: Preference<String>,
    /// Graphics, e.g. `"RTX 4060"`.
    pub graphics: Preference<String>,
    /// Display, e.g. `"15.6 inch OLED"`.
    pub display: Preference<String>,
    /// Budget, e.g. `"$1000-$1300"`.
    pub price_range: Preference<String>,
}

impl PreferenceRecord {
    /// An all-unset record.
    pub fn new() -> Self {
        Self::default()
    }

    /// State of a single field.
    pub fn state(&self, field: PreferenceField) -> FieldState {
        match self.scalar(field) {
            Some(value) => value.state(),
            None => self.purpose.state(),
        }
    }

    /// Single-valued field accessor; `None` for [`PreferenceField::Purpose`].
    pub fn scalar(&self, field: PreferenceField) -> Option<&Preference<String>> {
        match field {
            PreferenceField::Purpose => None,
            PreferenceField::Processor => Some(&self.processor),
            PreferenceField::Ram => Some(&self.ram),
            PreferenceField::Storage => Some(&self.storage),
            PreferenceField::Graphics => Some(&self.graphics),
            PreferenceField::Display => Some(&self.display),
            PreferenceField::PriceRange => Some(&self.price_range),
        }
    }

    /// Mutable single-valued field accessor; `None` for `purpose`.
    pub fn scalar_mut(&mut self, field: PreferenceField) -> Option<&mut Preference<String>> {
        match field {
            PreferenceField::Purpose => None,
            PreferenceField::Processor => Some(&mut self.processor),
            PreferenceField::Ram => Some(&mut self.ram),
            PreferenceField::Storage => Some(&mut self.storage),
            PreferenceField::Graphics => Some(&mut self.graphics),
            PreferenceField::Display => Some(&mut self.display),
            PreferenceField::PriceRange => Some(&mut self.price_range),
        }
    }

    /// Fields that were never provided, in fixed order.
    ///
    /// Unspecified fields are not listed. An empty result means the record
    /// is ready to search.
    pub fn missing_fields(&self) -> Vec<PreferenceField> {
        PreferenceField::ALL
            .into_iter()
            .filter(|field| self.state(*field) == FieldState::Unset)
            .collect()
    }

    /// True when no field is unset.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Apply `patch` in place.
    ///
    /// Each field present in the patch replaces the stored value wholesale;
    /// a new purpose list replaces the old one rather than appending.
    /// Absent fields are left alone, so no field ever returns to unset.
    pub fn update(&mut self, patch: &PreferencePatch) {
        if let Some(purpose) = &patch.purpose {
            self.purpose = Preference::from_list(purpose.clone());
        }
        for field in PreferenceField::SCALARS {
            if let (Some(value), Some(slot)) = (patch.scalar(field), self.scalar_mut(field)) {
                *slot = Preference::from_text(value);
            }
        }
    }

    /// Copy-on-write counterpart of [`update`](Self::update).
    #[must_use]
    pub fn apply(&self, patch: &PreferencePatch) -> Self {
        let mut next = self.clone();
        next.update(patch);
        next
    }
}

// ---------------------------------------------------------------------------
// PreferencePatch
// ---------------------------------------------------------------------------

/// Errors decoding a patch at the JSON boundary.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    /// The patch document was not a JSON object.
    #[error("preference patch must be a JSON object")]
    NotAnObject,
    /// A field carried a value of the wrong type, or the text was not JSON.
    #[error("invalid preference patch: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// A partial set of field assignments. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferencePatch {
    /// Full replacement purpose list. A bare string is accepted as a
    /// one-element list.
    #[serde(
        default,
        deserialize_with = "deserialize_purpose",
        skip_serializing_if = "Option::is_none"
    )]
    pub purpose: Option<Vec<String>>,
    /// New processor value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processor: Option<String>,
    /// New RAM value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram: Option<String>,
    /// New storage value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
    /// New graphics value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graphics: Option<String>,
    /// New display value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    /// New budget value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn deserialize_purpose<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<OneOrMany>::deserialize(deserializer)?;
    Ok(raw.map(|value| match value {
        OneOrMany::One(single) => vec![single],
        OneOrMany::Many(list) => list,
    }))
}

impl PreferencePatch {
    /// An empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a patch from a JSON value. Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::NotAnObject`] for non-object input and
    /// [`PatchError::Invalid`] when a field has the wrong JSON type.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, PatchError> {
        if !value.is_object() {
            return Err(PatchError::NotAnObject);
        }
        Ok(Self::deserialize(value)?)
    }

    /// Decode a patch from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError`] if the text is not a valid patch object.
    pub fn from_json_str(text: &str) -> Result<Self, PatchError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Set the purpose list.
    #[must_use]
    pub fn with_purpose<I, S>(mut self, purposes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.purpose = Some(purposes.into_iter().map(Into::into).collect());
        self
    }

    /// Set a single-valued field. Setting `purpose` this way stores a
    /// one-element list.
    #[must_use]
    pub fn with(mut self, field: PreferenceField, value: impl Into<String>) -> Self {
        let value = Some(value.into());
        match field {
            PreferenceField::Purpose => self.purpose = value.map(|v| vec![v]),
            PreferenceField::Processor => self.processor = value,
            PreferenceField::Ram => self.ram = value,
            PreferenceField::Storage => self.storage = value,
            PreferenceField::Graphics => self.graphics = value,
            PreferenceField::Display => self.display = value,
            PreferenceField::PriceRange => self.price_range = value,
        }
        self
    }

    /// Value assigned to a single-valued field, if any.
    pub fn scalar(&self, field: PreferenceField) -> Option<&str> {
        let value = match field {
            PreferenceField::Purpose => None,
            PreferenceField::Processor => self.processor.as_ref(),
            PreferenceField::Ram => self.ram.as_ref(),
            PreferenceField::Storage => self.storage.as_ref(),
            PreferenceField::Graphics => self.graphics.as_ref(),
            PreferenceField::Display => self.display.as_ref(),
            PreferenceField::PriceRange => self.price_range.as_ref(),
        };
        value.map(String::as_str)
    }

    /// Fields this patch assigns, in fixed order.
    pub fn fields(&self) -> Vec<PreferenceField> {
        PreferenceField::ALL
            .into_iter()
            .filter(|field| match field {
                PreferenceField::Purpose => self.purpose.is_some(),
                other => self.scalar(*other).is_some(),
            })
            .collect()
    }

    /// True when the patch assigns nothing.
    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }
}
