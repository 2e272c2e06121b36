//! Per-conversation preference storage.
//!
//! Each conversation gets its own isolated [`PreferenceRecord`] keyed by a
//! [`SessionId`]. The store serialises writers per store, so concurrent
//! conversations can share one instance.

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::preferences::{
    build_search_text, encode, PreferenceField, PreferencePatch, PreferenceRecord,
};

/// Identifier of one conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// A fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The identifier as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// What the orchestrator sees after each update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOutcome {
    /// The whole record, encoded as JSON text.
    pub preferences_json: String,
    /// Search text for the record.
    pub search_text: String,
    /// Fields still unset, in fixed order.
    pub missing_fields: Vec<PreferenceField>,
}

impl UpdateOutcome {
    /// Summarise `record`.
    pub fn from_record(record: &PreferenceRecord) -> Self {
        Self {
            preferences_json: encode(record),
            search_text: build_search_text(record),
            missing_fields: record.missing_fields(),
        }
    }

    /// True when nothing is left to ask.
    pub fn is_ready(&self) -> bool {
        self.missing_fields.is_empty()
    }
}

/// Errors from [`PreferenceStore`].
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A writer panicked while holding the store lock.
    #[error("preference store lock poisoned")]
    Poisoned,
}

#[derive(Debug, Clone)]
struct SessionEntry {
    record: PreferenceRecord,
    updated_at: DateTime<Utc>,
}

impl SessionEntry {
    fn new() -> Self {
        Self {
            record: PreferenceRecord::new(),
            updated_at: Utc::now(),
        }
    }
}

/// Preference records for all live conversations.
#[derive(Default)]
pub struct PreferenceStore {
    sessions: RwLock<HashMap<SessionId, SessionEntry>>,
}

impl fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("session_count", &self.len())
            .finish()
    }
}

impl PreferenceStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new conversation with an empty record.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Poisoned`] if the store lock is poisoned.
    pub fn open(&self) -> Result<SessionId, SessionError> {
        let id = SessionId::generate();
        let mut sessions = self.sessions.write().map_err(|_| SessionError::Poisoned)?;
        sessions.insert(id.clone(), SessionEntry::new());
        info!(session = %id, "preference session opened");
        Ok(id)
    }

    /// Apply `patch` to the session's record, creating the session on first
    /// use, and summarise the result.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Poisoned`] if the store lock is poisoned.
    pub fn update(
        &self,
        id: &SessionId,
        patch: &PreferencePatch,
    ) -> Result<UpdateOutcome, SessionError> {
        let mut sessions = self.sessions.write().map_err(|_| SessionError::Poisoned)?;
        let entry = sessions.entry(id.clone()).or_insert_with(SessionEntry::new);
        entry.record.update(patch);
        entry.updated_at = Utc::now();

        let outcome = UpdateOutcome::from_record(&entry.record);
        debug!(
            session = %id,
            fields = ?patch.fields(),
            missing = ?outcome.missing_fields,
            "preferences updated"
        );
        Ok(outcome)
    }

    /// Copy of the session's current record.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Poisoned`] if the store lock is poisoned.
    pub fn snapshot(&self, id: &SessionId) -> Result<Option<PreferenceRecord>, SessionError> {
        let sessions = self.sessions.read().map_err(|_| SessionError::Poisoned)?;
        Ok(sessions.get(id).map(|entry| entry.record.clone()))
    }

    /// When the session was last changed.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Poisoned`] if the store lock is poisoned.
    pub fn last_updated(&self, id: &SessionId) -> Result<Option<DateTime<Utc>>, SessionError> {
        let sessions = self.sessions.read().map_err(|_| SessionError::Poisoned)?;
        Ok(sessions.get(id).map(|entry| entry.updated_at))
    }

    /// Return the session to an all-unset record. Returns `false` if the
    /// session does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Poisoned`] if the store lock is poisoned.
    pub fn reset(&self, id: &SessionId) -> Result<bool, SessionError> {
        let mut sessions = self.sessions.write().map_err(|_| SessionError::Poisoned)?;
        let Some(entry) = sessions.get_mut(id) else {
            return Ok(false);
        };
        *entry = SessionEntry::new();
        info!(session = %id, "preference session reset");
        Ok(true)
    }

    /// Discard the session. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Poisoned`] if the store lock is poisoned.
    pub fn remove(&self, id: &SessionId) -> Result<bool, SessionError> {
        let mut sessions = self.sessions.write().map_err(|_| SessionError::Poisoned)?;
        let removed = sessions.remove(id).is_some();
        if removed {
            info!(session = %id, "preference session removed");
        }
        Ok(removed)
    }

    /// Number of live sessions (0 if the lock is poisoned).
    pub fn len(&self) -> usize {
        match self.sessions.read() {
            Ok(sessions) => sessions.len(),
            Err(_) => 0,
        }
    }

    /// True when no session is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
