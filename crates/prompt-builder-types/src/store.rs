//! Local prompt store types.
//!
//! A `PromptStore` is the bounded, recency-ordered list of a user's drafts
//! that lives in client-side storage. Position is recency: the first record
//! is the least recently touched, the last one the most recent.

use serde::{Deserialize, Serialize};

use crate::draft::PromptDraft;

/// Version tag written with every store and record.
pub const STORE_VERSION: &str = "v2";

/// Maximum number of records kept in a store.
pub const DEFAULT_MAX_ENTRIES: usize = 15;

/// Edit distance below which two drafts count as the same prompt.
pub const DEFAULT_FUZZY_DISTANCE_THRESHOLD: usize = 10;

fn default_store_version() -> String {
    STORE_VERSION.to_string()
}

/// A single persisted draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPromptRecord {
    pub data: PromptDraft,
    /// Session or user that created the record. Display only.
    #[serde(rename = "creatorId", default)]
    pub creator_id: String,
    #[serde(rename = "storageVersion", default = "default_store_version")]
    pub storage_version: String,
}

impl StoredPromptRecord {
    pub fn new(data: PromptDraft, creator_id: impl Into<String>) -> Self {
        Self {
            data,
            creator_id: creator_id.into(),
            storage_version: default_store_version(),
        }
    }

    /// The record's identifier, if one has been assigned.
    pub fn id(&self) -> Option<&str> {
        self.data.id.as_deref().filter(|id| !id.is_empty())
    }
}

/// The full persisted collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptStore {
    #[serde(default = "default_store_version")]
    pub version: String,
    #[serde(default)]
    pub prompts: Vec<StoredPromptRecord>,
}

impl Default for PromptStore {
    fn default() -> Self {
        Self {
            version: default_store_version(),
            prompts: Vec::new(),
        }
    }
}

impl PromptStore {
    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    /// Position of the record with the given identifier.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.prompts.iter().position(|r| r.id() == Some(id))
    }
}

/// Why an upsert did not touch the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The draft has no task intent.
    EmptyTaskIntent,
    /// The draft was never edited by the user.
    Untouched,
}

/// Result of upserting a draft into the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new record was appended.
    Inserted { id: String },
    /// An existing record (same id, same content, or a near-duplicate) was replaced.
    Updated { id: String },
    /// Nothing was written.
    Skipped(SkipReason),
}

impl UpsertOutcome {
    /// Identifier of the record that was written, if any.
    pub fn id(&self) -> Option<&str> {
        match self {
            UpsertOutcome::Inserted { id } | UpsertOutcome::Updated { id } => Some(id),
            UpsertOutcome::Skipped(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_missing_version_defaults() {
        let store: PromptStore = serde_json::from_str(r#"{"prompts":[]}"#).unwrap();
        assert_eq!(store.version, "v2");
        assert!(store.is_empty());
    }

    #[test]
    fn test_record_wire_names() {
        let record = StoredPromptRecord::new(PromptDraft::new(), "session-1");
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"creatorId\":\"session-1\""));
        assert!(json.contains("\"storageVersion\":\"v2\""));
    }

    #[test]
    fn test_record_id_ignores_empty_string() {
        let mut draft = PromptDraft::new();
        draft.id = Some(String::new());
        let record = StoredPromptRecord::new(draft, "s");
        assert!(record.id().is_none());
    }

    #[test]
    fn test_position_of() {
        let mut a = PromptDraft::new();
        a.id = Some("a".to_string());
        let mut b = PromptDraft::new();
        b.id = Some("b".to_string());
        let store = PromptStore {
            prompts: vec![StoredPromptRecord::new(a, "s"), StoredPromptRecord::new(b, "s")],
            ..Default::default()
        };
        assert_eq!(store.position_of("b"), Some(1));
        assert_eq!(store.position_of("c"), None);
    }

    #[test]
    fn test_upsert_outcome_id() {
        let outcome = UpsertOutcome::Updated { id: "x".to_string() };
        assert_eq!(outcome.id(), Some("x"));
        assert_eq!(UpsertOutcome::Skipped(SkipReason::Untouched).id(), None);
    }
}
