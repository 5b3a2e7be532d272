//! Bounded local prompt store with LRU eviction and fuzzy deduplication.
//!
//! `PromptStoreRepository` owns an injected [`StorageBackend`] and does a
//! whole-store read-modify-write on every mutation. The transformations
//! themselves (`decode_store`, `encode_store`, `apply_upsert`) are pure, so
//! I/O stays at the edges.
//!
//! Persistence is best-effort: an unreadable store loads as empty and a
//! failed write is logged and dropped. Concurrent writers are not
//! coordinated; the last save wins.

use serde_json::Value;
use uuid::Uuid;

use prompt_builder_types::config::StoreSettings;
use prompt_builder_types::draft::PromptDraft;
use prompt_builder_types::store::{
    PromptStore, STORE_VERSION, SkipReason, StoredPromptRecord, UpsertOutcome,
};

use crate::codec::projection::draft_from_value_lenient;
use crate::codec::text;
use crate::store::backend::StorageBackend;
use crate::store::dedup::find_match;

/// Storage key for the v2 prompt list.
pub const STORE_KEY: &str = "prompt_builder.prompts.v2";

/// Repository over the persisted prompt list.
pub struct PromptStoreRepository<B: StorageBackend> {
    backend: B,
    settings: StoreSettings,
}

impl<B: StorageBackend> PromptStoreRepository<B> {
    /// Create a repository with default settings (15 entries, threshold 10).
    pub fn new(backend: B) -> Self {
        Self::with_settings(backend, StoreSettings::default())
    }

    pub fn with_settings(backend: B, settings: StoreSettings) -> Self {
        Self { backend, settings }
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Load the store, degrading to an empty one on any failure.
    pub fn load(&self) -> PromptStore {
        match self.backend.get_item(STORE_KEY) {
            Ok(Some(raw)) => decode_store(&raw),
            Ok(None) => PromptStore::default(),
            Err(err) => {
                tracing::warn!("prompt store unavailable, starting empty: {err}");
                PromptStore::default()
            }
        }
    }

    /// Persist the most recent `max_entries` records. Failures are swallowed.
    pub fn save(&self, store: &PromptStore) {
        let encoded = encode_store(store, self.settings.max_entries);
        if let Err(err) = self.backend.set_item(STORE_KEY, &encoded) {
            tracing::warn!("failed to persist prompt store: {err}");
        }
    }

    /// Insert a draft, or replace the record it duplicates.
    ///
    /// Drafts without a task intent and untouched drafts are skipped and
    /// reported through the outcome.
    pub fn upsert(&self, draft: PromptDraft, creator_id: &str) -> UpsertOutcome {
        if let Some(reason) = skip_reason(&draft) {
            tracing::debug!(?reason, "skipping prompt store upsert");
            return UpsertOutcome::Skipped(reason);
        }

        let mut store = self.load();
        let outcome = apply_upsert(
            &mut store,
            draft,
            creator_id,
            self.settings.fuzzy_distance_threshold,
        );
        self.save(&store);
        outcome
    }

    /// Remove the record with the given identifier.
    ///
    /// Returns `false` (and writes nothing) when no record has that id.
    pub fn delete(&self, id: &str) -> bool {
        let mut store = self.load();
        let Some(index) = store.position_of(id) else {
            return false;
        };
        store.prompts.remove(index);
        self.save(&store);
        true
    }

    /// All records, most recently touched first.
    pub fn list(&self) -> Vec<StoredPromptRecord> {
        let mut prompts = self.load().prompts;
        prompts.reverse();
        prompts
    }

    pub fn get(&self, id: &str) -> Option<StoredPromptRecord> {
        self.load().prompts.into_iter().find(|r| r.id() == Some(id))
    }
}

fn skip_reason(draft: &PromptDraft) -> Option<SkipReason> {
    if !draft.has_task_intent() {
        Some(SkipReason::EmptyTaskIntent)
    } else if draft.is_untouched() {
        Some(SkipReason::Untouched)
    } else {
        None
    }
}

/// Fresh record identifier, distinct from any content fingerprint.
fn new_record_id() -> String {
    Uuid::now_v7().to_string()
}

/// Parse raw persisted bytes into a store.
///
/// Undecompressable or malformed input yields an empty store. Individual
/// records that fail to parse are dropped, as are junk records (no task
/// intent, or never touched).
pub fn decode_store(raw: &str) -> PromptStore {
    let json = text::decompress(raw);
    if json.is_empty() {
        if !raw.is_empty() {
            tracing::warn!("prompt store could not be decompressed, starting empty");
        }
        return PromptStore::default();
    }

    let value: Value = match serde_json::from_str(&json) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!("prompt store is not valid JSON, starting empty: {err}");
            return PromptStore::default();
        }
    };

    let Some(map) = value.as_object() else {
        tracing::warn!("prompt store is not a JSON object, starting empty");
        return PromptStore::default();
    };

    let version = map
        .get("version")
        .and_then(Value::as_str)
        .unwrap_or(STORE_VERSION)
        .to_string();

    let prompts = map
        .get("prompts")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let record = record_from_value(item);
                    if record.is_none() {
                        tracing::debug!("dropping stored prompt without a data object");
                    }
                    record
                })
                .filter(|record| record.data.is_persistable())
                .collect()
        })
        .unwrap_or_default();

    PromptStore { version, prompts }
}

/// Read one record, merging its draft field by field so a single stale value
/// falls back to its default instead of losing the record.
fn record_from_value(item: &Value) -> Option<StoredPromptRecord> {
    let map = item.as_object()?;
    let data = map.get("data").filter(|data| data.is_object())?;

    let mut record = StoredPromptRecord::new(
        draft_from_value_lenient(data),
        map.get("creatorId").and_then(Value::as_str).unwrap_or_default(),
    );
    if let Some(version) = map.get("storageVersion").and_then(Value::as_str) {
        record.storage_version = version.to_string();
    }
    Some(record)
}

/// Serialize and compress the last `max_entries` records.
pub fn encode_store(store: &PromptStore, max_entries: usize) -> String {
    let start = store.prompts.len().saturating_sub(max_entries);
    let trimmed = PromptStore {
        version: store.version.clone(),
        prompts: store.prompts[start..].to_vec(),
    };
    match serde_json::to_string(&trimmed) {
        Ok(json) => text::compress(&json),
        Err(err) => {
            tracing::error!("failed to serialize prompt store: {err}");
            String::new()
        }
    }
}

/// Merge a draft into an in-memory store.
///
/// Replaces the matching record in place or appends a new one, assigns ids to
/// any record lacking one, then orders the list oldest to newest by
/// `updatedAt`. Eviction happens later, in [`encode_store`].
pub fn apply_upsert(
    store: &mut PromptStore,
    draft: PromptDraft,
    creator_id: &str,
    fuzzy_distance_threshold: usize,
) -> UpsertOutcome {
    let matched = find_match(&store.prompts, &draft, fuzzy_distance_threshold);
    let mut record = StoredPromptRecord::new(draft, creator_id);

    let (index, updated) = match matched {
        Some((index, kind)) => {
            if record.id().is_none() {
                record.data.id = store.prompts[index].id().map(str::to_string);
            }
            tracing::debug!(index, ?kind, "replacing stored prompt");
            store.prompts[index] = record;
            (index, true)
        }
        None => {
            store.prompts.push(record);
            (store.prompts.len() - 1, false)
        }
    };

    for record in &mut store.prompts {
        if record.id().is_none() {
            record.data.id = Some(new_record_id());
        }
    }

    let id = store.prompts[index].id().unwrap_or_default().to_string();
    store.prompts.sort_by_key(|r| r.data.updated_at);

    if updated {
        UpsertOutcome::Updated { id }
    } else {
        UpsertOutcome::Inserted { id }
    }
}
