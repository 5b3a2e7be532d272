//! Shared prompt service.
//!
//! Saves drafts to the shared database under a content-derived slug. Saving
//! is idempotent per `(session_id, fingerprint)`: a session that saves the
//! same content twice gets its existing slug back. Another session saving the
//! same content gets a fresh row whose slug is suffixed `-2`, `-3`, ...

use chrono::Utc;
use uuid::Uuid;

use prompt_builder_types::draft::PromptDraft;
use prompt_builder_types::error::{RepositoryError, ShareError};
use prompt_builder_types::share::{SaveOutcome, SaveStatus, SharedPrompt};

use crate::fingerprint::{canonical_draft, prompt_slug};
use crate::repository::shared_prompt::SharedPromptRepository;
use crate::service::hash::ContentHasher;

/// Highest numeric suffix tried before giving up on a slug.
const MAX_SLUG_SUFFIX: u32 = 100;

/// Service for saving and looking up shared prompts.
///
/// Generic over repository and hasher traits -- prompt-builder-core never
/// depends on prompt-builder-infra.
pub struct SharePromptService<R: SharedPromptRepository, H: ContentHasher> {
    repo: R,
    hasher: H,
}

impl<R: SharedPromptRepository, H: ContentHasher> SharePromptService<R, H> {
    pub fn new(repo: R, hasher: H) -> Self {
        Self { repo, hasher }
    }

    /// The draft as it is stored, with its fingerprint as id.
    pub fn canonicalize(&self, draft: &PromptDraft) -> PromptDraft {
        canonical_draft(draft, &self.hasher)
    }

    /// Save a draft on behalf of a session.
    ///
    /// Validates the draft first. Returns the existing slug with
    /// `SaveStatus::Existing` when this session already saved identical
    /// content.
    pub async fn save(
        &self,
        draft: &PromptDraft,
        session_id: &str,
    ) -> Result<SaveOutcome, ShareError> {
        draft.validate()?;

        let canonical = self.canonicalize(draft);
        let fingerprint = canonical.id.clone().unwrap_or_default();
        let base_slug = prompt_slug(&canonical, &fingerprint);

        // The lookup is a fast path. The repository's uniqueness on slug and
        // (session_id, fingerprint) decides races between concurrent saves.
        for _ in 0..MAX_SLUG_SUFFIX {
            if let Some(existing) = self.existing(session_id, &fingerprint).await? {
                return Ok(existing);
            }

            let prompt = SharedPrompt {
                id: Uuid::now_v7(),
                slug: self.ensure_unique_slug(&base_slug).await?,
                session_id: session_id.to_string(),
                fingerprint: fingerprint.clone(),
                draft: canonical.clone(),
                created_at: Utc::now(),
            };

            match self.repo.insert(&prompt).await {
                Ok(saved) => {
                    tracing::info!(slug = %saved.slug, "saved shared prompt");
                    return Ok(SaveOutcome {
                        slug: saved.slug,
                        status: SaveStatus::Created,
                    });
                }
                Err(RepositoryError::Conflict(reason)) => {
                    tracing::debug!(slug = %prompt.slug, %reason, "shared prompt insert lost a race");
                }
                Err(err) => return Err(storage_error(err)),
            }
        }

        Err(ShareError::SlugExhausted(base_slug))
    }

    /// The outcome for content this session already saved, if any.
    async fn existing(
        &self,
        session_id: &str,
        fingerprint: &str,
    ) -> Result<Option<SaveOutcome>, ShareError> {
        let existing = self
            .repo
            .find_by_session_fingerprint(session_id, fingerprint)
            .await
            .map_err(storage_error)?;

        Ok(existing.map(|prompt| {
            tracing::debug!(slug = %prompt.slug, "prompt already saved by this session");
            SaveOutcome {
                slug: prompt.slug,
                status: SaveStatus::Existing,
            }
        }))
    }

    /// Look up the most recent saved prompt with the draft's content.
    pub async fn get_by_fingerprint(
        &self,
        draft: &PromptDraft,
    ) -> Result<Option<SharedPrompt>, ShareError> {
        let canonical = self.canonicalize(draft);
        let fingerprint = canonical.id.unwrap_or_default();
        self.repo
            .get_by_fingerprint(&fingerprint)
            .await
            .map_err(storage_error)
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<SharedPrompt>, ShareError> {
        self.repo.get_by_slug(slug).await.map_err(storage_error)
    }

    pub async fn list_recent(&self, limit: u32) -> Result<Vec<SharedPrompt>, ShareError> {
        self.repo.list_recent(limit).await.map_err(storage_error)
    }

    /// Ensure a slug is unique by appending -2, -3, etc. if needed.
    async fn ensure_unique_slug(&self, base_slug: &str) -> Result<String, ShareError> {
        let mut slug = base_slug.to_string();
        let mut counter = 2;

        loop {
            let existing = self.repo.get_by_slug(&slug).await.map_err(storage_error)?;
            if existing.is_none() {
                return Ok(slug);
            }

            if counter > MAX_SLUG_SUFFIX {
                return Err(ShareError::SlugExhausted(base_slug.to_string()));
            }
            slug = format!("{base_slug}-{counter}");
            counter += 1;
        }
    }
}

fn storage_error(err: RepositoryError) -> ShareError {
    ShareError::StorageError(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::HexHasher;
    use prompt_builder_types::draft::NOT_FINISHED;
    use prompt_builder_types::error::ValidationError;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory fake with the same uniqueness rules as the SQLite table.
    ///
    /// The `stale_*` counters make the next N lookups miss, as if another
    /// writer committed between this caller's read and its insert.
    #[derive(Default)]
    struct MemoryRepo {
        rows: Mutex<Vec<SharedPrompt>>,
        stale_session_reads: AtomicUsize,
        stale_slug_reads: AtomicUsize,
    }

    fn take_stale(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    impl SharedPromptRepository for MemoryRepo {
        async fn insert(&self, prompt: &SharedPrompt) -> Result<SharedPrompt, RepositoryError> {
            let mut rows = self.rows.lock().unwrap();
            if rows.iter().any(|r| r.slug == prompt.slug) {
                return Err(RepositoryError::Conflict(prompt.slug.clone()));
            }
            if rows
                .iter()
                .any(|r| r.session_id == prompt.session_id && r.fingerprint == prompt.fingerprint)
            {
                return Err(RepositoryError::Conflict(prompt.fingerprint.clone()));
            }
            rows.push(prompt.clone());
            Ok(prompt.clone())
        }

        async fn find_by_session_fingerprint(
            &self,
            session_id: &str,
            fingerprint: &str,
        ) -> Result<Option<SharedPrompt>, RepositoryError> {
            if take_stale(&self.stale_session_reads) {
                return Ok(None);
            }
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .iter()
                .find(|r| r.session_id == session_id && r.fingerprint == fingerprint)
                .cloned())
        }

        async fn get_by_fingerprint(
            &self,
            fingerprint: &str,
        ) -> Result<Option<SharedPrompt>, RepositoryError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows.iter().rev().find(|r| r.fingerprint == fingerprint).cloned())
        }

        async fn get_by_slug(&self, slug: &str) -> Result<Option<SharedPrompt>, RepositoryError> {
            if take_stale(&self.stale_slug_reads) {
                return Ok(None);
            }
            let rows = self.rows.lock().unwrap();
            Ok(rows.iter().find(|r| r.slug == slug).cloned())
        }

        async fn list_recent(&self, limit: u32) -> Result<Vec<SharedPrompt>, RepositoryError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows.iter().rev().take(limit as usize).cloned().collect())
        }
    }

    fn service() -> SharePromptService<MemoryRepo, HexHasher> {
        SharePromptService::new(MemoryRepo::default(), HexHasher)
    }

    fn draft() -> PromptDraft {
        PromptDraft {
            ai_role: "Coach".to_string(),
            task_intent: "Write an email".to_string(),
            examples: "foo".to_string(),
            step: 4,
            updated_at: 1_700_000_000_000,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_save_creates_slug() {
        let svc = service();
        let outcome = svc.save(&draft(), "session-a").await.unwrap();
        assert_eq!(outcome.status, SaveStatus::Created);
        assert!(outcome.slug.starts_with("coach-write-an-email-"));
    }

    #[tokio::test]
    async fn test_save_is_idempotent_per_session() {
        let svc = service();
        let first = svc.save(&draft(), "session-a").await.unwrap();

        let mut later = draft();
        later.step = 1;
        later.updated_at += 60_000;
        let second = svc.save(&later, "session-a").await.unwrap();

        assert_eq!(second.status, SaveStatus::Existing);
        assert_eq!(second.slug, first.slug);
        assert_eq!(svc.list_recent(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_other_session_gets_suffixed_slug() {
        let svc = service();
        let first = svc.save(&draft(), "session-a").await.unwrap();
        let second = svc.save(&draft(), "session-b").await.unwrap();
        let third = svc.save(&draft(), "session-c").await.unwrap();

        assert_eq!(second.status, SaveStatus::Created);
        assert_eq!(second.slug, format!("{}-2", first.slug));
        assert_eq!(third.slug, format!("{}-3", first.slug));
    }

    #[tokio::test]
    async fn test_same_session_race_returns_existing() {
        let svc = service();
        let first = svc.save(&draft(), "session-a").await.unwrap();

        svc.repo.stale_session_reads.store(1, Ordering::SeqCst);
        svc.repo.stale_slug_reads.store(1, Ordering::SeqCst);
        let second = svc.save(&draft(), "session-a").await.unwrap();

        assert_eq!(second.status, SaveStatus::Existing);
        assert_eq!(second.slug, first.slug);
        assert_eq!(svc.repo.rows.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_slug_race_retries_with_next_suffix() {
        let svc = service();
        let first = svc.save(&draft(), "session-a").await.unwrap();

        svc.repo.stale_slug_reads.store(1, Ordering::SeqCst);
        let second = svc.save(&draft(), "session-b").await.unwrap();

        assert_eq!(second.status, SaveStatus::Created);
        assert_eq!(second.slug, format!("{}-2", first.slug));
    }

    #[tokio::test]
    async fn test_save_rejects_invalid_drafts() {
        let svc = service();

        let mut empty = draft();
        empty.task_intent = " ".to_string();
        assert!(matches!(
            svc.save(&empty, "s").await,
            Err(ShareError::Validation(ValidationError::EmptyTaskIntent))
        ));

        let mut untouched = draft();
        untouched.updated_at = -1;
        assert!(matches!(
            svc.save(&untouched, "s").await,
            Err(ShareError::Validation(ValidationError::Untouched))
        ));
    }

    #[tokio::test]
    async fn test_stored_draft_is_canonical() {
        let svc = service();
        let outcome = svc.save(&draft(), "session-a").await.unwrap();
        let stored = svc.get_by_slug(&outcome.slug).await.unwrap().unwrap();

        assert_eq!(stored.draft.step, 1);
        assert_eq!(stored.draft.examples, "foo");
        assert_eq!(stored.draft.finished_at, NOT_FINISHED);
        assert_eq!(stored.draft.id.as_deref(), Some(stored.fingerprint.as_str()));
    }

    #[tokio::test]
    async fn test_examples_change_the_saved_prompt() {
        let svc = service();
        let first = svc.save(&draft(), "session-a").await.unwrap();

        let mut other = draft();
        other.examples = "bar".to_string();
        let second = svc.save(&other, "session-a").await.unwrap();

        assert_eq!(second.status, SaveStatus::Created);
        assert_ne!(second.slug, first.slug);
    }

    #[tokio::test]
    async fn test_get_by_fingerprint_ignores_session_fields() {
        let svc = service();
        svc.save(&draft(), "session-a").await.unwrap();

        let mut lookup = draft();
        lookup.step = 2;
        lookup.id = Some("local".to_string());
        assert!(svc.get_by_fingerprint(&lookup).await.unwrap().is_some());

        lookup.task_intent = "Something else".to_string();
        assert!(svc.get_by_fingerprint(&lookup).await.unwrap().is_none());
        assert!(svc.get_by_slug("missing").await.unwrap().is_none());
    }
}
