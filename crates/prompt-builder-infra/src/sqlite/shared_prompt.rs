//! SQLite shared prompt repository implementation.
//!
//! Implements `SharedPromptRepository` from `prompt-builder-core` using sqlx
//! with split read/write pools. The draft is stored as JSON text.

use prompt_builder_core::repository::shared_prompt::SharedPromptRepository;
use prompt_builder_types::draft::PromptDraft;
use prompt_builder_types::error::RepositoryError;
use prompt_builder_types::share::SharedPrompt;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `SharedPromptRepository`.
pub struct SqliteSharedPromptRepository {
    pool: DatabasePool,
}

impl SqliteSharedPromptRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(
        &self,
        sql: &str,
        binds: &[&str],
    ) -> Result<Option<SharedPrompt>, RepositoryError> {
        let mut query = sqlx::query(sql);
        for bind in binds {
            query = query.bind(*bind);
        }
        let row = query
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.map(|row| {
            SharedPromptRow::from_row(&row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?
                .into_prompt()
        })
        .transpose()
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct SharedPromptRow {
    id: String,
    slug: String,
    session_id: String,
    fingerprint: String,
    draft: String,
    created_at: String,
}

impl SharedPromptRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            slug: row.try_get("slug")?,
            session_id: row.try_get("session_id")?,
            fingerprint: row.try_get("fingerprint")?,
            draft: row.try_get("draft")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_prompt(self) -> Result<SharedPrompt, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid prompt id: {e}")))?;
        let draft: PromptDraft = serde_json::from_str(&self.draft)
            .map_err(|e| RepositoryError::Query(format!("invalid draft JSON: {e}")))?;

        Ok(SharedPrompt {
            id,
            slug: self.slug,
            session_id: self.session_id,
            fingerprint: self.fingerprint,
            draft,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl SharedPromptRepository for SqliteSharedPromptRepository {
    async fn insert(&self, prompt: &SharedPrompt) -> Result<SharedPrompt, RepositoryError> {
        let draft_json = serde_json::to_string(&prompt.draft)
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let result = sqlx::query(
            "INSERT INTO shared_prompts (id, slug, session_id, fingerprint, draft, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(prompt.id.to_string())
        .bind(&prompt.slug)
        .bind(&prompt.session_id)
        .bind(&prompt.fingerprint)
        .bind(&draft_json)
        .bind(format_datetime(&prompt.created_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(prompt.clone()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => {
                if db_err.message().contains("shared_prompts.slug") {
                    Err(RepositoryError::Conflict(format!(
                        "slug '{}' already exists",
                        prompt.slug
                    )))
                } else {
                    Err(RepositoryError::Conflict(format!(
                        "session '{}' already saved {}",
                        prompt.session_id, prompt.fingerprint
                    )))
                }
            }
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn find_by_session_fingerprint(
        &self,
        session_id: &str,
        fingerprint: &str,
    ) -> Result<Option<SharedPrompt>, RepositoryError> {
        self.fetch_one_where(
            "SELECT * FROM shared_prompts WHERE session_id = ? AND fingerprint = ?
             ORDER BY created_at ASC, id ASC LIMIT 1",
            &[session_id, fingerprint],
        )
        .await
    }

    async fn get_by_fingerprint(
        &self,
        fingerprint: &str,
    ) -> Result<Option<SharedPrompt>, RepositoryError> {
        self.fetch_one_where(
            "SELECT * FROM shared_prompts WHERE fingerprint = ?
             ORDER BY created_at DESC, id DESC LIMIT 1",
            &[fingerprint],
        )
        .await
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<SharedPrompt>, RepositoryError> {
        self.fetch_one_where("SELECT * FROM shared_prompts WHERE slug = ?", &[slug])
            .await
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<SharedPrompt>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM shared_prompts ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                SharedPromptRow::from_row(row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_prompt()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash::Sha256ContentHasher;
    use chrono::{Duration, Utc};
    use std::sync::Arc;
    use prompt_builder_core::service::share::SharePromptService;
    use prompt_builder_types::share::SaveStatus;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_path_buf();
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::open(&path).await.unwrap()
    }

    fn make_prompt(slug: &str, session: &str, fingerprint: &str) -> SharedPrompt {
        SharedPrompt {
            id: Uuid::now_v7(),
            slug: slug.to_string(),
            session_id: session.to_string(),
            fingerprint: fingerprint.to_string(),
            draft: PromptDraft {
                task_intent: "Write an email".to_string(),
                updated_at: 1_700_000_000_000,
                ..Default::default()
            },
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_by_slug() {
        let repo = SqliteSharedPromptRepository::new(test_pool().await);
        let prompt = make_prompt("coach-write-an-email-abc123", "s1", "abc123");
        repo.insert(&prompt).await.unwrap();

        let found = repo.get_by_slug(&prompt.slug).await.unwrap().unwrap();
        assert_eq!(found.id, prompt.id);
        assert_eq!(found.draft, prompt.draft);
        assert_eq!(found.created_at, prompt.created_at);
        assert!(repo.get_by_slug("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_slug_conflict() {
        let repo = SqliteSharedPromptRepository::new(test_pool().await);
        repo.insert(&make_prompt("same", "s1", "fp")).await.unwrap();
        let result = repo.insert(&make_prompt("same", "s2", "fp")).await;
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_session_fingerprint_conflict() {
        let repo = SqliteSharedPromptRepository::new(test_pool().await);
        repo.insert(&make_prompt("a", "s1", "fp")).await.unwrap();
        let result = repo.insert(&make_prompt("b", "s1", "fp")).await;
        assert!(matches!(result, Err(RepositoryError::Conflict(msg)) if msg.contains("s1")));
        assert_eq!(repo.list_recent(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_fingerprint_lookups() {
        let repo = SqliteSharedPromptRepository::new(test_pool().await);
        let older = SharedPrompt {
            created_at: Utc::now() - Duration::seconds(10),
            ..make_prompt("a", "s1", "fp")
        };
        let newer = make_prompt("a-2", "s2", "fp");
        repo.insert(&older).await.unwrap();
        repo.insert(&newer).await.unwrap();

        let by_session = repo.find_by_session_fingerprint("s1", "fp").await.unwrap().unwrap();
        assert_eq!(by_session.slug, "a");
        assert!(repo.find_by_session_fingerprint("s3", "fp").await.unwrap().is_none());

        let latest = repo.get_by_fingerprint("fp").await.unwrap().unwrap();
        assert_eq!(latest.slug, "a-2");

        let recent = repo.list_recent(10).await.unwrap();
        let slugs: Vec<&str> = recent.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a-2", "a"]);
    }

    #[tokio::test]
    async fn test_share_service_over_sqlite() {
        let repo = SqliteSharedPromptRepository::new(test_pool().await);
        let svc = SharePromptService::new(repo, Sha256ContentHasher::new());
        let draft = PromptDraft {
            ai_role: "Coach".to_string(),
            task_intent: "Write an email".to_string(),
            updated_at: 1_700_000_000_000,
            ..Default::default()
        };

        let first = svc.save(&draft, "s1").await.unwrap();
        let again = svc.save(&draft, "s1").await.unwrap();
        let other = svc.save(&draft, "s2").await.unwrap();

        assert_eq!(first.status, SaveStatus::Created);
        assert_eq!(again.status, SaveStatus::Existing);
        assert_eq!(again.slug, first.slug);
        assert_eq!(other.slug, format!("{}-2", first.slug));

        let stored = svc.get_by_slug(&first.slug).await.unwrap().unwrap();
        assert_eq!(stored.draft.id.as_deref(), Some(stored.fingerprint.as_str()));
        assert!(svc.get_by_fingerprint(&draft).await.unwrap().is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_saves_from_one_session() {
        let repo = SqliteSharedPromptRepository::new(test_pool().await);
        let svc = Arc::new(SharePromptService::new(repo, Sha256ContentHasher::new()));
        let draft = PromptDraft {
            ai_role: "Coach".to_string(),
            task_intent: "Write an email".to_string(),
            updated_at: 1_700_000_000_000,
            ..Default::default()
        };

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let svc = Arc::clone(&svc);
                let draft = draft.clone();
                tokio::spawn(async move { svc.save(&draft, "s1").await })
            })
            .collect();

        let mut outcomes = Vec::new();
        for handle in handles {
            outcomes.push(handle.await.unwrap().unwrap());
        }

        let created = outcomes
            .iter()
            .filter(|o| o.status == SaveStatus::Created)
            .count();
        assert_eq!(created, 1);
        assert!(outcomes.iter().all(|o| o.slug == outcomes[0].slug));
        assert_eq!(svc.list_recent(10).await.unwrap().len(), 1);
    }
}
