//! SQLite analysis cache.

use prompt_builder_core::repository::analysis::AnalysisRepository;
use prompt_builder_types::error::RepositoryError;
use prompt_builder_types::share::{AnalysisReport, PromptAnalysis};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `AnalysisRepository`.
pub struct SqliteAnalysisRepository {
    pool: DatabasePool,
}

impl SqliteAnalysisRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl AnalysisRepository for SqliteAnalysisRepository {
    async fn get(&self, fingerprint: &str) -> Result<Option<PromptAnalysis>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM prompt_analyses WHERE fingerprint = ?")
            .bind(fingerprint)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let query_err = |e: sqlx::Error| RepositoryError::Query(e.to_string());
        let score: i64 = row.try_get("score").map_err(query_err)?;
        let suggestions: String = row.try_get("suggestions").map_err(query_err)?;
        let created_at: String = row.try_get("created_at").map_err(query_err)?;

        Ok(Some(PromptAnalysis {
            fingerprint: row.try_get("fingerprint").map_err(query_err)?,
            report: AnalysisReport {
                score: u8::try_from(score)
                    .map_err(|e| RepositoryError::Query(format!("invalid score: {e}")))?,
                summary: row.try_get("summary").map_err(query_err)?,
                suggestions: serde_json::from_str(&suggestions)
                    .map_err(|e| RepositoryError::Query(format!("invalid suggestions JSON: {e}")))?,
            },
            created_at: parse_datetime(&created_at)?,
        }))
    }

    async fn put(&self, analysis: &PromptAnalysis) -> Result<(), RepositoryError> {
        let suggestions = serde_json::to_string(&analysis.report.suggestions)
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query(
            "INSERT INTO prompt_analyses (fingerprint, score, summary, suggestions, created_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(fingerprint) DO UPDATE SET
                score = excluded.score,
                summary = excluded.summary,
                suggestions = excluded.suggestions,
                created_at = excluded.created_at",
        )
        .bind(&analysis.fingerprint)
        .bind(i64::from(analysis.report.score))
        .bind(&analysis.report.summary)
        .bind(&suggestions)
        .bind(format_datetime(&analysis.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_path_buf();
        std::mem::forget(dir);
        DatabasePool::open(&path).await.unwrap()
    }

    fn analysis(score: u8, summary: &str) -> PromptAnalysis {
        PromptAnalysis {
            fingerprint: "fp".to_string(),
            report: AnalysisReport {
                score,
                summary: summary.to_string(),
                suggestions: vec!["Add an example".to_string()],
            },
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let repo = SqliteAnalysisRepository::new(test_pool().await);
        assert!(repo.get("fp").await.unwrap().is_none());

        repo.put(&analysis(72, "Clear task")).await.unwrap();
        let cached = repo.get("fp").await.unwrap().unwrap();
        assert_eq!(cached.report.score, 72);
        assert_eq!(cached.report.suggestions, vec!["Add an example"]);
    }

    #[tokio::test]
    async fn test_put_replaces_existing() {
        let repo = SqliteAnalysisRepository::new(test_pool().await);
        repo.put(&analysis(40, "Vague")).await.unwrap();
        repo.put(&analysis(90, "Sharp")).await.unwrap();

        let cached = repo.get("fp").await.unwrap().unwrap();
        assert_eq!(cached.report.score, 90);
        assert_eq!(cached.report.summary, "Sharp");
    }
}
