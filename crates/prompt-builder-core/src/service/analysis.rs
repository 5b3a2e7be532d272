//! Prompt analysis with a fingerprint-keyed cache.
//!
//! The analyzer itself is a black box (typically an LLM call). Identical
//! content is only analyzed once; later requests are served from the
//! [`AnalysisRepository`].

use chrono::Utc;

use prompt_builder_types::draft::PromptDraft;
use prompt_builder_types::error::AnalysisError;
use prompt_builder_types::share::{AnalysisReport, PromptAnalysis};

use crate::fingerprint::fingerprint;
use crate::render::render_prompt;
use crate::repository::analysis::AnalysisRepository;
use crate::service::hash::ContentHasher;

/// Upper bound of [`AnalysisReport::score`].
pub const MAX_SCORE: u8 = 100;

/// Produces a quality report for rendered prompt text.
pub trait PromptAnalyzer: Send + Sync {
    fn analyze(
        &self,
        prompt_text: &str,
    ) -> impl std::future::Future<Output = Result<AnalysisReport, AnalysisError>> + Send;
}

pub struct AnalysisService<R: AnalysisRepository, A: PromptAnalyzer, H: ContentHasher> {
    repo: R,
    analyzer: A,
    hasher: H,
}

impl<R: AnalysisRepository, A: PromptAnalyzer, H: ContentHasher> AnalysisService<R, A, H> {
    pub fn new(repo: R, analyzer: A, hasher: H) -> Self {
        Self {
            repo,
            analyzer,
            hasher,
        }
    }

    /// Analyze a draft, reusing a cached result for identical content.
    ///
    /// A failed cache write is logged; the fresh analysis is still returned.
    pub async fn analyze(&self, draft: &PromptDraft) -> Result<PromptAnalysis, AnalysisError> {
        draft.validate()?;

        let fingerprint = fingerprint(draft, &self.hasher);

        if let Some(cached) = self.cached_by_fingerprint(&fingerprint).await? {
            tracing::debug!(%fingerprint, "analysis cache hit");
            return Ok(cached);
        }

        let mut report = self.analyzer.analyze(&render_prompt(draft)).await?;
        report.score = report.score.min(MAX_SCORE);

        let analysis = PromptAnalysis {
            fingerprint,
            report,
            created_at: Utc::now(),
        };

        if let Err(err) = self.repo.put(&analysis).await {
            tracing::warn!("failed to cache prompt analysis: {err}");
        }

        Ok(analysis)
    }

    /// The cached analysis for a draft's content, without calling the analyzer.
    pub async fn cached(&self, draft: &PromptDraft) -> Result<Option<PromptAnalysis>, AnalysisError> {
        self.cached_by_fingerprint(&fingerprint(draft, &self.hasher))
            .await
    }

    async fn cached_by_fingerprint(
        &self,
        fingerprint: &str,
    ) -> Result<Option<PromptAnalysis>, AnalysisError> {
        self.repo
            .get(fingerprint)
            .await
            .map_err(|e| AnalysisError::StorageError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::HexHasher;
    use prompt_builder_types::error::{RepositoryError, ValidationError};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct MemoryCache {
        rows: Mutex<HashMap<String, PromptAnalysis>>,
        fail_writes: bool,
    }

    impl AnalysisRepository for MemoryCache {
        async fn get(&self, fingerprint: &str) -> Result<Option<PromptAnalysis>, RepositoryError> {
            Ok(self.rows.lock().unwrap().get(fingerprint).cloned())
        }

        async fn put(&self, analysis: &PromptAnalysis) -> Result<(), RepositoryError> {
            if self.fail_writes {
                return Err(RepositoryError::Connection);
            }
            self.rows
                .lock()
                .unwrap()
                .insert(analysis.fingerprint.clone(), analysis.clone());
            Ok(())
        }
    }

    /// Scores by prompt length and records every text it was given.
    #[derive(Default)]
    struct LengthAnalyzer {
        calls: AtomicUsize,
        texts: Mutex<Vec<String>>,
    }

    impl PromptAnalyzer for LengthAnalyzer {
        async fn analyze(&self, prompt_text: &str) -> Result<AnalysisReport, AnalysisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.texts.lock().unwrap().push(prompt_text.to_string());
            if !prompt_text.contains("## Task") {
                return Err(AnalysisError::Analyzer("no task section".to_string()));
            }
            Ok(AnalysisReport {
                score: u8::try_from(prompt_text.len()).unwrap_or(u8::MAX),
                summary: "ok".to_string(),
                suggestions: vec!["add context".to_string()],
            })
        }
    }

    fn draft(task: &str) -> PromptDraft {
        PromptDraft {
            task_intent: task.to_string(),
            updated_at: 1_700_000_000_000,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_analysis_is_cached_by_content() {
        let svc = AnalysisService::new(MemoryCache::default(), LengthAnalyzer::default(), HexHasher);

        let first = svc.analyze(&draft("Explain recursion")).await.unwrap();
        let mut same_content = draft("Explain recursion");
        same_content.step = 3;
        same_content.updated_at += 1_000;
        let second = svc.analyze(&same_content).await.unwrap();

        assert_eq!(first.fingerprint, second.fingerprint);
        assert_eq!(second.report, first.report);
        assert_eq!(svc.analyzer.calls.load(Ordering::SeqCst), 1);

        svc.analyze(&draft("Explain closures")).await.unwrap();
        assert_eq!(svc.analyzer.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_examples_reach_analyzer_and_split_cache() {
        let svc = AnalysisService::new(MemoryCache::default(), LengthAnalyzer::default(), HexHasher);
        let with_examples = PromptDraft {
            examples: "Subject: hi".to_string(),
            ..draft("Write an email")
        };

        let plain = svc.analyze(&draft("Write an email")).await.unwrap();
        let rich = svc.analyze(&with_examples).await.unwrap();

        assert_ne!(plain.fingerprint, rich.fingerprint);
        assert_eq!(rich.fingerprint, fingerprint(&with_examples, &HexHasher));
        assert_eq!(svc.analyzer.calls.load(Ordering::SeqCst), 2);

        let texts = svc.analyzer.texts.lock().unwrap();
        assert!(!texts[0].contains("## Examples"));
        assert!(texts[1].contains("## Examples\nSubject: hi"));
    }

    #[tokio::test]
    async fn test_score_is_clamped() {
        let svc = AnalysisService::new(MemoryCache::default(), LengthAnalyzer::default(), HexHasher);
        let long_task = "word ".repeat(100);
        let analysis = svc.analyze(&draft(&long_task)).await.unwrap();
        assert_eq!(analysis.report.score, MAX_SCORE);
    }

    #[tokio::test]
    async fn test_cached_without_analyzing() {
        let svc = AnalysisService::new(MemoryCache::default(), LengthAnalyzer::default(), HexHasher);
        assert!(svc.cached(&draft("Explain recursion")).await.unwrap().is_none());
        svc.analyze(&draft("Explain recursion")).await.unwrap();
        assert!(svc.cached(&draft("Explain recursion")).await.unwrap().is_some());
        assert_eq!(svc.analyzer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cache_write_failure_still_returns_report() {
        let cache = MemoryCache {
            fail_writes: true,
            ..Default::default()
        };
        let svc = AnalysisService::new(cache, LengthAnalyzer::default(), HexHasher);
        let analysis = svc.analyze(&draft("Explain recursion")).await.unwrap();
        assert_eq!(analysis.report.summary, "ok");
    }

    #[tokio::test]
    async fn test_invalid_draft_is_rejected_before_analyzing() {
        let svc = AnalysisService::new(MemoryCache::default(), LengthAnalyzer::default(), HexHasher);
        let result = svc.analyze(&draft("")).await;
        assert!(matches!(
            result,
            Err(AnalysisError::Validation(ValidationError::EmptyTaskIntent))
        ));
        assert_eq!(svc.analyzer.calls.load(Ordering::SeqCst), 0);
    }
}
