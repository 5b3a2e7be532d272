//! Analysis cache repository trait definition.

use prompt_builder_types::error::RepositoryError;
use prompt_builder_types::share::PromptAnalysis;

/// Cached prompt analyses keyed by content fingerprint.
pub trait AnalysisRepository: Send + Sync {
    fn get(
        &self,
        fingerprint: &str,
    ) -> impl std::future::Future<Output = Result<Option<PromptAnalysis>, RepositoryError>> + Send;

    /// Store an analysis, replacing any previous one for the same fingerprint.
    fn put(
        &self,
        analysis: &PromptAnalysis,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
