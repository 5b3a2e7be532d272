//! Shared prompt repository trait definition.

use prompt_builder_types::error::RepositoryError;
use prompt_builder_types::share::SharedPrompt;

/// Repository trait for prompts saved to the shared database.
///
/// Implementations live in prompt-builder-infra (e.g., SqliteSharedPromptRepository).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait SharedPromptRepository: Send + Sync {
    /// Insert a new shared prompt. Fails with `Conflict` if the slug is taken.
    fn insert(
        &self,
        prompt: &SharedPrompt,
    ) -> impl std::future::Future<Output = Result<SharedPrompt, RepositoryError>> + Send;

    /// Find the prompt a session already saved with this fingerprint.
    fn find_by_session_fingerprint(
        &self,
        session_id: &str,
        fingerprint: &str,
    ) -> impl std::future::Future<Output = Result<Option<SharedPrompt>, RepositoryError>> + Send;

    /// Most recently saved prompt with this fingerprint, from any session.
    fn get_by_fingerprint(
        &self,
        fingerprint: &str,
    ) -> impl std::future::Future<Output = Result<Option<SharedPrompt>, RepositoryError>> + Send;

    /// Get a prompt by its unique slug.
    fn get_by_slug(
        &self,
        slug: &str,
    ) -> impl std::future::Future<Output = Result<Option<SharedPrompt>, RepositoryError>> + Send;

    /// Most recently saved prompts, newest first.
    fn list_recent(
        &self,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<SharedPrompt>, RepositoryError>> + Send;
}
