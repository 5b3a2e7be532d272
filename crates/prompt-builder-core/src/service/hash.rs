//! ContentHasher trait for computing content fingerprints.
//!
//! Defined in prompt-builder-core so codecs and services can fingerprint
//! drafts without coupling to a specific hashing algorithm. The
//! `Sha256ContentHasher` adapter lives in prompt-builder-infra.

/// Abstraction over content hashing.
///
/// Used to derive the content fingerprint that identifies a decoded draft
/// and deduplicates saved prompts.
pub trait ContentHasher: Send + Sync {
    /// Compute a hex-encoded hash of the given content.
    fn compute_hash(&self, content: &str) -> String;
}
