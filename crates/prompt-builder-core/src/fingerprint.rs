//! Content fingerprint and slug derivation.
//!
//! The fingerprint covers a fixed, ordered list of content fields and nothing
//! else, so step counters, timestamps and identifiers never change it. It
//! identifies decoded drafts and deduplicates prompts saved to the shared
//! database; its first six hex characters end every slug.

use prompt_builder_types::draft::{NOT_FINISHED, PromptDraft};

use crate::service::hash::ContentHasher;

/// Joins the fingerprinted fields.
pub const FINGERPRINT_SEPARATOR: &str = "||";

/// Characters of the slugified role kept in a slug.
pub const SLUG_ROLE_CHARS: usize = 30;

/// Characters of the slugified task kept in a slug.
pub const SLUG_TASK_CHARS: usize = 20;

/// Fingerprint characters appended to a slug.
pub const SLUG_FINGERPRINT_CHARS: usize = 6;

/// The exact string that gets hashed.
pub fn fingerprint_input(draft: &PromptDraft) -> String {
    [
        draft.ai_role.as_str(),
        draft.task_intent.as_str(),
        draft.context.as_str(),
        draft.examples.as_str(),
        draft.constraints.as_str(),
        draft.disallowed_content.as_str(),
        draft.output_format.as_str(),
    ]
    .join(FINGERPRINT_SEPARATOR)
}

/// Compute the content fingerprint of a draft.
pub fn fingerprint<H: ContentHasher + ?Sized>(draft: &PromptDraft, hasher: &H) -> String {
    hasher.compute_hash(&fingerprint_input(draft))
}

/// The draft as the shared database sees it: wizard progress reset and the
/// content fingerprint as its id. Content fields, `examples` included, are
/// kept as submitted so the id matches `fingerprint(draft)`.
pub fn canonical_draft<H: ContentHasher + ?Sized>(draft: &PromptDraft, hasher: &H) -> PromptDraft {
    PromptDraft {
        id: Some(fingerprint(draft, hasher)),
        step: 1,
        finished_at: NOT_FINISHED,
        ..draft.clone()
    }
}

/// Slugify free text for use in a URL.
///
/// Lowercases and trims, turns whitespace runs into single hyphens, drops
/// anything that is not an ASCII word character or a hyphen, and collapses
/// repeated hyphens.
///
/// ```
/// use prompt_builder_core::fingerprint::slugify;
///
/// assert_eq!(slugify("  Career Coach "), "career-coach");
/// assert_eq!(slugify("Write an e-mail!"), "write-an-e-mail");
/// assert_eq!(slugify("snake_case  --  stays"), "snake_case-stays");
/// ```
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut prev_was_hyphen = false;

    for c in lowered.chars() {
        let mapped = if c.is_whitespace() || c == '-' {
            '-'
        } else if c.is_ascii_alphanumeric() || c == '_' {
            c
        } else {
            continue;
        };

        if mapped == '-' {
            if prev_was_hyphen {
                continue;
            }
            prev_was_hyphen = true;
        } else {
            prev_was_hyphen = false;
        }
        slug.push(mapped);
    }

    slug
}

/// Derive the shareable slug for a draft with the given fingerprint.
///
/// `slugify(role)[..30] + "-" + slugify(task)[..20] + "-" + fingerprint[..6]`.
/// Deterministic: identical content always yields the identical slug.
pub fn prompt_slug(draft: &PromptDraft, fingerprint: &str) -> String {
    let role: String = slugify(&draft.ai_role).chars().take(SLUG_ROLE_CHARS).collect();
    let task: String = slugify(&draft.task_intent)
        .chars()
        .take(SLUG_TASK_CHARS)
        .collect();
    let hash: String = fingerprint.chars().take(SLUG_FINGERPRINT_CHARS).collect();
    format!("{role}-{task}-{hash}")
}
