//! Duplicate detection for the local prompt store.
//!
//! Two drafts are the same prompt when, in priority order: both carry the
//! same non-empty id; their canonical JSON (without id) is byte-identical;
//! or the Levenshtein distance between their canonical JSON strings is below
//! the configured threshold. The last rule folds autosave snapshots of an
//! in-progress edit into one record.

use prompt_builder_types::draft::PromptDraft;
use prompt_builder_types::store::StoredPromptRecord;

/// How an existing record matched the incoming draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Identifier,
    Exact,
    Fuzzy { distance: usize },
}

/// Canonical JSON of a draft, without its id.
///
/// Field order comes from the struct definition, so equal drafts always
/// serialize identically.
pub fn canonical_json(draft: &PromptDraft) -> String {
    let anonymous = PromptDraft {
        id: None,
        ..draft.clone()
    };
    serde_json::to_string(&anonymous).unwrap_or_default()
}

/// Find the record the incoming draft should replace.
///
/// Returns the index of the match and how it matched. Among fuzzy matches
/// the closest wins; ties go to the earliest record.
pub fn find_match(
    records: &[StoredPromptRecord],
    draft: &PromptDraft,
    threshold: usize,
) -> Option<(usize, MatchKind)> {
    if let Some(id) = draft.id.as_deref().filter(|id| !id.is_empty()) {
        if let Some(index) = records.iter().position(|r| r.id() == Some(id)) {
            return Some((index, MatchKind::Identifier));
        }
    }

    let incoming = canonical_json(draft);
    let existing: Vec<String> = records.iter().map(|r| canonical_json(&r.data)).collect();

    if let Some(index) = existing.iter().position(|json| *json == incoming) {
        return Some((index, MatchKind::Exact));
    }

    if threshold == 0 {
        return None;
    }

    let incoming_len = incoming.chars().count();
    let mut best: Option<(usize, usize)> = None;
    for (index, json) in existing.iter().enumerate() {
        // Length difference is a lower bound on edit distance.
        if json.chars().count().abs_diff(incoming_len) >= threshold {
            continue;
        }
        let distance = strsim::levenshtein(json, &incoming);
        if distance < threshold && best.is_none_or(|(_, d)| distance < d) {
            best = Some((index, distance));
        }
    }

    best.map(|(index, distance)| (index, MatchKind::Fuzzy { distance }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(task: &str, updated_at: i64) -> PromptDraft {
        PromptDraft {
            task_intent: task.to_string(),
            updated_at,
            ..Default::default()
        }
    }

    fn record(task: &str, updated_at: i64, id: &str) -> StoredPromptRecord {
        let mut data = draft(task, updated_at);
        data.id = Some(id.to_string());
        StoredPromptRecord::new(data, "session")
    }

    #[test]
    fn test_canonical_json_ignores_id() {
        let mut a = draft("Explain recursion", 1);
        let b = a.clone();
        a.id = Some("abc".to_string());
        assert_eq!(canonical_json(&a), canonical_json(&b));
        assert!(!canonical_json(&a).contains("abc"));
    }

    #[test]
    fn test_identifier_match_wins() {
        let records = vec![
            record("Explain recursion", 1, "a"),
            record("Completely different task", 2, "b"),
        ];
        let mut incoming = draft("Explain recursion", 1);
        incoming.id = Some("b".to_string());
        assert_eq!(
            find_match(&records, &incoming, 10),
            Some((1, MatchKind::Identifier))
        );
    }

    #[test]
    fn test_exact_match() {
        let records = vec![record("Explain recursion", 1, "a")];
        assert_eq!(
            find_match(&records, &draft("Explain recursion", 1), 10),
            Some((0, MatchKind::Exact))
        );
    }

    #[test]
    fn test_fuzzy_match_below_threshold() {
        let records = vec![record("Draft a cover letter", 1_700_000_000_000, "a")];
        let incoming = draft("Draft a cover letter now", 1_700_000_000_001);
        assert_eq!(
            find_match(&records, &incoming, 10),
            Some((0, MatchKind::Fuzzy { distance: 5 }))
        );
    }

    #[test]
    fn test_fuzzy_prefers_closest() {
        let records = vec![
            record("Draft a cover letter!!", 1, "a"),
            record("Draft a cover letter!", 1, "b"),
        ];
        let incoming = draft("Draft a cover letter", 1);
        assert_eq!(
            find_match(&records, &incoming, 10),
            Some((1, MatchKind::Fuzzy { distance: 1 }))
        );
    }

    #[test]
    fn test_unrelated_draft_does_not_match() {
        let records = vec![record("Draft a cover letter", 1, "a")];
        assert_eq!(find_match(&records, &draft("Explain recursion", 2), 10), None);
    }

    #[test]
    fn test_zero_threshold_disables_fuzzy() {
        let records = vec![record("Draft a cover letter", 1, "a")];
        assert_eq!(find_match(&records, &draft("Draft a cover letter.", 1), 0), None);
    }
}
