//! Types for prompts saved to the shared database and their analyses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::draft::PromptDraft;

/// A prompt saved to the shared database, addressable by slug.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedPrompt {
    pub id: Uuid,
    /// URL-friendly identifier derived from role, task and fingerprint.
    pub slug: String,
    /// Session that saved the prompt. Together with `fingerprint` this is the
    /// deduplication key.
    pub session_id: String,
    /// Content fingerprint (SHA-256 hex) of the draft.
    pub fingerprint: String,
    pub draft: PromptDraft,
    pub created_at: DateTime<Utc>,
}

/// Whether a save created a row or found an identical one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    Created,
    Existing,
}

impl fmt::Display for SaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveStatus::Created => write!(f, "created"),
            SaveStatus::Existing => write!(f, "existing"),
        }
    }
}

impl FromStr for SaveStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "created" => Ok(SaveStatus::Created),
            "existing" => Ok(SaveStatus::Existing),
            other => Err(format!("invalid save status: '{other}'")),
        }
    }
}

/// Result of saving a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveOutcome {
    pub slug: String,
    pub status: SaveStatus,
}

/// What an analyzer returns for a draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Overall quality score, 0-100.
    pub score: u8,
    pub summary: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// A cached analysis, keyed by the draft's content fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptAnalysis {
    pub fingerprint: String,
    pub report: AnalysisReport,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_status_serde() {
        let outcome = SaveOutcome {
            slug: "coach-write-an-email-abc123".to_string(),
            status: SaveStatus::Existing,
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"status\":\"existing\""));
    }

    #[test]
    fn test_save_status_from_str() {
        assert_eq!("Created".parse::<SaveStatus>().unwrap(), SaveStatus::Created);
        assert!("pending".parse::<SaveStatus>().is_err());
    }

    #[test]
    fn test_analysis_report_defaults_suggestions() {
        let report: AnalysisReport =
            serde_json::from_str(r#"{"score":80,"summary":"clear"}"#).unwrap();
        assert_eq!(report.score, 80);
        assert!(report.suggestions.is_empty());
    }
}
