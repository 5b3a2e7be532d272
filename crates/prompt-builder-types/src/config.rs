//! Configuration types for Prompt Builder.
//!
//! `BuilderConfig` represents the top-level `config.toml` that tunes the
//! local prompt store and logging.

use serde::{Deserialize, Serialize};

use crate::store::{DEFAULT_FUZZY_DISTANCE_THRESHOLD, DEFAULT_MAX_ENTRIES};

/// Top-level configuration.
///
/// Loaded from `~/.prompt-builder/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Tuning for the local prompt store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Records kept after eviction.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Levenshtein distance between canonical JSON strings below which an
    /// upsert replaces an existing record instead of appending.
    #[serde(default = "default_fuzzy_distance_threshold")]
    pub fuzzy_distance_threshold: usize,
}

fn default_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

fn default_fuzzy_distance_threshold() -> usize {
    DEFAULT_FUZZY_DISTANCE_THRESHOLD
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            fuzzy_distance_threshold: default_fuzzy_distance_threshold(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Emit JSON log lines instead of human-readable ones.
    #[serde(default)]
    pub json: bool,

    /// Export spans to stdout via OpenTelemetry.
    #[serde(default)]
    pub otel: bool,
}
