//! The prompt draft: full in-memory wizard state.
//!
//! `PromptDraft` carries both the content fields a user fills in and the
//! session-local wizard fields (step counter, advanced toggle, timestamps).
//! Wire names are snake_case except `finishedAt` and `updatedAt`, which keep
//! the camelCase names already present in persisted stores and share links.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Sentinel for `updated_at`: the draft was never touched by the user.
pub const UNTOUCHED: i64 = -1;

/// Sentinel for `finished_at`: the wizard has not been completed.
pub const NOT_FINISHED: i64 = -1;

/// First wizard step. Reloaded and shared drafts always restart here.
pub const FIRST_STEP: u32 = 1;

/// Number of wizard steps.
pub const DEFAULT_TOTAL_STEPS: u32 = 5;

/// Maximum character counts enforced before a draft is shared.
pub const MAX_ROLE_CHARS: usize = 200;
pub const MAX_TASK_INTENT_CHARS: usize = 2_000;
pub const MAX_CONTEXT_CHARS: usize = 10_000;
pub const MAX_EXAMPLES_CHARS: usize = 10_000;
pub const MAX_CONSTRAINTS_CHARS: usize = 5_000;
pub const MAX_DISALLOWED_CHARS: usize = 5_000;
pub const MAX_CUSTOM_AUDIENCE_CHARS: usize = 200;

/// Full wizard state for a single prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptDraft {
    /// Opaque identifier, assigned lazily (content fingerprint or random id).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Who the model should act as ("Career coach").
    pub ai_role: String,
    /// What the user wants done. A draft without one is never persisted.
    pub task_intent: String,
    /// Background the model needs.
    pub context: String,
    /// Few-shot examples. Session-local: cleared on share and reload.
    pub examples: String,
    pub constraints: String,
    pub disallowed_content: String,
    pub output_format: OutputFormat,
    pub target_audience: TargetAudience,
    /// Free-text audience, only meaningful with `TargetAudience::Custom`.
    pub custom_audience: String,
    pub tone_style: ToneStyle,
    pub reasoning_depth: ReasoningDepth,
    /// Ask the model to verify its own answer before replying.
    pub self_check: bool,
    /// Current wizard step (1-based).
    pub step: u32,
    pub total_steps: u32,
    pub show_advanced: bool,
    /// Epoch millis when the wizard was finished, or [`NOT_FINISHED`].
    #[serde(rename = "finishedAt")]
    pub finished_at: i64,
    /// Epoch millis of the last user edit, or [`UNTOUCHED`].
    #[serde(rename = "updatedAt")]
    pub updated_at: i64,
}

impl Default for PromptDraft {
    fn default() -> Self {
        Self {
            id: None,
            ai_role: String::new(),
            task_intent: String::new(),
            context: String::new(),
            examples: String::new(),
            constraints: String::new(),
            disallowed_content: String::new(),
            output_format: OutputFormat::default(),
            target_audience: TargetAudience::default(),
            custom_audience: String::new(),
            tone_style: ToneStyle::default(),
            reasoning_depth: ReasoningDepth::default(),
            self_check: false,
            step: FIRST_STEP,
            total_steps: DEFAULT_TOTAL_STEPS,
            show_advanced: false,
            finished_at: NOT_FINISHED,
            updated_at: UNTOUCHED,
        }
    }
}

impl PromptDraft {
    /// Create an empty, untouched draft at the first wizard step.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a user edit at the current wall-clock time.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().timestamp_millis();
    }

    /// Whether the user has never edited this draft.
    pub fn is_untouched(&self) -> bool {
        self.updated_at < 0
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at >= 0
    }

    /// Whether `task_intent` holds anything other than whitespace.
    pub fn has_task_intent(&self) -> bool {
        !self.task_intent.trim().is_empty()
    }

    /// Whether this draft may be written to local storage.
    ///
    /// Untouched drafts and drafts without a task are junk and are never
    /// persisted.
    pub fn is_persistable(&self) -> bool {
        self.has_task_intent() && !self.is_untouched()
    }

    /// The audience as it should appear in rendered text.
    pub fn audience_label(&self) -> String {
        match self.target_audience {
            TargetAudience::Custom if !self.custom_audience.trim().is_empty() => {
                self.custom_audience.trim().to_string()
            }
            other => other.to_string(),
        }
    }

    /// Validate content fields before the draft leaves the client.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_task_intent() {
            return Err(ValidationError::EmptyTaskIntent);
        }
        if self.is_untouched() {
            return Err(ValidationError::Untouched);
        }

        let limits: [(&'static str, &str, usize); 7] = [
            ("ai_role", &self.ai_role, MAX_ROLE_CHARS),
            ("task_intent", &self.task_intent, MAX_TASK_INTENT_CHARS),
            ("context", &self.context, MAX_CONTEXT_CHARS),
            ("examples", &self.examples, MAX_EXAMPLES_CHARS),
            ("constraints", &self.constraints, MAX_CONSTRAINTS_CHARS),
            ("disallowed_content", &self.disallowed_content, MAX_DISALLOWED_CHARS),
            ("custom_audience", &self.custom_audience, MAX_CUSTOM_AUDIENCE_CHARS),
        ];
        for (field, value, max) in limits {
            let len = value.chars().count();
            if len > max {
                return Err(ValidationError::FieldTooLong { field, max, actual: len });
            }
        }

        Ok(())
    }
}

/// Shape of the model's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Markdown,
    PlainText,
    Json,
    BulletList,
    Table,
    Code,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "markdown",
            OutputFormat::PlainText => "plain_text",
            OutputFormat::Json => "json",
            OutputFormat::BulletList => "bullet_list",
            OutputFormat::Table => "table",
            OutputFormat::Code => "code",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" => Ok(OutputFormat::Markdown),
            "plain_text" => Ok(OutputFormat::PlainText),
            "json" => Ok(OutputFormat::Json),
            "bullet_list" => Ok(OutputFormat::BulletList),
            "table" => Ok(OutputFormat::Table),
            "code" => Ok(OutputFormat::Code),
            other => Err(format!("invalid output format: '{other}'")),
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Markdown
    }
}

/// Who the answer is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetAudience {
    General,
    Technical,
    Beginner,
    Expert,
    Executive,
    Custom,
}

impl TargetAudience {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetAudience::General => "general",
            TargetAudience::Technical => "technical",
            TargetAudience::Beginner => "beginner",
            TargetAudience::Expert => "expert",
            TargetAudience::Executive => "executive",
            TargetAudience::Custom => "custom",
        }
    }
}

impl fmt::Display for TargetAudience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetAudience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "general" => Ok(TargetAudience::General),
            "technical" => Ok(TargetAudience::Technical),
            "beginner" => Ok(TargetAudience::Beginner),
            "expert" => Ok(TargetAudience::Expert),
            "executive" => Ok(TargetAudience::Executive),
            "custom" => Ok(TargetAudience::Custom),
            other => Err(format!("invalid target audience: '{other}'")),
        }
    }
}

impl Default for TargetAudience {
    fn default() -> Self {
        TargetAudience::General
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneStyle {
    Neutral,
    Professional,
    Friendly,
    Formal,
    Casual,
    Persuasive,
}

impl ToneStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToneStyle::Neutral => "neutral",
            ToneStyle::Professional => "professional",
            ToneStyle::Friendly => "friendly",
            ToneStyle::Formal => "formal",
            ToneStyle::Casual => "casual",
            ToneStyle::Persuasive => "persuasive",
        }
    }
}

impl fmt::Display for ToneStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToneStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "neutral" => Ok(ToneStyle::Neutral),
            "professional" => Ok(ToneStyle::Professional),
            "friendly" => Ok(ToneStyle::Friendly),
            "formal" => Ok(ToneStyle::Formal),
            "casual" => Ok(ToneStyle::Casual),
            "persuasive" => Ok(ToneStyle::Persuasive),
            other => Err(format!("invalid tone style: '{other}'")),
        }
    }
}

impl Default for ToneStyle {
    fn default() -> Self {
        ToneStyle::Neutral
    }
}

/// How much step-by-step reasoning the model should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasoningDepth {
    Low,
    Medium,
    High,
}

impl ReasoningDepth {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasoningDepth::Low => "low",
            ReasoningDepth::Medium => "medium",
            ReasoningDepth::High => "high",
        }
    }
}

impl fmt::Display for ReasoningDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReasoningDepth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(ReasoningDepth::Low),
            "medium" => Ok(ReasoningDepth::Medium),
            "high" => Ok(ReasoningDepth::High),
            other => Err(format!("invalid reasoning depth: '{other}'")),
        }
    }
}

impl Default for ReasoningDepth {
    fn default() -> Self {
        ReasoningDepth::Medium
    }
}
