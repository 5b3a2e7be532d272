//! Canonical form projection.
//!
//! Before a draft is compressed, the session-local fields (`id`, `step`,
//! `examples`, `finishedAt`) are dropped. When a payload is loaded again they
//! are re-derived: the wizard restarts at step 1 with no few-shot examples
//! and no finish time, and the identifier is left for the caller to assign.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use std::str::FromStr;

use prompt_builder_types::draft::{
    DEFAULT_TOTAL_STEPS, FIRST_STEP, NOT_FINISHED, OutputFormat, PromptDraft, ReasoningDepth,
    TargetAudience, ToneStyle, UNTOUCHED,
};

/// A draft without its session-local fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanonicalPayload {
    pub ai_role: String,
    pub task_intent: String,
    pub context: String,
    pub constraints: String,
    pub disallowed_content: String,
    pub output_format: OutputFormat,
    pub target_audience: TargetAudience,
    pub custom_audience: String,
    pub tone_style: ToneStyle,
    pub reasoning_depth: ReasoningDepth,
    pub self_check: bool,
    pub total_steps: u32,
    pub show_advanced: bool,
    #[serde(rename = "updatedAt")]
    pub updated_at: i64,
}

impl Default for CanonicalPayload {
    fn default() -> Self {
        project(&PromptDraft::default())
    }
}

impl CanonicalPayload {
    /// Merge an arbitrary JSON value against the defaults, field by field.
    ///
    /// Missing fields, fields of the wrong type, and unknown enum values all
    /// fall back to their defaults. Never fails; a non-object yields the
    /// default payload.
    pub fn from_value_lenient(value: &Value) -> Self {
        let defaults = Self::default();
        let Some(map) = value.as_object() else {
            return defaults;
        };

        Self {
            ai_role: string_field(map, "ai_role"),
            task_intent: string_field(map, "task_intent"),
            context: string_field(map, "context"),
            constraints: string_field(map, "constraints"),
            disallowed_content: string_field(map, "disallowed_content"),
            output_format: enum_field(map, "output_format"),
            target_audience: enum_field(map, "target_audience"),
            custom_audience: string_field(map, "custom_audience"),
            tone_style: enum_field(map, "tone_style"),
            reasoning_depth: enum_field(map, "reasoning_depth"),
            self_check: map
                .get("self_check")
                .and_then(Value::as_bool)
                .unwrap_or(defaults.self_check),
            total_steps: map
                .get("total_steps")
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
                .filter(|n| *n >= FIRST_STEP)
                .unwrap_or(DEFAULT_TOTAL_STEPS),
            show_advanced: map
                .get("show_advanced")
                .and_then(Value::as_bool)
                .unwrap_or(defaults.show_advanced),
            updated_at: map
                .get("updatedAt")
                .and_then(timestamp)
                .unwrap_or(UNTOUCHED),
        }
    }
}

/// Strip the session-local fields from a draft.
pub fn project(draft: &PromptDraft) -> CanonicalPayload {
    CanonicalPayload {
        ai_role: draft.ai_role.clone(),
        task_intent: draft.task_intent.clone(),
        context: draft.context.clone(),
        constraints: draft.constraints.clone(),
        disallowed_content: draft.disallowed_content.clone(),
        output_format: draft.output_format,
        target_audience: draft.target_audience,
        custom_audience: draft.custom_audience.clone(),
        tone_style: draft.tone_style,
        reasoning_depth: draft.reasoning_depth,
        self_check: draft.self_check,
        total_steps: draft.total_steps,
        show_advanced: draft.show_advanced,
        updated_at: draft.updated_at,
    }
}

/// Rebuild a full draft from a canonical payload.
///
/// The result starts at the first step with empty examples, no finish time
/// and no identifier.
pub fn reconstitute(payload: CanonicalPayload) -> PromptDraft {
    PromptDraft {
        id: None,
        ai_role: payload.ai_role,
        task_intent: payload.task_intent,
        context: payload.context,
        examples: String::new(),
        constraints: payload.constraints,
        disallowed_content: payload.disallowed_content,
        output_format: payload.output_format,
        target_audience: payload.target_audience,
        custom_audience: payload.custom_audience,
        tone_style: payload.tone_style,
        reasoning_depth: payload.reasoning_depth,
        self_check: payload.self_check,
        step: FIRST_STEP,
        total_steps: payload.total_steps,
        show_advanced: payload.show_advanced,
        finished_at: NOT_FINISHED,
        updated_at: payload.updated_at,
    }
}

/// Merge a full stored draft leniently.
///
/// Like [`CanonicalPayload::from_value_lenient`], but the session-local fields
/// are read back too instead of being reset.
pub fn draft_from_value_lenient(value: &Value) -> PromptDraft {
    let mut draft = reconstitute(CanonicalPayload::from_value_lenient(value));
    let Some(map) = value.as_object() else {
        return draft;
    };

    draft.id = map
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string);
    draft.examples = string_field(map, "examples");
    draft.step = map
        .get("step")
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| *n >= FIRST_STEP)
        .unwrap_or(FIRST_STEP);
    draft.finished_at = map
        .get("finishedAt")
        .and_then(timestamp)
        .unwrap_or(NOT_FINISHED);
    draft
}

fn string_field(map: &Map<String, Value>, key: &str) -> String {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

fn enum_field<T: FromStr + Default>(map: &Map<String, Value>, key: &str) -> T {
    map.get(key)
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .unwrap_or_default()
}

fn timestamp(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
}
