//! Plain-text prompt rendering and markdown import.
//!
//! `render_prompt` turns a draft into the prompt text a user copies into a
//! chat model. `import_markdown` reads that text (or a hand-written file with
//! the same `## Section` headings) back into a draft.

use std::str::FromStr;

use prompt_builder_types::draft::{
    OutputFormat, PromptDraft, ReasoningDepth, TargetAudience, ToneStyle,
};

/// Appended to the output section when `self_check` is on.
pub const SELF_CHECK_LINE: &str =
    "Before answering, check your response against the task and constraints above.";

const ROLE: &str = "Role";
const TASK: &str = "Task";
const CONTEXT: &str = "Context";
const EXAMPLES: &str = "Examples";
const CONSTRAINTS: &str = "Constraints";
const AVOID: &str = "Avoid";
const OUTPUT: &str = "Output";

/// Render a draft as a markdown prompt.
///
/// Untouched drafts and drafts without a task render as an empty string.
/// Empty optional sections are omitted.
pub fn render_prompt(draft: &PromptDraft) -> String {
    if draft.is_untouched() || !draft.has_task_intent() {
        return String::new();
    }

    let mut sections: Vec<String> = Vec::new();
    let mut push = |heading: &str, body: &str| {
        let body = body.trim();
        if !body.is_empty() {
            sections.push(format!("## {heading}\n{body}"));
        }
    };

    push(ROLE, &draft.ai_role);
    push(TASK, &draft.task_intent);
    push(CONTEXT, &draft.context);
    push(EXAMPLES, &draft.examples);
    push(CONSTRAINTS, &draft.constraints);
    push(AVOID, &draft.disallowed_content);

    let mut output = format!(
        "Format: {}\nAudience: {}\nTone: {}\nReasoning: {}",
        draft.output_format,
        draft.audience_label(),
        draft.tone_style,
        draft.reasoning_depth,
    );
    if draft.self_check {
        output.push('\n');
        output.push_str(SELF_CHECK_LINE);
    }
    push(OUTPUT, &output);

    sections.join("\n\n")
}

/// Parse a markdown prompt into a draft.
///
/// Recognizes the headings written by [`render_prompt`] (case-insensitive).
/// Text before the first heading is taken as the task when no `Task` section
/// exists. Unknown sections are skipped. The result is marked as edited now.
pub fn import_markdown(markdown: &str) -> PromptDraft {
    let mut draft = PromptDraft::new();
    let mut preamble = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in markdown.lines() {
        if let Some(heading) = line.trim_start().strip_prefix("## ") {
            if let Some((name, body)) = current.take() {
                apply_section(&mut draft, &name, &body.join("\n"));
            }
            current = Some((heading.trim().to_ascii_lowercase(), Vec::new()));
        } else if let Some((_, body)) = current.as_mut() {
            body.push(line);
        } else {
            preamble.push(line);
        }
    }
    if let Some((name, body)) = current {
        apply_section(&mut draft, &name, &body.join("\n"));
    }

    if !draft.has_task_intent() {
        draft.task_intent = preamble.join("\n").trim().to_string();
    }

    draft.touch();
    draft
}

fn apply_section(draft: &mut PromptDraft, name: &str, body: &str) {
    let body = body.trim().to_string();
    match name {
        "role" => draft.ai_role = body,
        "task" => draft.task_intent = body,
        "context" => draft.context = body,
        "examples" => draft.examples = body,
        "constraints" => draft.constraints = body,
        "avoid" => draft.disallowed_content = body,
        "output" => apply_output(draft, &body),
        other => tracing::debug!(section = other, "skipping unknown markdown section"),
    }
}

fn apply_output(draft: &mut PromptDraft, body: &str) {
    for line in body.lines().map(str::trim) {
        if line == SELF_CHECK_LINE {
            draft.self_check = true;
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim().to_ascii_lowercase().as_str() {
            "format" => draft.output_format = parse_or_default::<OutputFormat>(value),
            "tone" => draft.tone_style = parse_or_default::<ToneStyle>(value),
            "reasoning" => draft.reasoning_depth = parse_or_default::<ReasoningDepth>(value),
            "audience" => match TargetAudience::from_str(value) {
                Ok(audience) => draft.target_audience = audience,
                Err(_) => {
                    draft.target_audience = TargetAudience::Custom;
                    draft.custom_audience = value.to_string();
                }
            },
            _ => {}
        }
    }
}

fn parse_or_default<T: FromStr + Default>(value: &str) -> T {
    value.parse().unwrap_or_default()
}
