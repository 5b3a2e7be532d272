//! Prompt text commands: render, import.

use std::path::Path;

use anyhow::Result;
use console::style;

use prompt_builder_core::render::{import_markdown, render_prompt};
use prompt_builder_types::draft::PromptDraft;

use crate::cli::{print_draft, read_input};
use crate::state::AppState;

pub fn render(draft: &PromptDraft, json: bool) -> Result<()> {
    let text = render_prompt(draft);

    if json {
        println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "prompt": text }))?);
    } else if text.is_empty() {
        println!(
            "  {} Nothing to render. Set a task with {}",
            style("i").blue().bold(),
            style("--task").yellow()
        );
    } else {
        println!("{text}");
    }
    Ok(())
}

pub fn import(state: &AppState, path: &Path, save: bool, session: &str, json: bool) -> Result<()> {
    let draft = import_markdown(&read_input(path)?);

    if save {
        let outcome = state.prompt_store.upsert(draft.clone(), session);
        tracing::info!(?outcome, "imported draft saved to local store");
    }

    print_draft(&draft, json)
}
