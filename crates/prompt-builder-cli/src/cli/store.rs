//! Local prompt store commands: list, show, save, delete.

use anyhow::{Result, bail};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use prompt_builder_types::draft::PromptDraft;
use prompt_builder_types::store::{SkipReason, UpsertOutcome};

use crate::cli::{print_draft, truncate};
use crate::state::AppState;

/// List stored drafts in a table, most recent first.
pub fn list(state: &AppState, json: bool) -> Result<()> {
    let records = state.prompt_store.list();

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!();
        println!(
            "  {} No saved drafts. Save one with: {}",
            style("i").blue().bold(),
            style("pbuild store save --task \"...\"").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Task").fg(Color::White),
        Cell::new("Role").fg(Color::White),
        Cell::new("Updated").fg(Color::White),
        Cell::new("Creator").fg(Color::White),
    ]);

    for record in &records {
        let updated = chrono::DateTime::from_timestamp_millis(record.data.updated_at)
            .map(|dt| crate::cli::format_relative_time(&dt))
            .unwrap_or_else(|| "never".to_string());

        table.add_row(vec![
            Cell::new(record.id().unwrap_or("-")).fg(Color::DarkGrey),
            Cell::new(truncate(&record.data.task_intent, 50)).fg(Color::Cyan),
            Cell::new(truncate(&record.data.ai_role, 24)),
            Cell::new(updated).fg(Color::DarkGrey),
            Cell::new(&record.creator_id).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!(
        "  {} of {} drafts kept",
        records.len(),
        state.prompt_store.settings().max_entries
    );
    println!();
    Ok(())
}

pub fn show(state: &AppState, id: &str, json: bool) -> Result<()> {
    let Some(record) = state.prompt_store.get(id) else {
        bail!("no stored draft with id '{id}'");
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }
    print_draft(&record.data, false)
}

/// Upsert a draft into the local store.
pub fn save(state: &AppState, draft: PromptDraft, session: &str, json: bool) -> Result<()> {
    let outcome = state.prompt_store.upsert(draft, session);

    if json {
        let out = match &outcome {
            UpsertOutcome::Inserted { id } => serde_json::json!({ "status": "inserted", "id": id }),
            UpsertOutcome::Updated { id } => serde_json::json!({ "status": "updated", "id": id }),
            UpsertOutcome::Skipped(reason) => {
                serde_json::json!({ "status": "skipped", "reason": skip_reason_label(*reason) })
            }
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    match outcome {
        UpsertOutcome::Inserted { id } => {
            println!("  {} Draft saved", style("✓").green().bold());
            println!("  {}  {}", style("ID:").bold(), style(id).dim());
        }
        UpsertOutcome::Updated { id } => {
            println!(
                "  {} Updated an existing draft with near-identical content",
                style("✓").green().bold()
            );
            println!("  {}  {}", style("ID:").bold(), style(id).dim());
        }
        UpsertOutcome::Skipped(reason) => {
            println!(
                "  {} Not saved: {}",
                style("i").blue().bold(),
                skip_reason_label(reason)
            );
        }
    }
    println!();
    Ok(())
}

pub fn delete(state: &AppState, id: &str, json: bool) -> Result<()> {
    let deleted = state.prompt_store.delete(id);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "id": id, "deleted": deleted }))?
        );
        return Ok(());
    }

    if !deleted {
        bail!("no stored draft with id '{id}'");
    }
    println!("  {} Deleted draft {}", style("✓").green().bold(), style(id).dim());
    Ok(())
}

fn skip_reason_label(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::EmptyTaskIntent => "the draft has no task",
        SkipReason::Untouched => "the draft was never edited",
    }
}
