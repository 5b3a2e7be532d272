//! Shared prompt commands: publish, show, recent.

use anyhow::{Result, bail};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use prompt_builder_types::draft::PromptDraft;
use prompt_builder_types::share::SaveStatus;

use crate::cli::{format_relative_time, print_draft, truncate};
use crate::state::AppState;

pub async fn publish(state: &AppState, draft: &PromptDraft, session: &str, json: bool) -> Result<()> {
    let outcome = state.share_service.save(draft, session).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!();
    match outcome.status {
        SaveStatus::Created => println!("  {} Prompt published", style("✓").green().bold()),
        SaveStatus::Existing => println!(
            "  {} Already published from this session",
            style("i").blue().bold()
        ),
    }
    println!("  {}  {}", style("Slug:").bold(), style(&outcome.slug).cyan());
    println!();
    Ok(())
}

pub async fn show(state: &AppState, slug: &str, json: bool) -> Result<()> {
    let Some(prompt) = state.share_service.get_by_slug(slug).await? else {
        bail!("no published prompt with slug '{slug}'");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&prompt)?);
        return Ok(());
    }

    println!();
    println!("  {}     {}", style("Slug:").bold(), style(&prompt.slug).cyan());
    println!("  {}  {}", style("Session:").bold(), prompt.session_id);
    println!(
        "  {}    {}",
        style("Saved:").bold(),
        format_relative_time(&prompt.created_at)
    );
    print_draft(&prompt.draft, false)
}

pub async fn recent(state: &AppState, limit: u32, json: bool) -> Result<()> {
    let prompts = state.share_service.list_recent(limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&prompts)?);
        return Ok(());
    }

    if prompts.is_empty() {
        println!();
        println!(
            "  {} Nothing published yet. Publish with: {}",
            style("i").blue().bold(),
            style("pbuild publish --task \"...\"").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Slug").fg(Color::White),
        Cell::new("Task").fg(Color::White),
        Cell::new("Session").fg(Color::White),
        Cell::new("Saved").fg(Color::White),
    ]);

    for prompt in &prompts {
        table.add_row(vec![
            Cell::new(&prompt.slug).fg(Color::Cyan),
            Cell::new(truncate(&prompt.draft.task_intent, 50)),
            Cell::new(&prompt.session_id).fg(Color::DarkGrey),
            Cell::new(format_relative_time(&prompt.created_at)).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}
