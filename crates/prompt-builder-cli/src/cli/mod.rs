//! CLI command definitions for the `pbuild` binary.
//!
//! Uses clap derive macros for argument parsing. Commands that act on a draft
//! take it from a JSON file (`--file`, `-` for stdin) and/or field flags.

pub mod analyze;
pub mod codec;
pub mod share;
pub mod store;
pub mod text;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use console::style;

use prompt_builder_core::render::render_prompt;
use prompt_builder_types::draft::PromptDraft;

/// Build, share, and deduplicate structured AI prompts.
#[derive(Parser)]
#[command(name = "pbuild", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Only log errors. Command output is unaffected.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Session identifier recorded on saved and published prompts.
    #[arg(long, global = true, env = "PROMPT_BUILDER_SESSION", default_value = "cli")]
    pub session: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encode a draft into a versioned share payload.
    Encode {
        #[command(flatten)]
        draft: DraftArgs,
    },

    /// Decode a share payload back into a draft.
    Decode {
        /// Payload produced by `pbuild encode`.
        payload: String,
    },

    /// Sparse `?d=...&vld=1` share parameters.
    Params {
        #[command(subcommand)]
        action: ParamsCommand,
    },

    /// Print a draft's content fingerprint and slug.
    Fingerprint {
        #[command(flatten)]
        draft: DraftArgs,
    },

    /// Render a draft as prompt text.
    Render {
        #[command(flatten)]
        draft: DraftArgs,
    },

    /// Import a markdown prompt as a draft.
    Import {
        /// Markdown file to read (`-` for stdin).
        path: PathBuf,

        /// Also save the imported draft to the local store.
        #[arg(long)]
        save: bool,
    },

    /// Manage the local prompt store (list, show, save, delete).
    Store {
        #[command(subcommand)]
        action: StoreCommand,
    },

    /// Publish a draft to the shared database.
    Publish {
        #[command(flatten)]
        draft: DraftArgs,
    },

    /// Show a published prompt by slug.
    Show {
        slug: String,
    },

    /// List recently published prompts.
    Recent {
        /// Maximum number of prompts to list.
        #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..=1000))]
        limit: u32,
    },

    /// Score a draft (cached per content fingerprint).
    Analyze {
        #[command(flatten)]
        draft: DraftArgs,
    },

    /// Show the effective configuration and data directory.
    Config,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ParamsCommand {
    /// Build share parameters for a draft.
    To {
        #[command(flatten)]
        draft: DraftArgs,
    },

    /// Restore a draft from a query string.
    From {
        /// Query string, with or without the leading `?`.
        query: String,
    },
}

#[derive(Subcommand)]
pub enum StoreCommand {
    /// List stored drafts, most recent first.
    #[command(alias = "ls")]
    List,

    /// Show a stored draft.
    Show { id: String },

    /// Save a draft, replacing a near-duplicate if one exists.
    Save {
        #[command(flatten)]
        draft: DraftArgs,
    },

    /// Delete a stored draft by id.
    #[command(alias = "rm")]
    Delete { id: String },
}

/// Draft input shared by every command that acts on a draft.
#[derive(Args, Debug, Default, Clone)]
pub struct DraftArgs {
    /// JSON draft to start from (`-` for stdin).
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,

    #[arg(long)]
    pub role: Option<String>,

    #[arg(long)]
    pub task: Option<String>,

    #[arg(long)]
    pub context: Option<String>,

    #[arg(long)]
    pub examples: Option<String>,

    #[arg(long)]
    pub constraints: Option<String>,

    /// Content the answer must avoid.
    #[arg(long)]
    pub avoid: Option<String>,

    /// markdown, plain_text, json, bullet_list, table, code.
    #[arg(long)]
    pub format: Option<String>,

    /// general, technical, beginner, expert, executive, or free text.
    #[arg(long)]
    pub audience: Option<String>,

    /// neutral, professional, friendly, formal, casual, persuasive.
    #[arg(long)]
    pub tone: Option<String>,

    /// low, medium, high.
    #[arg(long)]
    pub reasoning: Option<String>,

    #[arg(long)]
    pub self_check: bool,
}

impl DraftArgs {
    /// Build the draft. Any field flag counts as an edit and touches the draft.
    pub fn into_draft(self) -> Result<PromptDraft> {
        let mut draft = match &self.file {
            Some(path) => {
                let content = read_input(path)?;
                serde_json::from_str::<PromptDraft>(&content)
                    .with_context(|| format!("invalid draft JSON in {}", path.display()))?
            }
            None => PromptDraft::new(),
        };

        let mut edited = false;
        let mut set = |field: &mut String, value: Option<String>| {
            if let Some(value) = value {
                *field = value;
                edited = true;
            }
        };
        set(&mut draft.ai_role, self.role);
        set(&mut draft.task_intent, self.task);
        set(&mut draft.context, self.context);
        set(&mut draft.examples, self.examples);
        set(&mut draft.constraints, self.constraints);
        set(&mut draft.disallowed_content, self.avoid);

        if let Some(format) = self.format {
            draft.output_format = format.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            edited = true;
        }
        if let Some(audience) = self.audience {
            match audience.parse() {
                Ok(parsed) => draft.target_audience = parsed,
                Err(_) => {
                    draft.target_audience = prompt_builder_types::draft::TargetAudience::Custom;
                    draft.custom_audience = audience;
                }
            }
            edited = true;
        }
        if let Some(tone) = self.tone {
            draft.tone_style = tone.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            edited = true;
        }
        if let Some(reasoning) = self.reasoning {
            draft.reasoning_depth = reasoning.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            edited = true;
        }
        if self.self_check {
            draft.self_check = true;
            edited = true;
        }

        if edited {
            draft.touch();
        }
        Ok(draft)
    }
}

/// Read a file, or stdin when the path is `-`.
pub fn read_input(path: &std::path::Path) -> Result<String> {
    if path.as_os_str() == "-" {
        return std::io::read_to_string(std::io::stdin()).context("failed to read stdin");
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Log filter for the `--quiet` and `-v` flags. `RUST_LOG` still wins.
pub fn log_filter(verbose: u8, quiet: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 => "warn",
        1 => "info,prompt_builder=debug",
        _ => "trace",
    }
}

/// Print a draft as JSON or as a short styled summary with its rendered text.
pub fn print_draft(draft: &PromptDraft, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(draft)?);
        return Ok(());
    }

    println!();
    if let Some(id) = &draft.id {
        println!("  {}  {}", style("ID:").bold(), style(id).dim());
    }
    println!(
        "  {}  {}",
        style("Task:").bold(),
        style(truncate(&draft.task_intent, 60)).cyan()
    );
    if !draft.ai_role.is_empty() {
        println!("  {}  {}", style("Role:").bold(), draft.ai_role);
    }
    println!(
        "  {}  step {}/{}",
        style("Wizard:").bold(),
        draft.step,
        draft.total_steps
    );

    let rendered = render_prompt(draft);
    if !rendered.is_empty() {
        println!();
        for line in rendered.lines() {
            println!("    {}", style(line).dim());
        }
    }
    println!();
    Ok(())
}

/// Truncate to `max` characters, appending "..." when shortened.
pub fn truncate(text: &str, max: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() > max {
        let kept: String = single_line.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        single_line
    }
}

pub fn format_relative_time(dt: &chrono::DateTime<chrono::Utc>) -> String {
    let diff = chrono::Utc::now() - *dt;

    if diff.num_seconds() < 60 {
        "just now".to_string()
    } else if diff.num_minutes() < 60 {
        format!("{}m ago", diff.num_minutes())
    } else if diff.num_hours() < 24 {
        format!("{}h ago", diff.num_hours())
    } else if diff.num_days() < 30 {
        format!("{}d ago", diff.num_days())
    } else {
        dt.format("%Y-%m-%d").to_string()
    }
}
