//! Share-link commands: encode, decode, params, fingerprint.

use anyhow::Result;
use console::style;

use prompt_builder_core::codec::envelope;
use prompt_builder_core::fingerprint::{fingerprint, prompt_slug};
use prompt_builder_core::params::{ShareParams, from_search_params, to_search_params};
use prompt_builder_types::draft::PromptDraft;

use crate::cli::print_draft;
use crate::state::AppState;

pub fn encode(draft: &PromptDraft, json: bool) -> Result<()> {
    let payload = envelope::encode_draft(draft);

    if json {
        let out = serde_json::json!({
            "version": envelope::CURRENT_ENVELOPE_VERSION,
            "payload": payload,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{payload}");
    }
    Ok(())
}

/// Decode a payload; an invalid one prints a fallback offering a new draft.
pub fn decode(state: &AppState, payload: &str, json: bool) -> Result<()> {
    match envelope::decode(payload, &state.hasher) {
        Ok(decoded) => {
            tracing::info!(version = decoded.version, "decoded share payload");
            if json {
                let out = serde_json::json!({
                    "version": decoded.version,
                    "draft": decoded.draft,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
                return Ok(());
            }
            println!();
            println!(
                "  {} Decoded v{} payload",
                style("✓").green().bold(),
                decoded.version
            );
            print_draft(&decoded.draft, false)
        }
        Err(err) => {
            tracing::warn!("invalid share payload: {err}");
            print_invalid_link(&err.to_string(), json)
        }
    }
}

pub fn params_to(draft: &PromptDraft, json: bool) -> Result<()> {
    let params = to_search_params(draft);
    let query = params.to_query_string();

    if json {
        let out = serde_json::json!({
            "d": params.d,
            "vld": params.vld,
            "query": query,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if query.is_empty() {
        println!(
            "  {} Nothing to share: every field is at its default.",
            style("i").blue().bold()
        );
    } else {
        println!("?{query}");
    }
    Ok(())
}

pub fn params_from(query: &str, json: bool) -> Result<()> {
    let params = ShareParams::from_query(query);
    if !params.should_decode() {
        return print_invalid_link("missing `d` or `vld=1`", json);
    }
    print_draft(&from_search_params(&params), json)
}

pub fn fingerprint_draft(state: &AppState, draft: &PromptDraft, json: bool) -> Result<()> {
    let fp = fingerprint(draft, &state.hasher);
    let slug = prompt_slug(draft, &fp);

    if json {
        let out = serde_json::json!({ "fingerprint": fp, "slug": slug });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!();
        println!("  {}  {}", style("Fingerprint:").bold(), style(&fp).dim());
        println!("  {}         {}", style("Slug:").bold(), style(&slug).cyan());
        println!();
    }
    Ok(())
}

fn print_invalid_link(reason: &str, json: bool) -> Result<()> {
    if json {
        let out = serde_json::json!({
            "error": "invalid_share_link",
            "reason": reason,
            "fallback": "new_draft",
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} This share link is invalid or corrupted ({reason}).",
        style("✗").red().bold()
    );
    println!(
        "  Start a new prompt instead: {}",
        style("pbuild store save --task \"...\"").yellow()
    );
    println!();
    Ok(())
}
