//! `pbuild analyze`: offline prompt scoring.
//!
//! `HeuristicAnalyzer` stands in for a model-backed analyzer. It scores the
//! rendered prompt by which sections are present and how specific the task
//! is. Results are cached per content fingerprint like any other analyzer's.

use anyhow::Result;
use console::style;

use prompt_builder_core::service::analysis::PromptAnalyzer;
use prompt_builder_types::draft::PromptDraft;
use prompt_builder_types::error::AnalysisError;
use prompt_builder_types::share::AnalysisReport;

use crate::state::AppState;

/// Section heading, points, and the suggestion shown when it is missing.
const SECTIONS: [(&str, u8, &str); 5] = [
    ("## Role", 15, "Give the model a role to play."),
    ("## Context", 20, "Add background the model cannot guess."),
    ("## Examples", 15, "Show an example of the answer you want."),
    ("## Constraints", 15, "State limits such as length or scope."),
    ("## Avoid", 5, "List anything the answer must not contain."),
];

/// Words below which a task is considered vague.
const SPECIFIC_TASK_WORDS: usize = 6;

#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicAnalyzer;

impl PromptAnalyzer for HeuristicAnalyzer {
    async fn analyze(&self, prompt_text: &str) -> Result<AnalysisReport, AnalysisError> {
        if prompt_text.trim().is_empty() {
            return Err(AnalysisError::Analyzer("empty prompt".to_string()));
        }

        let mut score: u8 = 20;
        let mut suggestions = Vec::new();

        for (heading, points, suggestion) in SECTIONS {
            if prompt_text.contains(heading) {
                score += points;
            } else {
                suggestions.push(suggestion.to_string());
            }
        }

        let task_words = task_section(prompt_text).split_whitespace().count();
        if task_words >= SPECIFIC_TASK_WORDS {
            score += 10;
        } else {
            suggestions.push("Describe the task in more detail.".to_string());
        }

        let summary = match score {
            80.. => "Well-structured prompt.",
            50..=79 => "Solid prompt with room to add detail.",
            _ => "Sparse prompt; the model will have to guess.",
        }
        .to_string();

        Ok(AnalysisReport {
            score,
            summary,
            suggestions,
        })
    }
}

fn task_section(prompt_text: &str) -> &str {
    prompt_text
        .split("## ")
        .find_map(|section| section.strip_prefix("Task\n"))
        .unwrap_or_default()
}

pub async fn analyze(state: &AppState, draft: &PromptDraft, json: bool) -> Result<()> {
    let analysis = state.analysis_service.analyze(draft).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    let score = analysis.report.score;
    let styled_score = match score {
        80.. => style(score).green(),
        50..=79 => style(score).yellow(),
        _ => style(score).red(),
    };

    println!();
    println!(
        "  {}  {}/100  {}",
        style("Score:").bold(),
        styled_score.bold(),
        analysis.report.summary
    );
    for suggestion in &analysis.report.suggestions {
        println!("    {} {}", style("•").dim(), suggestion);
    }
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use prompt_builder_core::render::render_prompt;

    fn draft() -> PromptDraft {
        PromptDraft {
            task_intent: "Explain recursion".to_string(),
            updated_at: 1,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_sparse_prompt_scores_low() {
        let report = HeuristicAnalyzer.analyze(&render_prompt(&draft())).await.unwrap();
        assert_eq!(report.score, 20);
        assert_eq!(report.suggestions.len(), 6);
    }

    #[tokio::test]
    async fn test_full_prompt_scores_high() {
        let full = PromptDraft {
            ai_role: "Teacher".to_string(),
            task_intent: "Explain recursion to a first-year student using a simple analogy"
                .to_string(),
            context: "They know loops.".to_string(),
            examples: "Russian dolls".to_string(),
            constraints: "Under 150 words.".to_string(),
            disallowed_content: "Jargon.".to_string(),
            ..draft()
        };
        let report = HeuristicAnalyzer.analyze(&render_prompt(&full)).await.unwrap();
        assert_eq!(report.score, 100);
        assert!(report.suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_empty_prompt_is_error() {
        assert!(HeuristicAnalyzer.analyze("  ").await.is_err());
    }
}
