//! Final summarization. The one step with contained failure: whatever
//! goes wrong, the run still terminates with a summary the caller can
//! show, carrying the error text if need be.

use super::prompts::build_summary_prompt;
use super::response::strip_markdown_fences;
use super::state::{ReviewState, StepUpdate};
use crate::llm::LlmClient;

pub fn run(llm: &dyn LlmClient, state: &ReviewState) -> StepUpdate {
    let _span = tracing::info_span!("summarize_results", run_id = %state.run_id).entered();

    let prompt = build_summary_prompt(state);
    let summary = match llm.generate(&prompt, None) {
        Ok(text) => strip_markdown_fences(&text).to_string(),
        Err(e) => {
            tracing::error!(error = %e, "Summarization failed");
            format!("Error during summarization: {e}")
        }
    };

    tracing::info!(chars = summary.len(), "Summarization completed");

    StepUpdate {
        summary: Some(summary),
        message: Some("Summarization completed".into()),
        ..Default::default()
    }
}
