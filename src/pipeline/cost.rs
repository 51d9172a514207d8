//! Cost estimation: the extracted graph is serialized into the cost
//! prompt and the model's per-service rows are stored verbatim. No local
//! numeric validation happens; the estimate is the model's.

use super::prompts::build_cost_prompt;
use super::response::parse_fenced_rows_lenient;
use super::state::{CostRow, ReviewState, StepUpdate};
use super::WorkflowError;
use crate::llm::LlmClient;

pub fn run(llm: &dyn LlmClient, state: &ReviewState) -> Result<StepUpdate, WorkflowError> {
    let _span = tracing::info_span!("cost_analysis", run_id = %state.run_id).entered();

    let prompt = build_cost_prompt(
        state.image_description.as_deref(),
        &state.nodes,
        &state.edges,
    );
    let raw = llm.generate(&prompt, None)?;

    let (rows, skipped): (Vec<CostRow>, usize) = parse_fenced_rows_lenient(&raw)?;
    if skipped > 0 {
        tracing::warn!(skipped, "Dropped malformed cost rows from model response");
    }
    tracing::info!(rows = rows.len(), "Cost analysis completed");

    Ok(StepUpdate {
        service_costs: Some(rows),
        message: Some("Cost analysis completed".into()),
        ..Default::default()
    })
}
