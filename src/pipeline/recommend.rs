//! Per-service review generation. Each platform node is grounded in the
//! recommendation store and reviewed by the model against the five
//! Well-Architected pillars, one call per node, strictly sequentially.

use super::prompts::build_recommendation_prompt;
use super::response::parse_fenced_rows_lenient;
use super::state::{NodeKind, Recommendation, ReviewState, StepUpdate};
use super::WorkflowError;
use crate::llm::LlmClient;
use crate::store::RecommendationStore;

pub fn run(
    llm: &dyn LlmClient,
    store: &RecommendationStore,
    state: &ReviewState,
) -> Result<StepUpdate, WorkflowError> {
    let _span = tracing::info_span!("service_recommendations", run_id = %state.run_id).entered();

    // Fresh accumulator each pass: the result replaces the state field
    // wholesale, so re-running the step never unions with stale rows.
    let mut generated: Vec<Recommendation> = Vec::new();

    for node in &state.nodes {
        if node.kind != NodeKind::Platform {
            tracing::warn!(node = %node.id, kind = %node.kind, "Skipping non-platform node");
            continue;
        }

        let Some(context) = store.match_label(&node.label) else {
            tracing::warn!(service = %node.label, "No recommendations found for service");
            continue;
        };

        let prompt = build_recommendation_prompt(
            &node.label,
            context,
            state.image_description.as_deref(),
        );
        let raw = llm.generate_with_image(&prompt, None, &state.uploaded_image)?;

        let (rows, skipped): (Vec<Recommendation>, usize) = parse_fenced_rows_lenient(&raw)?;
        if skipped > 0 {
            tracing::warn!(service = %node.label, skipped, "Dropped malformed recommendation rows");
        }
        generated.extend(rows);
    }

    tracing::info!(rows = generated.len(), "Service recommendations generated");

    Ok(StepUpdate {
        recommendations: Some(generated),
        message: Some("Service recommendations generated".into()),
        ..Default::default()
    })
}
