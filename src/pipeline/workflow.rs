//! The workflow controller: drives the five-state pipeline
//! START → data_extraction → cost_analysis → service_recommendations →
//! summarize_results → END over a single state record, merging each
//! step's delta and appending its status message.

use super::router::{next_step, Step};
use super::state::{ReviewState, StepUpdate};
use super::{cost, extract, recommend, summarize, WorkflowError};
use crate::llm::{ImageAttachment, LlmClient};
use crate::store::RecommendationStore;

/// Hard cap on routing iterations. The happy path takes four steps; the
/// cap turns a routing bug into an explicit error instead of a hang.
const MAX_ROUTER_STEPS: usize = 8;

/// Orchestrates the architecture review. Pure pipeline logic with
/// trait-based DI for the model client so the whole flow is testable
/// against mocks.
pub struct ReviewWorkflow {
    llm: Box<dyn LlmClient + Send + Sync>,
    store: RecommendationStore,
}

impl ReviewWorkflow {
    pub fn new(llm: Box<dyn LlmClient + Send + Sync>, store: RecommendationStore) -> Self {
        Self { llm, store }
    }

    /// Run the full pipeline for one uploaded image.
    ///
    /// On success the returned state carries a non-empty `summary`; a
    /// summarization failure still terminates normally with the error
    /// text in `summary`. Every other failure aborts the run.
    pub fn run(&self, image: ImageAttachment) -> Result<ReviewState, WorkflowError> {
        self.run_with_progress(image, |_, _| {})
    }

    /// Like [`run`], reporting each completed step and its status message
    /// to `progress` (used by the CLI to print pipeline progress).
    ///
    /// [`run`]: ReviewWorkflow::run
    pub fn run_with_progress(
        &self,
        image: ImageAttachment,
        mut progress: impl FnMut(Step, &str),
    ) -> Result<ReviewState, WorkflowError> {
        let mut state = ReviewState::new(image);
        let _span = tracing::info_span!("review_workflow", run_id = %state.run_id).entered();

        let mut steps_taken = 0usize;
        while let Some(step) = next_step(&state) {
            if steps_taken >= MAX_ROUTER_STEPS {
                return Err(WorkflowError::RouterStalled {
                    max: MAX_ROUTER_STEPS,
                });
            }
            steps_taken += 1;
            tracing::info!(step = %step, "Running pipeline step");

            let update = self.run_step(step, &state)?;
            let message = update.message.clone().unwrap_or_default();
            state.apply(update);
            progress(step, &message);
        }

        Ok(state)
    }

    fn run_step(&self, step: Step, state: &ReviewState) -> Result<StepUpdate, WorkflowError> {
        match step {
            Step::DataExtraction => extract::run(self.llm.as_ref(), state),
            Step::CostAnalysis => cost::run(self.llm.as_ref(), state),
            Step::ServiceRecommendations => {
                recommend::run(self.llm.as_ref(), &self.store, state)
            }
            Step::SummarizeResults => Ok(summarize::run(self.llm.as_ref(), state)),
        }
    }
}
