//! Deterministic step routing over field completeness. The model is
//! never asked which step comes next; the state answers.

use super::state::ReviewState;

/// The four working states of the pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    DataExtraction,
    CostAnalysis,
    ServiceRecommendations,
    SummarizeResults,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DataExtraction => write!(f, "data_extraction"),
            Self::CostAnalysis => write!(f, "cost_analysis"),
            Self::ServiceRecommendations => write!(f, "service_recommendations"),
            Self::SummarizeResults => write!(f, "summarize_results"),
        }
    }
}

/// Which step runs next, or `None` when the state is terminal.
///
/// Image not yet processed → extraction; costs unset → cost analysis;
/// recommendations unset → recommendations; summary unset → summarize;
/// everything set → finish. "Unset" is `None`, so a step that legitimately
/// produced an empty list never re-runs.
pub fn next_step(state: &ReviewState) -> Option<Step> {
    if state.image_description.is_none() {
        Some(Step::DataExtraction)
    } else if state.service_costs.is_none() {
        Some(Step::CostAnalysis)
    } else if state.recommendations.is_none() {
        Some(Step::ServiceRecommendations)
    } else if state.summary.is_none() {
        Some(Step::SummarizeResults)
    } else {
        None
    }
}
