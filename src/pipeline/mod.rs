pub mod cost;
pub mod dot;
pub mod extract;
pub mod prompts;
pub mod recommend;
pub mod response;
pub mod router;
pub mod state;
pub mod summarize;
pub mod workflow;

pub use response::ResponseError;
pub use router::Step;
pub use state::*;
pub use workflow::ReviewWorkflow;

use thiserror::Error;

use crate::llm::LlmError;

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("No image provided for data extraction")]
    MissingImage,

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Response(#[from] ResponseError),

    #[error("Routing exceeded {max} steps without reaching a terminal state")]
    RouterStalled { max: usize },
}
