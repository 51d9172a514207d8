//! Azgentica: architecture-diagram review pipeline.
//!
//! One run takes an encoded diagram image through four model-backed
//! steps (graph extraction, cost estimation, grounded service
//! recommendations, summarization) and produces a markdown report.

pub mod config;
pub mod llm;
pub mod pipeline;
pub mod store;

pub use llm::{AzureOpenAiClient, ImageAttachment, LlmClient, OllamaClient};
pub use pipeline::{ReviewState, ReviewWorkflow, WorkflowError};
pub use store::{RecommendationStore, StoreError};
