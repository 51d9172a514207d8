//! Image data extraction: one multimodal call turning the uploaded
//! diagram into a typed graph plus a running description.

use serde::Deserialize;

use super::prompts::DATA_EXTRACTION_PROMPT;
use super::response::{parse_fenced, rows_lenient};
use super::state::{Edge, Node, ReviewState, StepUpdate};
use super::WorkflowError;
use crate::llm::LlmClient;

/// Top-level shape the extraction model must return. All three keys are
/// required; node and edge rows are deserialized leniently afterwards.
#[derive(Deserialize)]
struct ExtractionPayload {
    description: String,
    nodes: Vec<serde_json::Value>,
    edges: Vec<serde_json::Value>,
}

pub fn run(llm: &dyn LlmClient, state: &ReviewState) -> Result<StepUpdate, WorkflowError> {
    if state.uploaded_image.is_empty() {
        return Err(WorkflowError::MissingImage);
    }

    let _span = tracing::info_span!("data_extraction", run_id = %state.run_id).entered();

    let raw = llm.generate_with_image(DATA_EXTRACTION_PROMPT, None, &state.uploaded_image)?;
    let payload: ExtractionPayload = parse_fenced(&raw)?;

    let (nodes, skipped_nodes): (Vec<Node>, usize) = rows_lenient(payload.nodes);
    let (edges, skipped_edges): (Vec<Edge>, usize) = rows_lenient(payload.edges);
    if skipped_nodes > 0 || skipped_edges > 0 {
        tracing::warn!(
            skipped_nodes,
            skipped_edges,
            "Dropped malformed graph rows from extraction response"
        );
    }

    tracing::info!(
        nodes = nodes.len(),
        edges = edges.len(),
        "Extracted architecture graph from image"
    );

    Ok(StepUpdate {
        image_description: Some(payload.description),
        nodes: Some(nodes),
        edges: Some(edges),
        message: Some("Extracted data from image".into()),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ImageAttachment, MockLlmClient};
    use crate::pipeline::state::NodeKind;

    fn state_with_image() -> ReviewState {
        ReviewState::new(ImageAttachment::new("aW1n".into(), "image/png".into()))
    }

    fn extraction_response() -> &'static str {
        r#"```json
{
  "description": "An App Service fronting a storage account.",
  "nodes": [
    {"id": "app", "type": "platform", "label": "Azure App Service"},
    {"id": "blob", "type": "platform", "label": "Storage Account", "subnet": "data-subnet"}
  ],
  "edges": [
    {"source": "app", "target": "blob", "label": "writes", "metadata": {"protocol": "HTTPS"}}
  ]
}
```"#
    }

    #[test]
    fn extracts_description_nodes_and_edges() {
        let llm = MockLlmClient::new(extraction_response());
        let state = state_with_image();

        let update = run(&llm, &state).unwrap();
        assert_eq!(
            update.image_description.as_deref(),
            Some("An App Service fronting a storage account.")
        );
        let nodes = update.nodes.unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].kind, NodeKind::Platform);
        assert_eq!(nodes[1].subnet.as_deref(), Some("data-subnet"));
        let edges = update.edges.unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].label, "writes");
        assert!(update.message.is_some());
        // not owned by this step
        assert!(update.service_costs.is_none());
        assert!(update.summary.is_none());
    }

    #[test]
    fn missing_image_fails_before_any_model_call() {
        let llm = MockLlmClient::new(extraction_response());
        let state = ReviewState::new(ImageAttachment::new(String::new(), "image/png".into()));

        let result = run(&llm, &state);
        assert!(matches!(result, Err(WorkflowError::MissingImage)));
        assert_eq!(llm.call_count(), 0);
    }

    #[test]
    fn unparsable_response_is_fatal() {
        let llm = MockLlmClient::new("no json block to be found");
        let state = state_with_image();

        let result = run(&llm, &state);
        assert!(matches!(result, Err(WorkflowError::Response(_))));
    }

    #[test]
    fn missing_top_level_key_is_fatal() {
        let llm = MockLlmClient::new(r#"```json
{"description": "d", "nodes": []}
```"#);
        let state = state_with_image();
        assert!(matches!(run(&llm, &state), Err(WorkflowError::Response(_))));
    }

    #[test]
    fn malformed_graph_rows_are_skipped_not_fatal() {
        let llm = MockLlmClient::new(
            r#"```json
{
  "description": "d",
  "nodes": [
    {"id": "app", "type": "platform", "label": "Azure App Service"},
    {"id": "ghost", "type": "mystery", "label": "?"}
  ],
  "edges": [{"bad": true}]
}
```"#,
        );
        let state = state_with_image();

        let update = run(&llm, &state).unwrap();
        assert_eq!(update.nodes.unwrap().len(), 1);
        assert!(update.edges.unwrap().is_empty());
    }
}
