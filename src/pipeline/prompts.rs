//! The prompt blocks sent to the model. These instruction texts are the
//! primary wire contract of the pipeline; change them deliberately or not
//! at all.

use super::state::{Edge, Node, ReviewState};

/// Fixed instruction for the multimodal graph-extraction call.
pub const DATA_EXTRACTION_PROMPT: &str = r#"
You are a vision-language model specialized in reading architecture diagrams and extracting their components.
Given an Azure architecture diagram image:

1. **Identify all services and components** used in the diagram.
   - Treat each service/component as a **node**.
   - For Azure-native managed components (e.g., App Service, Key Vault), use their standard names and type "platform".
   - For custom or third-party components, extract their labels from the image and use type "custom".
   - For systems outside the platform boundary, use type "external".
   - Include special infrastructure blocks such as firewalls, DNS, build agents, bastion hosts, and monitoring tools.
   - Capture zones or subnets if shown.

2. **Determine the interconnectivity** between components.
   - Each connection (e.g., arrow, line, pipeline) should become a **directed edge** between two nodes.
   - Respect the direction and label of the connection (e.g., HTTP request, private endpoint, secured access).
   - If labels or text are associated with the edges, extract and include them.

3. **Analyze the architecture** as an Architect and describe in detail so that it can be used to re-create the architecture.
   - Provide an elaborated description of the architecture.
   - Include the purpose of each component and how they interact.
   - List the information in a pointed format for clarity.
   - If any components are grouped or placed within a subnet, note that relationship.

4. **Output the extracted data** in the following JSON format:
```json
{
  "description": "A detailed description of the architecture diagram.",
  "nodes": [
    {"id": "App Service", "type": "platform", "label": "Azure App Service"},
    {"id": "OpenAI", "type": "platform", "label": "Azure OpenAI Service"},
    {"id": "Custom Agent", "type": "custom", "label": "Foundry Agent Service"},
    ...
  ],
  "edges": [
        {"source": "App Service", "target": "OpenAI", "label": "HTTP request"},
        {"source": "OpenAI", "target": "Custom Agent", "label": "API call"},
        ...
  ]
}
```

5. **Additional Guidelines**
- If any element is visually grouped or placed within a subnet, add that relationship as metadata.
- Perform OCR for custom components or blocks with text.
- Add "subnet" or "zone" as an optional field in nodes.
- Use "metadata" field in edges to include optional notes like protocol (HTTPS, REST, etc.)
"#;

/// Literal example schema for the cost-estimation response.
pub const COST_OUTPUT_FORMAT: &str = r#"
[
    {
        "service": "Service Name",
        "sku": "SKU of the service",
        "quantity": "Quantity of the service",
        "unit_price": "Unit price of the service",
        "monthly_cost": "Estimated monthly cost for the service",
        "currency": "Currency of the cost (e.g., USD)",
        "assumptions": "Assumptions made for the cost calculation (e.g., high availability, redundancy)"
    }
]
"#;

/// Cost-estimation prompt over the extracted graph.
pub fn build_cost_prompt(
    description: Option<&str>,
    nodes: &[Node],
    edges: &[Edge],
) -> String {
    let data = serde_json::json!({
        "description": description,
        "nodes": nodes,
        "edges": edges,
    });

    format!(
        r#"You are an expert in Azure architecture and cost estimation. Given the services in JSON format as input, calculate the estimated monthly cost for running the services in Azure. Use existing knowledge to find the latest pricing information for each service. Provide the cost breakdown for each service and the total estimated monthly cost.

Input: {data}

Output Format: {COST_OUTPUT_FORMAT}

Instructions:
1. Analyze the provided JSON input to identify the services and their configurations.
2. For each service, determine the SKU, quantity, and unit price based on Azure's pricing model.
3. Calculate the monthly cost for each service based on the quantity and unit price.
4. Assume the application will be deployed in Production mode with high availability and redundancy and suggest appropriate SKUs for production workloads.
5. Provide the final output in the specified JSON format.
6. Do not include any additional text or explanations in the output, only the JSON response.
"#
    )
}

/// Literal example schema for one service-review response, covering the
/// five Well-Architected pillars.
pub const RECOMMENDATION_OUTPUT_FORMAT: &str = r#"
[
    {
        "service_name": "Service Name",
        "review": "Review of the service",
        "recommendation": "Recommendation for the service",
        "pillar_in_review": "Pillar in review (Cost, Operational Excellence, Performance Efficiency, Reliability, Security)"
    },
    ...
]
"#;

/// Per-service review prompt: matched store content as ground-truth
/// context, the running description, and the output schema. The
/// architecture image is attached to the same call.
pub fn build_recommendation_prompt(
    service_label: &str,
    context: &str,
    description: Option<&str>,
) -> String {
    format!(
        r#"You are an Azure Architect. Given the architecture diagram and its summary, your task is to review the Azure service: {service_label} and provide recommendations based on service recommendations shared by Microsoft as context. The recommendations should be in all 5 pillars of the Azure Well-Architected Framework (WAF): Cost, Operational Excellence, Performance Efficiency, Reliability, and Security. The recommendations should help improve the Well Architected Score of the architecture.
Context: {context}
Architecture Summary: {summary}
Output Format: {RECOMMENDATION_OUTPUT_FORMAT}
"#,
        summary = description.unwrap_or(""),
    )
}

/// Final summarization prompt with the explicit markdown template.
pub fn build_summary_prompt(state: &ReviewState) -> String {
    format!(
        r#"Summarize the results of the data extraction and cost analysis. Present the results in a clear and detailed manner as an Architect. Use the following data to summarize:

## Data: {data}

## State Description:
- **Image Description**: Description of the architecture diagram.
- **Nodes**: Services and their details.
- **Edges**: Connections between the services.
- **Azure Services Cost**: Cost of each Azure service used in the architecture.
- **Service Recommendations**: Recommendations for each service based on the Azure Well-Architected Framework. Each recommendation should include:
    - **Service Name**: Name of the Azure service.
    - **Review**: Review of the service.
    - **Recommendation**: Recommendation for the service.
    - **Pillar in Review**: Pillar in review (Cost, Operational Excellence, Performance Efficiency, Reliability, Security).

## Instructions:
- Provide a comprehensive summary of the architecture diagram.
- Remember the data could be empty in few areas in the state, so handle it gracefully.
- Only fill the data that is available in the state.
- Do not include any data that is not available in the state.
- Only use the data provided in the state to summarize. Do not make assumptions or add any additional information from your knowledge.

## Formatting instructions:
- Use markdown format for the summary.
- Use headings to separate different sections of the summary.
- Use bullet points for lists.
- Convert Service Recommendations to a structured table format.
- Convert Azure Services Cost to a structured table format.
- Convert Nodes as list of dictionaries.

## Format of the summary should be in markdown format as follows:

### Architecture Summary
- **Image Description**: <<Image description here>>

- **Architecture Description**: <<Description of the architecture diagram>>

- **Services Used**: <<List of services used in the architecture diagram>>

### Cost Analysis
- **Summary of Azure Services Cost**: Create a summary of Azure services cost, total cost per month, and cost breakdown by service.

- **Total Cost**: <<Total cost of the architecture diagram>>
- **Azure Compute Services Cost**: <<Data should be in text format>>
- **Azure Storage Services Cost**: <<Data should be in text format>>
- **Azure Networking Services Cost**: <<Data should be in text format>>

- **Azure Services Cost**: <<Individual Azure service cost, should be in table format>>

### Service Recommendations
- **Recommendations**: <<Data should be in table format>>
"#,
        data = state.prompt_payload(),
    )
}
