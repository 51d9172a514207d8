use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::llm::ImageAttachment;

/// Component category assigned by the extraction model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Cloud-managed platform service (App Service, Key Vault, ...).
    Platform,
    /// Custom or third-party component drawn into the diagram.
    Custom,
    /// System outside the platform boundary.
    External,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Platform => write!(f, "platform"),
            Self::Custom => write!(f, "custom"),
            Self::External => write!(f, "external"),
        }
    }
}

/// One extracted architectural component. Identity is `id`, unique within
/// a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet: Option<String>,
}

/// One extracted directed relationship between two nodes. Source/target
/// reference node ids; the reference is a contract with the extraction
/// model, not validated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

/// One per-service cost estimate row, as returned by the model.
///
/// All fields stay textual: no numeric validation (currency, rounding,
/// sign) happens locally, correctness is delegated to the model. Numbers
/// in the response are accepted and rendered to strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRow {
    pub service: String,
    #[serde(default, deserialize_with = "stringy")]
    pub sku: Option<String>,
    #[serde(default, deserialize_with = "stringy")]
    pub quantity: Option<String>,
    #[serde(default, deserialize_with = "stringy")]
    pub unit_price: Option<String>,
    #[serde(default, deserialize_with = "stringy")]
    pub monthly_cost: Option<String>,
    #[serde(default, deserialize_with = "stringy")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "stringy")]
    pub assumptions: Option<String>,
}

/// Accept string, number, or bool where the model was asked for text.
fn stringy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// One of the five Well-Architected pillars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pillar {
    Cost,
    #[serde(rename = "Operational Excellence")]
    OperationalExcellence,
    #[serde(rename = "Performance Efficiency")]
    PerformanceEfficiency,
    Reliability,
    Security,
}

impl std::fmt::Display for Pillar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cost => write!(f, "Cost"),
            Self::OperationalExcellence => write!(f, "Operational Excellence"),
            Self::PerformanceEfficiency => write!(f, "Performance Efficiency"),
            Self::Reliability => write!(f, "Reliability"),
            Self::Security => write!(f, "Security"),
        }
    }
}

/// One generated service review row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub service_name: String,
    pub review: String,
    pub recommendation: String,
    #[serde(default)]
    pub pillar_in_review: Option<Pillar>,
}

/// The single state record threaded through the pipeline.
///
/// Fields start unset/empty and are only ever replaced wholesale by the
/// step that owns them, via [`StepUpdate`] deltas merged in [`apply`].
/// `Option` distinguishes "step has not run" from "step ran and produced
/// an empty list", which is what the router keys on.
///
/// [`apply`]: ReviewState::apply
#[derive(Debug, Clone)]
pub struct ReviewState {
    pub run_id: Uuid,
    pub uploaded_image: ImageAttachment,
    pub image_description: Option<String>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub service_costs: Option<Vec<CostRow>>,
    pub recommendations: Option<Vec<Recommendation>>,
    pub summary: Option<String>,
    pub messages: Vec<String>,
}

impl ReviewState {
    pub fn new(uploaded_image: ImageAttachment) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            uploaded_image,
            image_description: None,
            nodes: Vec::new(),
            edges: Vec::new(),
            service_costs: None,
            recommendations: None,
            summary: None,
            messages: Vec::new(),
        }
    }

    /// Merge a step's delta. `Some` fields replace wholesale; the status
    /// message is appended to the ordered log.
    pub fn apply(&mut self, update: StepUpdate) {
        if let Some(description) = update.image_description {
            self.image_description = Some(description);
        }
        if let Some(nodes) = update.nodes {
            self.nodes = nodes;
        }
        if let Some(edges) = update.edges {
            self.edges = edges;
        }
        if let Some(costs) = update.service_costs {
            self.service_costs = Some(costs);
        }
        if let Some(recommendations) = update.recommendations {
            self.recommendations = Some(recommendations);
        }
        if let Some(summary) = update.summary {
            self.summary = Some(summary);
        }
        if let Some(message) = update.message {
            self.messages.push(message);
        }
    }

    /// Content fields serialized for the summarization prompt. The raw
    /// image and the status log are deliberately left out.
    pub fn prompt_payload(&self) -> serde_json::Value {
        json!({
            "image_description": self.image_description,
            "nodes": self.nodes,
            "edges": self.edges,
            "azure_services_cost": self.service_costs,
            "service_recommendations": self.recommendations,
        })
    }
}

/// Delta returned by a pipeline step; merged by the controller.
#[derive(Debug, Default)]
pub struct StepUpdate {
    pub image_description: Option<String>,
    pub nodes: Option<Vec<Node>>,
    pub edges: Option<Vec<Edge>>,
    pub service_costs: Option<Vec<CostRow>>,
    pub recommendations: Option<Vec<Recommendation>>,
    pub summary: Option<String>,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_state() -> ReviewState {
        ReviewState::new(ImageAttachment::new("aGVsbG8=".into(), "image/png".into()))
    }

    #[test]
    fn new_state_has_only_image_set() {
        let state = blank_state();
        assert!(state.image_description.is_none());
        assert!(state.nodes.is_empty());
        assert!(state.edges.is_empty());
        assert!(state.service_costs.is_none());
        assert!(state.recommendations.is_none());
        assert!(state.summary.is_none());
        assert!(state.messages.is_empty());
    }

    #[test]
    fn apply_replaces_owned_fields_and_appends_message() {
        let mut state = blank_state();
        state.apply(StepUpdate {
            image_description: Some("a web app".into()),
            nodes: Some(vec![Node {
                id: "app".into(),
                kind: NodeKind::Platform,
                label: "Azure App Service".into(),
                subnet: None,
            }]),
            message: Some("Extracted data from image".into()),
            ..Default::default()
        });
        state.apply(StepUpdate {
            message: Some("Cost analysis completed".into()),
            ..Default::default()
        });

        assert_eq!(state.image_description.as_deref(), Some("a web app"));
        assert_eq!(state.nodes.len(), 1);
        assert_eq!(
            state.messages,
            vec!["Extracted data from image", "Cost analysis completed"]
        );
        // untouched fields stay unset
        assert!(state.service_costs.is_none());
        assert!(state.summary.is_none());
    }

    #[test]
    fn empty_list_is_distinct_from_unset() {
        let mut state = blank_state();
        assert!(state.recommendations.is_none());
        state.apply(StepUpdate {
            recommendations: Some(Vec::new()),
            ..Default::default()
        });
        assert_eq!(state.recommendations.as_deref(), Some(&[][..]));
    }

    #[test]
    fn node_kind_round_trips_lowercase() {
        let node: Node = serde_json::from_str(
            r#"{"id": "kv", "type": "platform", "label": "Azure Key Vault"}"#,
        )
        .unwrap();
        assert_eq!(node.kind, NodeKind::Platform);
        let json = serde_json::to_string(&node).unwrap();
        assert!(json.contains("\"type\":\"platform\""));
        assert!(!json.contains("subnet"));
    }

    #[test]
    fn unknown_node_kind_fails_to_parse() {
        let result: Result<Node, _> = serde_json::from_str(
            r#"{"id": "x", "type": "mystery", "label": "X"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn pillar_parses_spaced_names() {
        let pillar: Pillar = serde_json::from_str("\"Operational Excellence\"").unwrap();
        assert_eq!(pillar, Pillar::OperationalExcellence);
        assert_eq!(pillar.to_string(), "Operational Excellence");
    }

    #[test]
    fn cost_row_accepts_numbers_for_text_fields() {
        let row: CostRow = serde_json::from_str(
            r#"{
                "service": "Azure App Service",
                "sku": "P1v3",
                "quantity": 2,
                "unit_price": 113.88,
                "monthly_cost": "227.76",
                "currency": "USD"
            }"#,
        )
        .unwrap();
        assert_eq!(row.quantity.as_deref(), Some("2"));
        assert_eq!(row.unit_price.as_deref(), Some("113.88"));
        assert_eq!(row.monthly_cost.as_deref(), Some("227.76"));
        assert!(row.assumptions.is_none());
    }

    #[test]
    fn recommendation_pillar_may_be_null() {
        let rec: Recommendation = serde_json::from_str(
            r#"{
                "service_name": "Azure App Service",
                "review": "No autoscale configured",
                "recommendation": "Enable autoscale rules",
                "pillar_in_review": null
            }"#,
        )
        .unwrap();
        assert!(rec.pillar_in_review.is_none());
    }

    #[test]
    fn prompt_payload_excludes_image_and_messages() {
        let mut state = blank_state();
        state.apply(StepUpdate {
            image_description: Some("desc".into()),
            message: Some("step done".into()),
            ..Default::default()
        });
        let payload = state.prompt_payload();
        let text = payload.to_string();
        assert!(text.contains("\"image_description\":\"desc\""));
        assert!(!text.contains("aGVsbG8="));
        assert!(!text.contains("step done"));
    }
}
