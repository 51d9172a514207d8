//! Graphviz DOT export of the extracted graph, for rendering the
//! architecture outside the pipeline (`dot -Tpng`).

use super::state::{Edge, Node, NodeKind};

fn fill_color(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Platform => "skyblue",
        NodeKind::Custom => "orange",
        NodeKind::External => "lightgreen",
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Render nodes and edges as a directed Graphviz graph. Node fill color
/// encodes the component kind; edge labels carry the extracted
/// connection text.
pub fn to_dot(nodes: &[Node], edges: &[Edge]) -> String {
    let mut out = String::from("digraph architecture {\n");
    out.push_str("    rankdir=LR;\n");
    out.push_str("    node [shape=box, style=filled, fontname=\"Helvetica\"];\n");

    for node in nodes {
        out.push_str(&format!(
            "    \"{}\" [label=\"{}\", fillcolor=\"{}\"];\n",
            escape(&node.id),
            escape(&node.label),
            fill_color(node.kind),
        ));
    }

    for edge in edges {
        if edge.label.is_empty() {
            out.push_str(&format!(
                "    \"{}\" -> \"{}\";\n",
                escape(&edge.source),
                escape(&edge.target),
            ));
        } else {
            out.push_str(&format!(
                "    \"{}\" -> \"{}\" [label=\"{}\"];\n",
                escape(&edge.source),
                escape(&edge.target),
                escape(&edge.label),
            ));
        }
    }

    out.push_str("}\n");
    out
}
