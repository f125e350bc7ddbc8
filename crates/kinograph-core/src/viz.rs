//! Graphviz DOT rendering
//!
//! Thin visualization surface: a read-only walk over an already-bounded
//! subgraph producing DOT text. Layout is delegated to Graphviz; nothing is
//! rendered in-process. Nodes without an observed label fall back to their
//! entity id.

use crate::knowledge::KnowledgeGraph;

/// Render a graph as a Graphviz `digraph`
pub fn render_dot(graph: &KnowledgeGraph) -> String {
    let mut out = String::from("digraph knowledge {\n");
    out.push_str("  node [shape=ellipse, fontsize=9];\n");

    for node in graph.nodes() {
        match graph.label(node) {
            Some(label) => {
                out.push_str(&format!(
                    "  \"{}\" [label=\"{}\"];\n",
                    escape(node),
                    escape(label)
                ));
            }
            None => out.push_str(&format!("  \"{}\";\n", escape(node))),
        }
    }

    for (source, target) in graph.edges() {
        out.push_str(&format!(
            "  \"{}\" -> \"{}\";\n",
            escape(source),
            escape(target)
        ));
    }

    out.push_str("}\n");
    out
}

/// Escape quotes and backslashes for DOT string literals
fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
