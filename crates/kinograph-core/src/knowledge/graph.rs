//! Graph assembly from result rows
//!
//! A `KnowledgeGraph` is a simple directed-edge-set graph: insertion-ordered
//! nodes, deduplicated edges, and a label per node wherever a name was
//! observed. It is derived data — rebuildable at any time from the same
//! ResultRow set, never mutated incrementally outside assembly. No cycle
//! detection, no weights; layout and traversal belong to the visualization
//! collaborator.

use std::collections::{HashMap, HashSet};

use super::types::ResultRow;

/// Directed graph of knowledge-base entities
#[derive(Debug, Clone, Default)]
pub struct KnowledgeGraph {
    /// Nodes in insertion order of first appearance
    nodes: Vec<String>,
    node_set: HashSet<String>,
    /// Distinct (source, target) pairs in insertion order
    edges: Vec<(String, String)>,
    edge_set: HashSet<(String, String)>,
    labels: HashMap<String, String>,
}

impl KnowledgeGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from the full row set.
    ///
    /// Edges come from every row carrying both a source and a target entity
    /// id; self-loops are kept (an entity may link to itself). Labels take
    /// source-role names over target-role names when an id was observed with
    /// conflicting names — a deterministic tie-break, never an error.
    pub fn assemble(rows: &[ResultRow]) -> Self {
        let mut graph = Self::new();

        for row in rows {
            if let (Some(source), Some(target)) = (&row.entity_id, &row.target_entity_id) {
                graph.add_edge(source.clone(), target.clone());
            }
        }

        // Source-role labels first so they win over target-role names.
        for row in rows {
            if let (Some(id), Some(label)) = (&row.entity_id, &row.entity_label) {
                graph.set_label_if_absent(id, label);
            }
        }
        for row in rows {
            if let (Some(id), Some(name)) = (&row.target_entity_id, &row.target_name) {
                graph.set_label_if_absent(id, name);
            }
        }

        graph
    }

    /// Add a node unless already present; insertion order is preserved
    pub fn add_node(&mut self, id: String) {
        if self.node_set.insert(id.clone()) {
            self.nodes.push(id);
        }
    }

    /// Add an edge and both endpoints; duplicate edges are ignored
    pub fn add_edge(&mut self, source: String, target: String) {
        self.add_node(source.clone());
        self.add_node(target.clone());
        let edge = (source, target);
        if self.edge_set.insert(edge.clone()) {
            self.edges.push(edge);
        }
    }

    fn set_label_if_absent(&mut self, id: &str, label: &str) {
        if !self.labels.contains_key(id) {
            self.labels.insert(id.to_string(), label.to_string());
        }
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// Distinct edges in insertion order
    pub fn edges(&self) -> &[(String, String)] {
        &self.edges
    }

    /// Observed labels by entity id
    pub fn labels(&self) -> &HashMap<String, String> {
        &self.labels
    }

    /// Label for one node, if any name was observed for it
    pub fn label(&self, id: &str) -> Option<&str> {
        self.labels.get(id).map(String::as_str)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_set.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Induced subgraph over the first `node_limit` nodes in insertion
    /// order: every edge with both endpoints selected, labels restricted to
    /// the selection. A limit at or above the node count returns the whole
    /// graph.
    pub fn extract_subgraph(&self, node_limit: usize) -> KnowledgeGraph {
        let selected: Vec<String> = self.nodes.iter().take(node_limit).cloned().collect();
        let selected_set: HashSet<&str> = selected.iter().map(String::as_str).collect();

        let mut subgraph = KnowledgeGraph::new();
        for node in &selected {
            subgraph.add_node(node.clone());
        }
        for (source, target) in &self.edges {
            if selected_set.contains(source.as_str()) && selected_set.contains(target.as_str()) {
                subgraph.add_edge(source.clone(), target.clone());
            }
        }
        for node in &selected {
            if let Some(label) = self.labels.get(node) {
                subgraph.labels.insert(node.clone(), label.clone());
            }
        }

        subgraph
    }

    /// Labels restricted to the given node set; unlabeled nodes are
    /// silently omitted so layout never sees a missing entry.
    pub fn filter_labels(&self, nodes: &HashSet<String>) -> HashMap<String, String> {
        self.labels
            .iter()
            .filter(|(id, _)| nodes.contains(*id))
            .map(|(id, label)| (id.clone(), label.clone()))
            .collect()
    }
}
