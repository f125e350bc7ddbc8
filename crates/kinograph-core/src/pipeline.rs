//! End-to-end pipeline orchestration
//!
//! Runs resolve → expand → join → assemble over a batch of items and
//! reports summary counts. The run never aborts on per-item failures; a run
//! with a flaky knowledge base completes with fewer populated fields, and
//! the summary makes that visible.

use std::sync::Arc;

use tracing::info;

use crate::knowledge::{
    EntityResolver, Item, KnowledgeGraph, LinkExpander, ResultRow, build_rows, film_query,
};
use crate::wikidata::KnowledgeBase;

/// Output of one pipeline run
#[derive(Debug)]
pub struct PipelineRun {
    /// Flattened (item x link) rows, ready for export
    pub rows: Vec<ResultRow>,
    /// Graph assembled from the rows
    pub graph: KnowledgeGraph,
    /// Counts reported so silent data loss is observable
    pub summary: RunSummary,
}

/// Summary counts for a pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub total_items: usize,
    pub resolved_items: usize,
    pub links_found: usize,
    pub rows: usize,
    pub nodes: usize,
    pub edges: usize,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Pipeline Summary")?;
        writeln!(f, "================")?;
        writeln!(f, "Items:     {}", self.total_items)?;
        writeln!(f, "Resolved:  {}", self.resolved_items)?;
        writeln!(f, "Links:     {}", self.links_found)?;
        writeln!(f, "Rows:      {}", self.rows)?;
        writeln!(f, "Nodes:     {}", self.nodes)?;
        write!(f, "Edges:     {}", self.edges)
    }
}

/// Resolve-expand-assemble pipeline over a shared knowledge-base client
pub struct Pipeline<K: KnowledgeBase> {
    resolver: EntityResolver<K>,
    expander: LinkExpander<K>,
}

impl<K: KnowledgeBase> Pipeline<K> {
    /// Create a pipeline sharing the given client
    pub fn new(client: Arc<K>) -> Self {
        Self {
            resolver: EntityResolver::new(client.clone()),
            expander: LinkExpander::new(client),
        }
    }

    /// Run the pipeline with the default `" film"` query transform
    pub async fn run(&self, items: &[Item]) -> PipelineRun {
        self.run_with_transform(items, film_query).await
    }

    /// Run the pipeline with a custom query transform
    pub async fn run_with_transform<F>(&self, items: &[Item], name_transform: F) -> PipelineRun
    where
        F: Fn(&Item) -> String,
    {
        info!(items = items.len(), "Resolving items against the knowledge base");
        let matches = self.resolver.resolve(items, name_transform).await;
        let resolved_items = matches.iter().filter(|m| m.is_resolved()).count();

        info!(resolved = resolved_items, "Expanding resolved entities by one hop");
        let links = self.expander.expand(&matches).await;

        let rows = build_rows(&matches, &links);
        let graph = KnowledgeGraph::assemble(&rows);

        let summary = RunSummary {
            total_items: items.len(),
            resolved_items,
            links_found: links.len(),
            rows: rows.len(),
            nodes: graph.node_count(),
            edges: graph.edge_count(),
        };

        info!(
            items = summary.total_items,
            resolved = summary.resolved_items,
            rows = summary.rows,
            nodes = summary.nodes,
            edges = summary.edges,
            "Pipeline run complete"
        );

        PipelineRun {
            rows,
            graph,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::test_support::StubKnowledgeBase;

    fn toy_story() -> Item {
        Item::new("1", "Toy Story").with_attribute("ItemId", "1")
    }

    #[tokio::test]
    async fn test_end_to_end_toy_story() {
        let stub = StubKnowledgeBase::new()
            .with_search("Toy Story film", &[("Q1", "Toy Story")])
            .with_links("Q1", &[("Q2", "Pixar", Some("production company"))]);
        let pipeline = Pipeline::new(Arc::new(stub));

        let run = pipeline.run(&[toy_story()]).await;

        assert_eq!(run.rows.len(), 1);
        let row = &run.rows[0];
        assert_eq!(row.entity_id.as_deref(), Some("Q1"));
        assert_eq!(row.target_entity_id.as_deref(), Some("Q2"));
        assert_eq!(row.target_name.as_deref(), Some("Pixar"));
        assert_eq!(row.extras.get("ItemId").map(String::as_str), Some("1"));

        assert_eq!(run.graph.nodes(), &["Q1", "Q2"]);
        assert_eq!(run.graph.edges(), &[("Q1".to_string(), "Q2".to_string())]);
        assert_eq!(run.graph.label("Q1"), Some("Toy Story"));
        assert_eq!(run.graph.label("Q2"), Some("Pixar"));

        assert_eq!(
            run.summary,
            RunSummary {
                total_items: 1,
                resolved_items: 1,
                links_found: 1,
                rows: 1,
                nodes: 2,
                edges: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_failed_item_leaves_batch_intact() {
        let stub = StubKnowledgeBase::new()
            .with_search_failure("Broken film")
            .with_search("Toy Story film", &[("Q1", "Toy Story")])
            .with_links("Q1", &[("Q2", "Pixar", None), ("Q3", "John Lasseter", None)]);
        let pipeline = Pipeline::new(Arc::new(stub));

        let items = vec![
            Item::new("1", "Broken").with_attribute("ItemId", "1"),
            toy_story(),
        ];
        let run = pipeline.run(&items).await;

        // One absent row for the failed item plus one row per link
        assert_eq!(run.rows.len(), 3);
        assert!(!run.rows[0].has_link());
        assert!(run.rows[0].entity_id.is_none());
        assert_eq!(run.summary.resolved_items, 1);
        assert_eq!(run.summary.total_items, 2);
    }

    #[tokio::test]
    async fn test_zero_candidate_items_contribute_one_row_each() {
        let stub = StubKnowledgeBase::new();
        let pipeline = Pipeline::new(Arc::new(stub));

        let items = vec![toy_story(), Item::new("2", "Obscure Sequel")];
        let run = pipeline.run(&items).await;

        assert_eq!(run.rows.len(), 2);
        assert!(run.rows.iter().all(|r| r.entity_id.is_none()));
        assert!(run.graph.is_empty());
        assert_eq!(run.summary.resolved_items, 0);
    }

    #[tokio::test]
    async fn test_custom_transform_is_applied() {
        let stub = StubKnowledgeBase::new().with_search("Toy Story", &[("Q1", "Toy Story")]);
        let pipeline = Pipeline::new(Arc::new(stub));

        let run = pipeline
            .run_with_transform(&[toy_story()], |item| item.title.clone())
            .await;

        assert_eq!(run.rows[0].entity_id.as_deref(), Some("Q1"));
        assert_eq!(run.rows[0].query_name, "Toy Story");
    }

    #[test]
    fn test_summary_display_includes_counts() {
        let summary = RunSummary {
            total_items: 50,
            resolved_items: 42,
            links_found: 310,
            rows: 318,
            nodes: 280,
            edges: 305,
        };
        let text = summary.to_string();
        assert!(text.contains("Items:     50"));
        assert!(text.contains("Edges:     305"));
    }
}
