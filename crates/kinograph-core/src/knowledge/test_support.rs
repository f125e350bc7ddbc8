//! In-memory knowledge-base stub for resolver/expander/pipeline tests

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::wikidata::{EntityLink, KnowledgeBase, SearchHit};

/// Programmable stand-in for the Wikidata client
#[derive(Default)]
pub struct StubKnowledgeBase {
    searches: HashMap<String, Vec<(String, String)>>,
    descriptions: HashMap<String, String>,
    links: HashMap<String, Vec<EntityLink>>,
    failing_searches: HashSet<String>,
    failing_describes: HashSet<String>,
    failing_links: HashSet<String>,
    link_calls: AtomicUsize,
}

impl StubKnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register search candidates, best first, for a query string
    pub fn with_search(mut self, query: &str, hits: &[(&str, &str)]) -> Self {
        self.searches.insert(
            query.to_string(),
            hits.iter()
                .map(|(id, label)| (id.to_string(), label.to_string()))
                .collect(),
        );
        self
    }

    pub fn with_description(mut self, entity_id: &str, description: &str) -> Self {
        self.descriptions
            .insert(entity_id.to_string(), description.to_string());
        self
    }

    pub fn with_links(mut self, entity_id: &str, links: &[(&str, &str, Option<&str>)]) -> Self {
        self.links.insert(
            entity_id.to_string(),
            links
                .iter()
                .map(|(target_id, target_name, relation)| EntityLink {
                    target_id: target_id.to_string(),
                    target_name: target_name.to_string(),
                    relation: relation.map(String::from),
                })
                .collect(),
        );
        self
    }

    /// Make search fail for a query (simulated service failure)
    pub fn with_search_failure(mut self, query: &str) -> Self {
        self.failing_searches.insert(query.to_string());
        self
    }

    pub fn with_describe_failure(mut self, entity_id: &str) -> Self {
        self.failing_describes.insert(entity_id.to_string());
        self
    }

    pub fn with_links_failure(mut self, entity_id: &str) -> Self {
        self.failing_links.insert(entity_id.to_string());
        self
    }

    /// How many times `linked_entities` was called
    pub fn link_calls(&self) -> usize {
        self.link_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KnowledgeBase for StubKnowledgeBase {
    async fn search(&self, name: &str) -> Result<Vec<SearchHit>> {
        if self.failing_searches.contains(name) {
            return Err(Error::KnowledgeBase(format!("stubbed failure for {name}")));
        }
        Ok(self
            .searches
            .get(name)
            .map(|hits| {
                hits.iter()
                    .enumerate()
                    .map(|(rank, (id, label))| SearchHit {
                        id: id.clone(),
                        label: label.clone(),
                        rank,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn describe(&self, entity_id: &str) -> Result<Option<String>> {
        if self.failing_describes.contains(entity_id) {
            return Err(Error::KnowledgeBase(format!(
                "stubbed describe failure for {entity_id}"
            )));
        }
        Ok(self.descriptions.get(entity_id).cloned())
    }

    async fn linked_entities(&self, entity_id: &str) -> Result<Vec<EntityLink>> {
        self.link_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_links.contains(entity_id) {
            return Err(Error::KnowledgeBase(format!(
                "stubbed expansion failure for {entity_id}"
            )));
        }
        Ok(self.links.get(entity_id).cloned().unwrap_or_default())
    }
}
