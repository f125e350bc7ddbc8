//! One-hop link expansion
//!
//! Queries the knowledge base for the outgoing links of every resolved
//! entity. Strictly one hop, to bound graph size and call volume. A failed
//! expansion skips that entity and the batch continues. Duplicate
//! (source, target) pairs are left in place; the assembler deduplicates.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::wikidata::KnowledgeBase;

use super::types::{EntityMatch, LinkedEntity};

/// Expands resolved entities by one hop of outgoing relations
pub struct LinkExpander<K: KnowledgeBase> {
    client: Arc<K>,
}

impl<K: KnowledgeBase> LinkExpander<K> {
    /// Create an expander sharing the given client
    pub fn new(client: Arc<K>) -> Self {
        Self { client }
    }

    /// Expand every resolved match by one hop.
    ///
    /// Matches with an absent `entity_id` contribute nothing. An entity id
    /// appearing in several matches is queried once; downstream joining by
    /// source id gives every such match the same links.
    pub async fn expand(&self, matches: &[EntityMatch]) -> Vec<LinkedEntity> {
        let mut links = Vec::new();
        let mut expanded: HashSet<&str> = HashSet::new();

        for entity_match in matches {
            let Some(entity_id) = entity_match.entity_id.as_deref() else {
                continue;
            };
            if !expanded.insert(entity_id) {
                debug!(entity_id, "Entity already expanded, skipping repeat query");
                continue;
            }

            let source_name = entity_match
                .entity_label
                .clone()
                .unwrap_or_else(|| entity_match.query_name.clone());

            match self.client.linked_entities(entity_id).await {
                Ok(outgoing) => {
                    debug!(entity_id, links = outgoing.len(), "Expanded entity");
                    links.extend(outgoing.into_iter().map(|link| LinkedEntity {
                        source_entity_id: entity_id.to_string(),
                        source_name: source_name.clone(),
                        target_entity_id: link.target_id,
                        target_name: link.target_name,
                        relation_description: link.relation,
                    }));
                }
                Err(e) => {
                    warn!(entity_id, error = %e, "Link expansion failed, continuing batch");
                }
            }
        }

        links
    }
}
