//! Entity resolution against the knowledge base
//!
//! Maps each local item to zero-or-more knowledge-base entities. A miss is
//! normal data (long-tail titles), a failed call is isolated to its item,
//! and the batch never aborts. Output order matches input order, one match
//! per item.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::wikidata::KnowledgeBase;

use super::types::{EntityMatch, Item};

/// Default query transform: append a disambiguating suffix so searches for
/// short titles land on the film entity.
pub fn film_query(item: &Item) -> String {
    format!("{} film", item.title)
}

/// Resolves item names to knowledge-base entities
pub struct EntityResolver<K: KnowledgeBase> {
    client: Arc<K>,
}

impl<K: KnowledgeBase> EntityResolver<K> {
    /// Create a resolver sharing the given client
    pub fn new(client: Arc<K>) -> Self {
        Self { client }
    }

    /// Resolve a batch of items, one EntityMatch per item, input order
    /// preserved.
    ///
    /// The first (highest-ranked) search candidate is accepted and the rest
    /// discarded. Descriptions are fetched for accepted entities; a
    /// description failure degrades to `None` rather than failing the match.
    pub async fn resolve<F>(&self, items: &[Item], name_transform: F) -> Vec<EntityMatch>
    where
        F: Fn(&Item) -> String,
    {
        let mut matches = Vec::with_capacity(items.len());

        for item in items {
            if item.title.trim().is_empty() {
                warn!(item_id = %item.id, "Item has an empty title, emitting unresolved match");
                matches.push(EntityMatch::unresolved(
                    item.title.clone(),
                    item.attributes.clone(),
                ));
                continue;
            }

            let query = name_transform(item);
            matches.push(self.resolve_one(item, query).await);
        }

        matches
    }

    async fn resolve_one(&self, item: &Item, query: String) -> EntityMatch {
        let hits = match self.client.search(&query).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!(item_id = %item.id, query = %query, error = %e, "Entity search failed, continuing batch");
                return EntityMatch::unresolved(query, item.attributes.clone());
            }
        };

        let Some(best) = hits.into_iter().next() else {
            debug!(item_id = %item.id, query = %query, "No entity candidates");
            return EntityMatch::unresolved(query, item.attributes.clone());
        };

        let description = match self.client.describe(&best.id).await {
            Ok(description) => description,
            Err(e) => {
                warn!(entity_id = %best.id, error = %e, "Description lookup failed");
                None
            }
        };

        EntityMatch {
            query_name: query,
            entity_id: Some(best.id),
            entity_label: Some(best.label),
            description,
            extras: item.attributes.clone(),
        }
    }
}
