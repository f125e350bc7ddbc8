//! Core record types for the resolution pipeline
//!
//! Items come from the local dataset, EntityMatches from name resolution,
//! LinkedEntities from one-hop expansion, and ResultRows are the flattened
//! (item x link) units that get exported and graphed. All of them are
//! produced once per run and never mutated afterwards.

use std::collections::HashMap;

/// A local dataset row to be resolved against the knowledge base
#[derive(Debug, Clone)]
pub struct Item {
    /// Local identifier (the MovieLens item id)
    pub id: String,
    /// Human-readable name used for entity search
    pub title: String,
    /// Open bag of caller-supplied metadata carried through to result rows
    pub attributes: HashMap<String, String>,
}

impl Item {
    /// Create an item with empty attributes
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            attributes: HashMap::new(),
        }
    }

    /// Attach an attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// Result of resolving one item name against the knowledge base
///
/// `entity_id` is `None` when the search returned no candidate — a
/// legitimate zero-match for long-tail titles, not an error. When candidates
/// exist, exactly the top-ranked one is accepted.
#[derive(Debug, Clone)]
pub struct EntityMatch {
    /// The query string the knowledge base was searched with
    pub query_name: String,
    /// Accepted entity id, absent on a miss or an isolated failure
    pub entity_id: Option<String>,
    /// Label reported by the knowledge base for the accepted entity
    pub entity_label: Option<String>,
    /// Short description of the entity, when one could be fetched
    pub description: Option<String>,
    /// The originating item's attributes
    pub extras: HashMap<String, String>,
}

impl EntityMatch {
    /// An unresolved match: search missed, call failed, or input malformed
    pub fn unresolved(query_name: impl Into<String>, extras: HashMap<String, String>) -> Self {
        Self {
            query_name: query_name.into(),
            entity_id: None,
            entity_label: None,
            description: None,
            extras,
        }
    }

    /// Whether a knowledge-base entity was accepted for this item
    pub fn is_resolved(&self) -> bool {
        self.entity_id.is_some()
    }
}

/// One outgoing relation discovered from a resolved entity
#[derive(Debug, Clone)]
pub struct LinkedEntity {
    pub source_entity_id: String,
    pub source_name: String,
    pub target_entity_id: String,
    pub target_name: String,
    pub relation_description: Option<String>,
}

/// Flattened (item x linked-entity) unit, one per row of the export
///
/// Items with no resolved entity or no outgoing links still produce one row
/// with the link fields absent.
#[derive(Debug, Clone)]
pub struct ResultRow {
    pub query_name: String,
    pub entity_id: Option<String>,
    pub entity_label: Option<String>,
    pub description: Option<String>,
    pub extras: HashMap<String, String>,
    pub target_entity_id: Option<String>,
    pub target_name: Option<String>,
    pub relation_description: Option<String>,
}

impl ResultRow {
    /// Row for a match with no link attached
    pub fn from_match(entity_match: &EntityMatch) -> Self {
        Self {
            query_name: entity_match.query_name.clone(),
            entity_id: entity_match.entity_id.clone(),
            entity_label: entity_match.entity_label.clone(),
            description: entity_match.description.clone(),
            extras: entity_match.extras.clone(),
            target_entity_id: None,
            target_name: None,
            relation_description: None,
        }
    }

    /// Row for one (match, link) pair
    pub fn from_link(entity_match: &EntityMatch, link: &LinkedEntity) -> Self {
        let mut row = Self::from_match(entity_match);
        row.target_entity_id = Some(link.target_entity_id.clone());
        row.target_name = Some(link.target_name.clone());
        row.relation_description = link.relation_description.clone();
        row
    }

    /// Whether this row carries a link
    pub fn has_link(&self) -> bool {
        self.target_entity_id.is_some()
    }
}

/// Join matches with their discovered links into the flattened row set.
///
/// Links are keyed by source entity id, so two items that resolved to the
/// same entity share that entity's links. Matches without an entity or
/// without links contribute exactly one row with the link fields absent.
pub fn build_rows(matches: &[EntityMatch], links: &[LinkedEntity]) -> Vec<ResultRow> {
    let mut by_source: HashMap<&str, Vec<&LinkedEntity>> = HashMap::new();
    for link in links {
        by_source
            .entry(link.source_entity_id.as_str())
            .or_default()
            .push(link);
    }

    let mut rows = Vec::new();
    for entity_match in matches {
        let matched_links = entity_match
            .entity_id
            .as_deref()
            .and_then(|id| by_source.get(id))
            .filter(|links| !links.is_empty());

        match matched_links {
            Some(matched) => {
                for link in matched {
                    rows.push(ResultRow::from_link(entity_match, link));
                }
            }
            None => rows.push(ResultRow::from_match(entity_match)),
        }
    }

    rows
}
