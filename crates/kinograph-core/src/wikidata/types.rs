//! Wire types for the Wikidata APIs

use std::collections::HashMap;

use serde::Deserialize;

/// One candidate returned by entity search
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// Entity id, e.g. `Q171048`
    pub id: String,
    /// Label reported by the knowledge base
    pub label: String,
    /// Position in the relevance-ordered response, 0 = best
    pub rank: usize,
}

/// One outgoing relation of an entity
#[derive(Debug, Clone)]
pub struct EntityLink {
    pub target_id: String,
    pub target_name: String,
    /// Property label, e.g. "production company"
    pub relation: Option<String>,
}

/// `wbsearchentities` response body
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub search: Vec<SearchEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchEntry {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
}

/// `wbgetentities` response body, trimmed to descriptions
#[derive(Debug, Deserialize)]
pub(crate) struct EntitiesResponse {
    #[serde(default)]
    pub entities: HashMap<String, EntityEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EntityEntry {
    #[serde(default)]
    pub descriptions: HashMap<String, TermValue>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TermValue {
    pub value: String,
}

/// SPARQL JSON results envelope
#[derive(Debug, Deserialize)]
pub(crate) struct SparqlResponse {
    pub results: SparqlResults,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SparqlResults {
    #[serde(default)]
    pub bindings: Vec<HashMap<String, SparqlValue>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SparqlValue {
    pub value: String,
}
