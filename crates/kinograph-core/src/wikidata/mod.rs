//! Wikidata knowledge-base client
//!
//! Three capabilities back the pipeline: entity search by name
//! (wbsearchentities), description lookup (wbgetentities), and one-hop
//! outgoing-link enumeration (SPARQL against the query service). All three
//! surface network and service errors as recoverable per-call failures; the
//! resolver and expander absorb them item by item.

mod client;
mod types;

use async_trait::async_trait;

use crate::error::Result;

pub use client::{WikidataClient, WikidataClientBuilder};
pub use types::{EntityLink, SearchHit};

/// External knowledge base with entity search, description, and relation
/// queries.
///
/// Implementations must be safe for concurrent use; the pipeline shares one
/// client across all lookups.
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    /// Search entities by name, best match first
    async fn search(&self, name: &str) -> Result<Vec<SearchHit>>;

    /// Fetch an entity's short description, if it has one
    async fn describe(&self, entity_id: &str) -> Result<Option<String>>;

    /// Enumerate an entity's outgoing links, one hop only
    async fn linked_entities(&self, entity_id: &str) -> Result<Vec<EntityLink>>;
}
