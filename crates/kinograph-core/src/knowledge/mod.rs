//! Entity resolution and graph assembly
//!
//! The core pipeline of the crate:
//!
//! - **Resolution**: map each local item name to zero-or-more knowledge-base
//!   entities, tolerating per-item failure ([`EntityResolver`])
//! - **Expansion**: one hop of outgoing relations per resolved entity,
//!   tolerating per-entity failure ([`LinkExpander`])
//! - **Assembly**: deduplicate entity/name observations and fold the rows
//!   into a labeled directed graph with bounded subgraph extraction
//!   ([`KnowledgeGraph`])
//!
//! Rows flow through as immutable records: [`Item`] → [`EntityMatch`] →
//! [`LinkedEntity`] → [`ResultRow`]. Failures at the per-item granularity
//! become absent fields, never batch aborts; summary counts downstream keep
//! the data loss observable.

mod expander;
mod graph;
mod resolver;
mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use expander::LinkExpander;
pub use graph::KnowledgeGraph;
pub use resolver::{EntityResolver, film_query};
pub use types::{EntityMatch, Item, LinkedEntity, ResultRow, build_rows};
