//! Kinograph Core Library
//!
//! This crate provides the core functionality for Kinograph, including:
//! - MovieLens 100k dataset loading and sampling
//! - Wikidata client (entity search, descriptions, one-hop links)
//! - Entity resolution and link expansion with per-item failure isolation
//! - Graph assembly, bounded subgraph extraction, and label filtering
//! - CSV export and Graphviz DOT rendering

pub mod config;
pub mod error;
pub mod export;
pub mod knowledge;
pub mod movielens;
pub mod pipeline;
pub mod viz;
pub mod wikidata;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::knowledge::{Item, KnowledgeGraph, ResultRow};
    pub use crate::pipeline::{Pipeline, PipelineRun, RunSummary};
    pub use crate::wikidata::{KnowledgeBase, WikidataClient};
}
