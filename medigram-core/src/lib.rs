//! Multi-strategy search engine core for medicine catalogs.
//!
//! Medigram answers four kinds of query over one catalog of medicine
//! records - exact prefix, substring containment, trigram fuzzy matching,
//! and relevance-ranked full text - each with a shared ordering and
//! pagination contract.
//!
//! The pipeline: a [`Catalog`](catalog::Catalog) is bulk-loaded from JSON,
//! a [`SearchEngine`](engine::SearchEngine) is built from it (normalized
//! names, trigram postings, per-record trigram sets, token postings), and
//! from then on every search is a lock-free read over immutable
//! structures. Refreshing the catalog builds a replacement engine and
//! swaps it atomically via [`SearchService`](service::SearchService).
//!
//! ```
//! use medigram_core::{Catalog, Record, SearchEngine};
//! use medigram_types::SearchMode;
//!
//! let mut catalog = Catalog::new();
//! catalog.insert(Record::new(1, "Paracetamol 500mg")).unwrap();
//! catalog.insert(Record::new(2, "Ibuprofen 400mg")).unwrap();
//!
//! let engine = SearchEngine::build(catalog);
//! let hits = engine.search(SearchMode::Prefix, "para", None, 0).unwrap();
//! assert_eq!(hits[0].id, 1);
//! ```

pub mod analyzer;
pub mod catalog;
pub mod engine;
pub mod service;

mod arena;
mod index;

pub use catalog::{Catalog, IngestReport, Record};
pub use engine::{EngineConfig, SearchEngine};
pub use index::IndexStats;
pub use service::SearchService;
