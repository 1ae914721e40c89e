//! Shared engine handle with swap-on-rebuild.
//!
//! The engine is immutable once built, so concurrent readers need no
//! locking - what they need is a consistent snapshot. [`SearchService`]
//! keeps the active engine behind an `Arc` and refreshes it by building a
//! complete replacement off to the side, then swapping the pointer. An
//! in-flight reader keeps whichever snapshot it started with; no reader
//! ever observes a half-built index.

use std::sync::Arc;

use medigram_types::{QueryError, ScoredHit, SearchRequest};
use parking_lot::RwLock;
use tracing::info;

use crate::catalog::Catalog;
use crate::engine::{EngineConfig, SearchEngine};

/// Process-wide handle to the active [`SearchEngine`].
pub struct SearchService {
    current: RwLock<Arc<SearchEngine>>,
}

impl SearchService {
    /// Wraps an already-built engine.
    pub fn new(engine: SearchEngine) -> Self {
        Self {
            current: RwLock::new(Arc::new(engine)),
        }
    }

    /// Builds an engine from `catalog` and serves it.
    pub fn from_catalog(catalog: Catalog) -> Self {
        Self::new(SearchEngine::build(catalog))
    }

    /// Snapshot of the active engine.
    ///
    /// The snapshot stays valid (and unchanged) across later rebuilds;
    /// take a fresh one per request to observe swaps.
    pub fn engine(&self) -> Arc<SearchEngine> {
        self.current.read().clone()
    }

    /// Routes one request against the current snapshot.
    ///
    /// # Errors
    ///
    /// Propagates validation failures from the query router.
    pub fn search(&self, request: &SearchRequest) -> Result<Vec<ScoredHit>, QueryError> {
        self.engine().handle(request)
    }

    /// Rebuilds from a fresh catalog with default configuration and
    /// publishes the result atomically.
    pub fn rebuild(&self, catalog: Catalog) {
        self.rebuild_with(catalog, EngineConfig::default());
    }

    /// Rebuilds from a fresh catalog and publishes the result atomically.
    ///
    /// The replacement engine is fully built before the swap, so readers
    /// only ever see the old index or the new one, never a mix.
    pub fn rebuild_with(&self, catalog: Catalog, config: EngineConfig) {
        let fresh = Arc::new(SearchEngine::build_with(catalog, config));
        *self.current.write() = fresh;
        info!("search engine swapped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Record;
    use medigram_types::SearchMode;

    fn catalog(rows: &[(u64, &str)]) -> Catalog {
        let mut catalog = Catalog::new();
        for &(id, name) in rows {
            catalog.insert(Record::new(id, name)).unwrap();
        }
        catalog
    }

    #[test]
    fn serves_searches_from_the_current_engine() {
        let service = SearchService::from_catalog(catalog(&[(1, "Paracetamol 500mg")]));
        let hits = service
            .search(&SearchRequest::new(SearchMode::Prefix, "para"))
            .unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn rebuild_publishes_the_new_catalog() {
        let service = SearchService::from_catalog(catalog(&[(1, "Paracetamol 500mg")]));
        service.rebuild(catalog(&[(2, "Ibuprofen 400mg")]));

        let request = SearchRequest::new(SearchMode::Prefix, "ibu");
        let hits = service.search(&request).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 2);

        let gone = SearchRequest::new(SearchMode::Prefix, "para");
        assert!(service.search(&gone).unwrap().is_empty());
    }

    #[test]
    fn snapshots_survive_a_swap() {
        let service = SearchService::from_catalog(catalog(&[(1, "Paracetamol 500mg")]));
        let snapshot = service.engine();

        service.rebuild(catalog(&[(2, "Ibuprofen 400mg")]));

        // The old snapshot still answers from the old index.
        let hits = snapshot
            .search(SearchMode::Prefix, "para", None, 0)
            .unwrap();
        assert_eq!(hits.len(), 1);

        // A fresh snapshot sees the swap.
        assert_eq!(service.engine().len(), 1);
        assert!(service
            .engine()
            .search(SearchMode::Prefix, "para", None, 0)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn concurrent_readers_during_swaps() {
        let service = std::sync::Arc::new(SearchService::from_catalog(catalog(&[(
            1,
            "Paracetamol 500mg",
        )])));

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let service = std::sync::Arc::clone(&service);
                scope.spawn(move || {
                    for _ in 0..50 {
                        let request = SearchRequest::new(SearchMode::Fuzzy, "paracetamol");
                        // Either generation answers; a result is always
                        // internally consistent.
                        let hits = service.search(&request).unwrap();
                        assert!(hits.len() <= 1);
                    }
                });
            }

            for generation in 0..10u64 {
                service.rebuild(catalog(&[(generation + 1, "Paracetamol 500mg")]));
            }
        });
    }
}
