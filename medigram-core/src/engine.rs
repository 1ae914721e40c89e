//! Engine assembly and the query router.
//!
//! [`SearchEngine`] owns one catalog snapshot together with everything
//! derived from it: the name arena and all four indexes. Building is a bulk
//! operation; afterwards the engine is immutable and every search is a pure
//! read. The `search` method is the query router of the system: it
//! validates the request, normalizes the query once, and dispatches to the
//! component matching the mode.

use medigram_types::{
    FuzzyConfig, QueryError, ScoredHit, SearchLimits, SearchMode, SearchRequest,
};
use tracing::{debug, info};

use crate::analyzer::normalizer::TextNormalizer;
use crate::arena::NameArena;
use crate::catalog::Catalog;
use crate::index::{IndexStats, Page, SearchContext, SearchIndexes};

/// Engine-wide configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EngineConfig {
    /// Request validation limits.
    pub limits: SearchLimits,
    /// Fuzzy-match threshold.
    pub fuzzy: FuzzyConfig,
}

/// One immutable catalog snapshot plus its indexes.
pub struct SearchEngine {
    catalog: Catalog,
    names: NameArena,
    indexes: SearchIndexes,
    normalizer: TextNormalizer,
    config: EngineConfig,
}

impl SearchEngine {
    /// Builds an engine with default configuration.
    pub fn build(catalog: Catalog) -> Self {
        Self::build_with(catalog, EngineConfig::default())
    }

    /// Builds an engine from a catalog snapshot.
    ///
    /// Normalizes every name, then constructs all four indexes. The
    /// returned engine never mutates again; refreshing the catalog means
    /// building a replacement (see [`crate::service::SearchService`]).
    pub fn build_with(catalog: Catalog, config: EngineConfig) -> Self {
        let normalizer = TextNormalizer::new();

        let mut names = NameArena::with_capacity(catalog.len() * 24, catalog.len());
        let mut buf = String::with_capacity(128);
        for record in catalog.records() {
            normalizer.normalize_into(&record.name, &mut buf);
            names.push(&buf);
        }

        let indexes = SearchIndexes::build(&catalog, &names, &normalizer, config.fuzzy);

        let engine = Self {
            catalog,
            names,
            indexes,
            normalizer,
            config,
        };
        info!(stats = %engine.stats(), "search engine built");
        engine
    }

    /// Returns the number of records the engine serves.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    /// Returns true if the engine serves an empty catalog.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    /// The catalog snapshot this engine was built from.
    #[inline(always)]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Returns index statistics.
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            num_records: self.catalog.len(),
            trigram_blocks: self.indexes.postings.block_count(),
            trigram_postings: self.indexes.postings.posting_count(),
            fuzzy_trigrams: self.indexes.fuzzy.pool_len(),
            distinct_terms: self.indexes.fulltext.distinct_terms(),
            term_postings: self.indexes.fulltext.posting_count(),
            name_bytes: self.names.bytes_used(),
        }
    }

    /// Routes one search request.
    ///
    /// Validates the query and pagination, normalizes the query once, and
    /// dispatches to the index matching `mode`. Zero matches is a
    /// successful empty result, never an error.
    ///
    /// # Errors
    ///
    /// Returns a [`QueryError`] when the query is blank or over the length
    /// limit, or when `limit` is zero or above the configured maximum.
    pub fn search(
        &self,
        mode: SearchMode,
        query: &str,
        limit: Option<usize>,
        offset: usize,
    ) -> Result<Vec<ScoredHit>, QueryError> {
        let limits = &self.config.limits;

        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(QueryError::EmptyQuery);
        }

        let len = trimmed.chars().count();
        if len > limits.max_query_len {
            return Err(QueryError::QueryTooLong {
                len,
                max: limits.max_query_len,
            });
        }

        let limit = limit.unwrap_or(limits.default_limit);
        if limit == 0 || limit > limits.max_limit {
            return Err(QueryError::LimitOutOfRange {
                limit,
                max: limits.max_limit,
            });
        }

        let normalized = self.normalizer.normalize(trimmed);
        if normalized.is_empty() {
            return Ok(Vec::new());
        }

        debug!(%mode, query = %normalized, limit, offset, "dispatching search");

        let cx = SearchContext {
            catalog: &self.catalog,
            names: &self.names,
            postings: &self.indexes.postings,
        };
        let page = Page { limit, offset };
        Ok(self.indexes.for_mode(mode).search(&cx, &normalized, page))
    }

    /// Convenience wrapper for [`SearchEngine::search`] over a request value.
    ///
    /// # Errors
    ///
    /// Same as [`SearchEngine::search`].
    pub fn handle(&self, request: &SearchRequest) -> Result<Vec<ScoredHit>, QueryError> {
        self.search(request.mode, &request.query, request.limit, request.offset)
    }
}
