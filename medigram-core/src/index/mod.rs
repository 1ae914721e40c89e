//! Index components for the four search strategies.
//!
//! All four indexes are built together from one catalog snapshot and are
//! read-only afterwards: every search runs over immutable postings with no
//! locking. Each strategy implements the same [`ModeSearch`] contract, and
//! the router dispatches on [`SearchMode`] to the matching component.
//!
//! Memory layout follows the engine-wide discipline: posting lists in one
//! contiguous array, per-record trigram sets in one flat pool, normalized
//! names in one arena. Components share state through [`SearchContext`]
//! instead of owning copies; in particular the substring strategy reuses
//! the fuzzy strategy's trigram postings as its candidate filter.

mod fulltext;
mod fuzzy;
mod postings;
mod prefix;
mod stats;
mod substring;

pub use stats::IndexStats;

pub(crate) use postings::{TrigramEntry, TrigramPostings};

use medigram_types::{FuzzyConfig, RecordId, ScoredHit, SearchMode};

use crate::analyzer::normalizer::TextNormalizer;
use crate::analyzer::trigram::padded_set;
use crate::arena::NameArena;
use crate::catalog::Catalog;

/// Borrowed view of the engine state handed to each mode component.
pub(crate) struct SearchContext<'a> {
    pub catalog: &'a Catalog,
    pub names: &'a NameArena,
    pub postings: &'a TrigramPostings,
}

impl SearchContext<'_> {
    /// Sort key for the shared ordering contract: normalized name
    /// ascending, then record id ascending.
    #[inline]
    pub(crate) fn order_key(&self, pos: u32) -> (&str, RecordId) {
        (
            self.names.get(pos).unwrap_or(""),
            self.catalog.get(pos).map_or(0, |r| r.id),
        )
    }

    /// Materializes one hit from the catalog record at `pos`.
    pub(crate) fn hit(&self, pos: u32, score: Option<f32>) -> Option<ScoredHit> {
        let record = self.catalog.get(pos)?;
        Some(ScoredHit {
            id: record.id,
            name: record.name.clone(),
            manufacturer_name: record.manufacturer_name.clone(),
            price: record.price,
            score,
        })
    }
}

/// Validated paging window.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Page {
    pub limit: usize,
    pub offset: usize,
}

/// Common contract every mode component implements.
///
/// `query` arrives trimmed, validated, and normalized; it is never empty.
/// Implementations order their results per the mode's contract *before*
/// applying the page window, so pagination is stable and non-overlapping.
pub(crate) trait ModeSearch {
    fn search(&self, cx: &SearchContext<'_>, query: &str, page: Page) -> Vec<ScoredHit>;
}

/// All four mode components, built together from one catalog snapshot.
pub(crate) struct SearchIndexes {
    pub postings: TrigramPostings,
    pub prefix: prefix::PrefixIndex,
    pub substring: substring::SubstringIndex,
    pub fuzzy: fuzzy::FuzzyIndex,
    pub fulltext: fulltext::FulltextIndex,
}

impl SearchIndexes {
    /// Builds every index in one pass over the catalog.
    ///
    /// `names` must hold the normalized name of every record, at the
    /// record's catalog position.
    pub fn build(
        catalog: &Catalog,
        names: &NameArena,
        normalizer: &TextNormalizer,
        fuzzy_config: FuzzyConfig,
    ) -> Self {
        debug_assert_eq!(catalog.len(), names.len());

        let mut entries: Vec<TrigramEntry> = Vec::new();
        let mut fuzzy = fuzzy::FuzzyIndex::new(fuzzy_config);

        for pos in 0..catalog.len() as u32 {
            let name = names.get(pos).unwrap_or("");
            let set = padded_set(name);
            for &trigram in &set {
                entries.push(TrigramEntry { trigram, pos });
            }
            fuzzy.push_set(&set);
        }

        Self {
            postings: TrigramPostings::build(entries),
            prefix: prefix::PrefixIndex::build(catalog, names),
            substring: substring::SubstringIndex,
            fuzzy,
            fulltext: fulltext::FulltextIndex::build(catalog, normalizer),
        }
    }

    /// Returns the component answering `mode`.
    pub fn for_mode(&self, mode: SearchMode) -> &dyn ModeSearch {
        match mode {
            SearchMode::Prefix => &self.prefix,
            SearchMode::Substring => &self.substring,
            SearchMode::Fuzzy => &self.fuzzy,
            SearchMode::Fulltext => &self.fulltext,
        }
    }
}
