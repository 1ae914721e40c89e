//! Relevance-ranked full-text search.
//!
//! A token inverted index over each record's name, composition, and
//! manufacturer. Build time tokenizes every field, folds the per-record
//! term frequencies (weighted by field), and appends one posting per
//! (term, record). Document frequency is simply each posting list's
//! length, so idf needs no separate bookkeeping.
//!
//! Scoring is `Σ weighted_tf · ln(1 + N/df)` over the query's distinct
//! terms - a free-text OR query, not a boolean one. The exact numbers are
//! not a contract; what tests pin down is monotonicity: matching more
//! terms, rarer terms, or the same term more often never ranks a record
//! lower.

use medigram_types::ScoredHit;
use rustc_hash::FxHashMap;

use crate::analyzer::normalizer::TextNormalizer;
use crate::analyzer::tokenizer::{Field, Tokenizer};
use crate::catalog::Catalog;
use crate::index::{ModeSearch, Page, SearchContext};

/// One term occurrence list entry.
#[derive(Clone, Copy)]
struct TermEntry {
    pos: u32,
    /// Field-weighted term frequency within the record.
    weight: f32,
}

pub(crate) struct FulltextIndex {
    terms: FxHashMap<Box<str>, Vec<TermEntry>>,
    total_records: usize,
}

impl FulltextIndex {
    pub fn build(catalog: &Catalog, normalizer: &TextNormalizer) -> Self {
        let mut terms: FxHashMap<Box<str>, Vec<TermEntry>> = FxHashMap::default();
        let mut buf = String::with_capacity(128);
        let mut tf: FxHashMap<String, f32> = FxHashMap::default();

        for (pos, record) in catalog.records().iter().enumerate() {
            tf.clear();

            let fields = [
                (Some(record.name.as_str()), Field::Name),
                (record.short_composition.as_deref(), Field::Composition),
                (record.manufacturer_name.as_deref(), Field::Manufacturer),
            ];

            for (text, field) in fields {
                let Some(text) = text else { continue };
                normalizer.normalize_into(text, &mut buf);
                Tokenizer::new(field).tokenize(&buf, |token, field, _| {
                    *tf.entry(token.to_string()).or_insert(0.0) += field.weight();
                });
            }

            for (term, weight) in tf.drain() {
                terms
                    .entry(term.into_boxed_str())
                    .or_default()
                    .push(TermEntry {
                        pos: pos as u32,
                        weight,
                    });
            }
        }

        Self {
            terms,
            total_records: catalog.len(),
        }
    }

    /// Number of distinct terms.
    #[inline(always)]
    pub fn distinct_terms(&self) -> usize {
        self.terms.len()
    }

    /// Total postings across all terms.
    pub fn posting_count(&self) -> usize {
        self.terms.values().map(Vec::len).sum()
    }
}

impl ModeSearch for FulltextIndex {
    fn search(&self, cx: &SearchContext<'_>, query: &str, page: Page) -> Vec<ScoredHit> {
        // Distinct query terms; duplicates carry no extra intent in a
        // free-text query.
        let mut query_terms: Vec<&str> = Vec::new();
        Tokenizer::new(Field::Name).tokenize(query, |token, _, _| {
            if !query_terms.contains(&token) {
                query_terms.push(token);
            }
        });

        let total = self.total_records as f32;
        let mut scores: FxHashMap<u32, f32> = FxHashMap::default();

        for term in query_terms {
            let Some(entries) = self.terms.get(term) else {
                continue;
            };
            let idf = (1.0 + total / entries.len() as f32).ln();
            for entry in entries {
                *scores.entry(entry.pos).or_insert(0.0) += entry.weight * idf;
            }
        }

        let mut scored: Vec<(u32, f32)> = scores.into_iter().collect();
        scored.sort_unstable_by(|&(a, sa), &(b, sb)| {
            sb.total_cmp(&sa)
                .then_with(|| cx.order_key(a).cmp(&cx.order_key(b)))
        });

        scored
            .into_iter()
            .skip(page.offset)
            .take(page.limit)
            .filter_map(|(pos, score)| cx.hit(pos, Some(score)))
            .collect()
    }
}
