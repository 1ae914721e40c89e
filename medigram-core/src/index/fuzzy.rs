//! Trigram-similarity fuzzy search.
//!
//! Every record's boundary-padded trigram set is precomputed into one flat
//! pool at build time. A query unions the posting lists of its own trigrams
//! to get candidates (a record with zero shared trigrams has similarity
//! zero and can be skipped soundly), scores each candidate with the exact
//! Jaccard index, drops everything under the configured threshold, and
//! orders by score, name, id.
//!
//! Queries whose normalized form is shorter than one trigram carry no
//! usable trigram signal; they skip the pipeline and score by exact
//! equality of normalized names instead.

use medigram_types::{FuzzyConfig, ScoredHit, Trigram};

use crate::analyzer::trigram::{padded_set, similarity};
use crate::index::{ModeSearch, Page, SearchContext};

pub(crate) struct FuzzyIndex {
    /// Per-record (offset, len) into `pool`.
    spans: Vec<(u32, u32)>,
    /// Sorted, deduplicated trigram sets, back to back.
    pool: Vec<Trigram>,
    config: FuzzyConfig,
}

impl FuzzyIndex {
    pub fn new(config: FuzzyConfig) -> Self {
        Self {
            spans: Vec::new(),
            pool: Vec::new(),
            config,
        }
    }

    /// Appends the trigram set of the next record position.
    ///
    /// Must be called once per record, in position order.
    pub fn push_set(&mut self, set: &[Trigram]) {
        self.spans.push((self.pool.len() as u32, set.len() as u32));
        self.pool.extend_from_slice(set);
    }

    /// Total trigrams across all record sets.
    #[inline(always)]
    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    #[inline(always)]
    fn set_of(&self, pos: u32) -> &[Trigram] {
        match self.spans.get(pos as usize) {
            Some(&(offset, len)) => &self.pool[offset as usize..(offset + len) as usize],
            None => &[],
        }
    }

    /// Exact-equality scoring for queries too short to carry a trigram
    /// signal: equal normalized names score 1.0, everything else is out.
    fn search_exact(&self, cx: &SearchContext<'_>, query: &str, page: Page) -> Vec<ScoredHit> {
        let mut hits: Vec<u32> = (0..cx.catalog.len() as u32)
            .filter(|&pos| cx.names.get(pos) == Some(query))
            .collect();

        hits.sort_unstable_by(|&a, &b| cx.order_key(a).cmp(&cx.order_key(b)));

        hits.into_iter()
            .skip(page.offset)
            .take(page.limit)
            .filter_map(|pos| cx.hit(pos, Some(1.0)))
            .collect()
    }
}

impl ModeSearch for FuzzyIndex {
    fn search(&self, cx: &SearchContext<'_>, query: &str, page: Page) -> Vec<ScoredHit> {
        if query.len() < 3 {
            return self.search_exact(cx, query, page);
        }

        let query_set = padded_set(query);

        let mut candidates: Vec<u32> = Vec::new();
        for &t in &query_set {
            candidates.extend_from_slice(cx.postings.lookup(t));
        }
        candidates.sort_unstable();
        candidates.dedup();

        let mut scored: Vec<(u32, f32)> = candidates
            .into_iter()
            .filter_map(|pos| {
                let score = similarity(&query_set, self.set_of(pos));
                (score >= self.config.min_similarity).then_some((pos, score))
            })
            .collect();

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

#[cfg(test)]
mod tests {
    use crate::index::tests::{fixture, fixture_with, page, search};
    use medigram_types::{FuzzyConfig, SearchMode};

    #[test]
    fn tolerates_a_dropped_letter() {
        let fx = fixture(&[
            (1, "Paracetamol 500mg"),
            (2, "Paracetamol 650mg"),
            (3, "Ibuprofen 400mg"),
        ]);

        let hits = search(&fx, SearchMode::Fuzzy, "Paracetmol", page(10, 0));
        let ids: Vec<u64> = hits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(hits.iter().all(|h| h.score.is_some()));
    }

    #[test]
    fn exact_name_scores_one() {
        let fx = fixture(&[(1, "Dolo 650")]);
        let hits = search(&fx, SearchMode::Fuzzy, "Dolo 650", page(10, 0));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].score, Some(1.0));
    }

    #[test]
    fn unrelated_names_fall_under_threshold() {
        let fx = fixture(&[(1, "Paracetamol 500mg"), (2, "Zincovit Tablet")]);
        let hits = search(&fx, SearchMode::Fuzzy, "paracetamol", page(10, 0));
        let ids: Vec<u64> = hits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn scores_sort_descending() {
        let fx = fixture(&[
            (1, "Amoxicillin 250"),
            (2, "Amoxicillin 250mg Capsule"),
        ]);
        let hits = search(&fx, SearchMode::Fuzzy, "amoxicillin 250", page(10, 0));
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, 1);
        assert!(hits[0].score.unwrap() > hits[1].score.unwrap());
    }

    #[test]
    fn equal_scores_tie_break_by_name_then_id() {
        let fx = fixture(&[(9, "Dolo 650"), (4, "Dolo 650")]);
        let hits = search(&fx, SearchMode::Fuzzy, "Dolo 650", page(10, 0));
        let ids: Vec<u64> = hits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![4, 9]);
    }

    #[test]
    fn threshold_is_configurable() {
        let rows = [(1u64, "Paracetamol 500mg"), (2, "Ibuprofen 400mg")];

        let strict = fixture_with(&rows, FuzzyConfig { min_similarity: 0.95 });
        assert!(search(&strict, SearchMode::Fuzzy, "paracetmol", page(10, 0)).is_empty());

        let lenient = fixture_with(&rows, FuzzyConfig::lenient());
        let hits = search(&lenient, SearchMode::Fuzzy, "paracetmol", page(10, 0));
        assert_eq!(hits[0].id, 1);
    }

    #[test]
    fn short_query_falls_back_to_exact_equality() {
        let fx = fixture(&[(1, "B6"), (2, "B6 Forte"), (3, "Zn")]);

        let hits = search(&fx, SearchMode::Fuzzy, "b6", page(10, 0));
        let ids: Vec<u64> = hits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![1]);
        assert_eq!(hits[0].score, Some(1.0));

        assert!(search(&fx, SearchMode::Fuzzy, "b7", page(10, 0)).is_empty());
    }

    #[test]
    fn no_shared_trigram_means_no_candidates() {
        let fx = fixture(&[(1, "Paracetamol 500mg")]);
        assert!(search(&fx, SearchMode::Fuzzy, "xyzw", page(10, 0)).is_empty());
    }
}
