//! Substring containment search.
//!
//! Arbitrary substring search cannot be sub-linear over a sorted table, so
//! this component filters first and verifies second: the fuzzy index's
//! trigram postings produce a candidate set, and every candidate is checked
//! for true containment before inclusion. The filter is purely a
//! performance device - verification alone decides membership, so it can
//! never admit a false match, and a record containing the query necessarily
//! contains every interior trigram of the query, so the filter can never
//! drop a true one.

use memchr::memmem;
use medigram_types::{ScoredHit, Trigram};
use smallvec::SmallVec;

use crate::analyzer::trigram::extract_inner;
use crate::index::{ModeSearch, Page, SearchContext};

/// Queries shorter than a trigram fall back to scanning every record.
const MIN_FILTER_LEN: usize = 3;

pub(crate) struct SubstringIndex;

impl ModeSearch for SubstringIndex {
    fn search(&self, cx: &SearchContext<'_>, query: &str, page: Page) -> Vec<ScoredHit> {
        let query_bytes = query.as_bytes();

        let candidates: Vec<u32> = if query_bytes.len() >= MIN_FILTER_LEN {
            let mut trigrams: SmallVec<[Trigram; 32]> = SmallVec::new();
            extract_inner(query, |t| trigrams.push(t));

            // Seed from the rarest posting list; an absent trigram proves
            // no record can contain the query.
            let mut seed: Option<&[u32]> = None;
            for &t in &trigrams {
                let list = cx.postings.lookup(t);
                if list.is_empty() {
                    return Vec::new();
                }
                if seed.is_none_or(|s| list.len() < s.len()) {
                    seed = Some(list);
                }
            }
            match seed {
                Some(list) => list.to_vec(),
                None => return Vec::new(),
            }
        } else {
            (0..cx.catalog.len() as u32).collect()
        };

        let finder = memmem::Finder::new(query_bytes);
        let mut hits: Vec<u32> = candidates
            .into_iter()
            .filter(|&pos| {
                cx.names
                    .get(pos)
                    .is_some_and(|name| finder.find(name.as_bytes()).is_some())
            })
            .collect();

        hits.sort_unstable_by(|&a, &b| cx.order_key(a).cmp(&cx.order_key(b)));

        hits.into_iter()
            .skip(page.offset)
            .take(page.limit)
            .filter_map(|pos| cx.hit(pos, None))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::index::tests::{fixture, page, search};
    use medigram_types::SearchMode;

    #[test]
    fn finds_matches_anywhere_in_the_name() {
        let fx = fixture(&[
            (1, "Paracetamol 500mg"),
            (2, "Hexylparaben Cream"),
            (3, "Ibuprofen 400mg"),
        ]);

        let hits = search(&fx, SearchMode::Substring, "para", page(10, 0));
        let ids: Vec<u64> = hits.iter().map(|h| h.id).collect();
        // "hexylparaben cream" < "paracetamol 500mg" in name order
        assert_eq!(ids, vec![2, 1]);
        assert!(hits.iter().all(|h| h.score.is_none()));
    }

    #[test]
    fn containment_is_exact_not_fuzzy() {
        let fx = fixture(&[(1, "Paracetamol 500mg")]);
        // One deleted letter: similar, but not contained.
        assert!(search(&fx, SearchMode::Substring, "paracetmol", page(10, 0)).is_empty());
    }

    #[test]
    fn short_queries_scan_the_full_record_set() {
        let fx = fixture(&[(1, "Vitamin B12"), (2, "Dolo 650"), (3, "Zincovit")]);

        let hits = search(&fx, SearchMode::Substring, "b1", page(10, 0));
        let ids: Vec<u64> = hits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![1]);

        let hits = search(&fx, SearchMode::Substring, "o", page(10, 0));
        let ids: Vec<u64> = hits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn query_spanning_a_space_matches() {
        let fx = fixture(&[(1, "Dolo 650"), (2, "Dolores Syrup")]);
        let hits = search(&fx, SearchMode::Substring, "lo 65", page(10, 0));
        let ids: Vec<u64> = hits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn results_ordered_by_name_then_id() {
        let fx = fixture(&[
            (5, "Beta Gel"),
            (2, "Alpha Gel"),
            (9, "Alpha Gel"),
        ]);
        let hits = search(&fx, SearchMode::Substring, "gel", page(10, 0));
        let ids: Vec<u64> = hits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![2, 9, 5]);
    }

    #[test]
    fn absent_trigram_short_circuits_to_empty() {
        let fx = fixture(&[(1, "Paracetamol 500mg"), (2, "Ibuprofen 400mg")]);
        assert!(search(&fx, SearchMode::Substring, "xyzq", page(10, 0)).is_empty());
    }
}
