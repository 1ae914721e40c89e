//! Prefix index.
//!
//! An ordered table of record positions sorted by (normalized name, id).
//! All records sharing a prefix form one contiguous run in that order, so a
//! query is a binary-search lower bound plus a bounded forward scan, and
//! results come out already in the contract order.

use medigram_types::ScoredHit;

use crate::arena::NameArena;
use crate::catalog::Catalog;
use crate::index::{ModeSearch, Page, SearchContext};

pub(crate) struct PrefixIndex {
    /// Record positions sorted by (normalized name, record id).
    order: Vec<u32>,
}

impl PrefixIndex {
    pub fn build(catalog: &Catalog, names: &NameArena) -> Self {
        let mut order: Vec<u32> = (0..catalog.len() as u32).collect();
        order.sort_unstable_by(|&a, &b| {
            let key_a = (names.get(a).unwrap_or(""), catalog.get(a).map_or(0, |r| r.id));
            let key_b = (names.get(b).unwrap_or(""), catalog.get(b).map_or(0, |r| r.id));
            key_a.cmp(&key_b)
        });
        Self { order }
    }
}

impl ModeSearch for PrefixIndex {
    fn search(&self, cx: &SearchContext<'_>, query: &str, page: Page) -> Vec<ScoredHit> {
        let start = self
            .order
            .partition_point(|&pos| cx.names.get(pos).unwrap_or("") < query);

        self.order[start..]
            .iter()
            .take_while(|&&pos| {
                cx.names
                    .get(pos)
                    .is_some_and(|name| name.as_bytes().starts_with(query.as_bytes()))
            })
            .skip(page.offset)
            .take(page.limit)
            .filter_map(|&pos| cx.hit(pos, None))
            .collect()
    }
}
