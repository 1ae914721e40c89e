//! Statistics and IndexStats.

/// A snapshot of index statistics.
#[derive(Debug, Clone, Copy)]
pub struct IndexStats {
    /// Number of records in the catalog.
    pub num_records: usize,
    /// Number of distinct trigrams with a posting list.
    pub trigram_blocks: usize,
    /// Total trigram postings.
    pub trigram_postings: usize,
    /// Trigrams held in per-record fuzzy sets.
    pub fuzzy_trigrams: usize,
    /// Distinct full-text terms.
    pub distinct_terms: usize,
    /// Total full-text postings.
    pub term_postings: usize,
    /// Bytes of normalized name text.
    pub name_bytes: usize,
}

impl IndexStats {
    /// Returns approximate memory usage of the index structures in bytes.
    pub fn memory_usage_bytes(&self) -> usize {
        let trigram_blocks = self.trigram_blocks * 12;
        let trigram_postings = self.trigram_postings * 4;
        let fuzzy_pool = self.fuzzy_trigrams * 4;
        let term_postings = self.term_postings * 8;
        trigram_blocks + trigram_postings + fuzzy_pool + term_postings + self.name_bytes
    }
}

impl core::fmt::Display for IndexStats {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} records, {} trigram blocks, {} trigram postings, {} terms",
            self.num_records, self.trigram_blocks, self.trigram_postings, self.distinct_terms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_usage_sums_components() {
        let stats = IndexStats {
            num_records: 10,
            trigram_blocks: 5,
            trigram_postings: 20,
            fuzzy_trigrams: 30,
            distinct_terms: 8,
            term_postings: 12,
            name_bytes: 100,
        };
        assert_eq!(
            stats.memory_usage_bytes(),
            5 * 12 + 20 * 4 + 30 * 4 + 12 * 8 + 100
        );
    }

    #[test]
    fn display_names_the_counts() {
        let stats = IndexStats {
            num_records: 3,
            trigram_blocks: 40,
            trigram_postings: 50,
            fuzzy_trigrams: 50,
            distinct_terms: 6,
            term_postings: 6,
            name_bytes: 48,
        };
        let text = format!("{stats}");
        assert!(text.contains("3 records"));
        assert!(text.contains("40 trigram blocks"));
    }
}
