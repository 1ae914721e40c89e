//! Trigram posting lists.

use medigram_types::Trigram;

/// One trigram's slice of the flat postings array.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PostingBlock {
    pub trigram: Trigram,
    pub offset: u32,
    pub len: u32,
}

/// One (trigram, record position) pair emitted during the build scan.
#[derive(Clone, Copy)]
pub(crate) struct TrigramEntry {
    pub trigram: Trigram,
    pub pos: u32,
}

/// Immutable trigram → record-position inverted index.
///
/// All posting lists live in a single contiguous array for cache-efficient
/// traversal; blocks are sorted by trigram for binary-search lookup, and
/// positions within a block are strictly ascending.
pub(crate) struct TrigramPostings {
    blocks: Vec<PostingBlock>,
    postings: Vec<u32>,
}

impl TrigramPostings {
    /// Builds the index from the raw entries of one catalog scan.
    ///
    /// One O(Δ sort + Δ scan) pass: sort by (trigram, position), then cut
    /// the run of each trigram into a block, dropping repeated positions.
    pub fn build(mut entries: Vec<TrigramEntry>) -> Self {
        if entries.is_empty() {
            return Self {
                blocks: Vec::new(),
                postings: Vec::new(),
            };
        }

        entries.sort_unstable_by(|a, b| {
            a.trigram
                .cmp(&b.trigram)
                .then_with(|| a.pos.cmp(&b.pos))
        });

        let mut blocks: Vec<PostingBlock> = Vec::new();
        let mut postings: Vec<u32> = Vec::with_capacity(entries.len());

        let mut current = entries[0].trigram;
        let mut offset = 0u32;
        let mut len = 0u32;
        let mut last_pos: Option<u32> = None;

        for entry in &entries {
            if entry.trigram != current {
                blocks.push(PostingBlock {
                    trigram: current,
                    offset,
                    len,
                });
                offset += len;
                current = entry.trigram;
                len = 0;
                last_pos = None;
            }

            if last_pos != Some(entry.pos) {
                postings.push(entry.pos);
                len += 1;
                last_pos = Some(entry.pos);
            }
        }

        blocks.push(PostingBlock {
            trigram: current,
            offset,
            len,
        });

        Self { blocks, postings }
    }

    /// Returns the posting list for a trigram; empty if the trigram is
    /// absent from every record.
    #[inline]
    pub fn lookup(&self, trigram: Trigram) -> &[u32] {
        match self
            .blocks
            .binary_search_by_key(&trigram, |b| b.trigram)
        {
            Ok(idx) => {
                let block = &self.blocks[idx];
                let start = block.offset as usize;
                &self.postings[start..start + block.len as usize]
            }
            Err(_) => &[],
        }
    }

    /// Number of distinct trigrams.
    #[inline(always)]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Total postings across all trigrams.
    #[inline(always)]
    pub fn posting_count(&self) -> usize {
        self.postings.len()
    }

    #[cfg(test)]
    pub(crate) fn blocks(&self) -> &[PostingBlock] {
        &self.blocks
    }
}
