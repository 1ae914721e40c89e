//! Trigram extraction and similarity.
//!
//! Trigrams are the foundation of the fuzzy and substring strategies.
//! Names are padded with one [`BOUNDARY`] byte on each side before
//! extraction, so a trigram at the start or end of a name is distinct from
//! the same three bytes mid-string and short names still produce usable
//! sets. Interior (unpadded) extraction also exists for substring candidate
//! lookup, where boundary trigrams would be wrong.

use medigram_types::Trigram;
use smallvec::SmallVec;

/// Boundary sentinel padded onto each side of a string before extraction.
///
/// Normalized text never contains a NUL byte, so boundary trigrams cannot
/// collide with interior ones.
pub const BOUNDARY: u8 = 0x00;

/// Extracts boundary-padded trigrams in order, duplicates included.
///
/// A string of n bytes yields exactly n trigrams; empty input yields none.
#[inline]
pub fn extract_padded<F>(text: &str, mut callback: F)
where
    F: FnMut(Trigram),
{
    let bytes = text.as_bytes();
    if bytes.is_empty() {
        return;
    }

    let mut padded: SmallVec<[u8; 64]> = SmallVec::with_capacity(bytes.len() + 2);
    padded.push(BOUNDARY);
    padded.extend_from_slice(bytes);
    padded.push(BOUNDARY);

    for window in padded.windows(3) {
        callback(Trigram::from_bytes(window[0], window[1], window[2]));
    }
}

/// Returns the sorted, deduplicated boundary-padded trigram set of `text`.
pub fn padded_set(text: &str) -> Vec<Trigram> {
    let mut set = Vec::with_capacity(text.len());
    extract_padded(text, |t| set.push(t));
    set.sort_unstable();
    set.dedup();
    set
}

/// Extracts interior trigrams using a plain sliding window.
///
/// No padding: for text shorter than 3 bytes, no trigrams are emitted.
/// This is the extraction to use when looking for a query *inside* other
/// strings, where its edges carry no boundary information.
#[inline]
pub fn extract_inner<F>(text: &str, mut callback: F)
where
    F: FnMut(Trigram),
{
    let bytes = text.as_bytes();
    if bytes.len() < 3 {
        return;
    }

    for window in bytes.windows(3) {
        callback(Trigram::from_bytes(window[0], window[1], window[2]));
    }
}

/// Jaccard similarity of two sorted, deduplicated trigram sets.
///
/// `|a ∩ b| / |a ∪ b|`, in `[0.0, 1.0]`. Symmetric; 1.0 exactly when both
/// non-empty sets are equal; 0.0 when either set is empty.
pub fn similarity(a: &[Trigram], b: &[Trigram]) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let mut i = 0usize;
    let mut j = 0usize;
    let mut shared = 0usize;

    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            core::cmp::Ordering::Less => i += 1,
            core::cmp::Ordering::Greater => j += 1,
            core::cmp::Ordering::Equal => {
                shared += 1;
                i += 1;
                j += 1;
            }
        }
    }

    let union = a.len() + b.len() - shared;
    shared as f32 / union as f32
}
