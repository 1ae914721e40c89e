//! Text normalization.
//!
//! First stage of the pipeline: every catalog name and every query is folded
//! to one canonical form before an index or a comparison ever sees it.
//!
//! ## What It Does
//!
//! - Lowercases (Unicode-aware, with an ASCII fast path)
//! - Collapses runs of whitespace into a single ASCII space
//! - Strips leading and trailing whitespace
//!
//! Index build and the query router normalize through the same code, so a
//! query is only ever compared against text in the same canonical form.
//! `"  Paracetamol   500MG "` and `"paracetamol 500mg"` index and search
//! identically.

/// Text normalizer shared by index build and query parsing.
///
/// Stateless. The struct exists so call sites hold a normalizer value and
/// the pipeline stays explicit about which stage produced a string.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextNormalizer;

impl TextNormalizer {
    /// Creates a normalizer.
    pub const fn new() -> Self {
        Self
    }

    /// Normalizes text into an existing String buffer.
    ///
    /// Clears the buffer before writing and reuses its capacity, so bulk
    /// callers pay one allocation for the whole build.
    pub fn normalize_into(&self, input: &str, out: &mut String) {
        out.clear();
        out.reserve(input.len());

        let mut pending_space = false;
        for ch in input.chars() {
            if ch.is_whitespace() {
                // Leading whitespace is dropped; interior runs collapse to
                // one space emitted just before the next word.
                pending_space = !out.is_empty();
                continue;
            }
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            if ch.is_ascii() {
                out.push(ch.to_ascii_lowercase());
            } else {
                out.extend(ch.to_lowercase());
            }
        }
    }

    /// Normalizes text and returns a new String.
    pub fn normalize(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        self.normalize_into(input, &mut out);
        out
    }
}
