//! Streaming tokenizer.
//!
//! Second stage of the pipeline: takes normalized text and emits each
//! alphanumeric run as a term, with its position and the record field it
//! came from. `"co-trimoxazole (480mg)"` yields:
//!
//! ```ignore
//! ("co", Field::Name, 0)
//! ("trimoxazole", Field::Name, 1)
//! ("480mg", Field::Name, 2)
//! ```
//!
//! ## Key Features
//!
//! - **Zero allocation**: tokens are slices of the input, emitted through a
//!   callback, never collected here
//! - **Field-aware**: the field tag carries a static scoring weight, so a
//!   term in the record name can outrank the same term in the composition
//!
//! ## The Input Contract
//!
//! The tokenizer expects **pre-normalized** input (lowercase, collapsed
//! whitespace). Violations panic in debug builds.

/// Logical record field a token belongs to.
///
/// Fields differ in how much a match there should count: a query term
/// hitting the product name matters more than the same term buried in the
/// composition text.
///
/// `#[repr(u8)]` guarantees a stable 1-byte layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Field {
    /// Product name - highest importance
    Name = 0,
    /// Active-ingredient composition text
    Composition = 1,
    /// Manufacturer name
    Manufacturer = 2,
}

impl Field {
    /// Static scoring weight for this field.
    ///
    /// Not stored per token; applied during full-text scoring.
    #[must_use]
    #[inline(always)]
    pub const fn weight(self) -> f32 {
        match self {
            Field::Name => 2.0,
            Field::Composition => 1.0,
            Field::Manufacturer => 1.0,
        }
    }
}

/// Streaming tokenizer - splits normalized text into alphanumeric terms.
///
/// Tokens are not copied; they're slices (`&str`) into the original input.
/// Splitting happens on every non-alphanumeric character, which is what
/// strips punctuation out of terms: hyphens, parentheses, and slashes all
/// act as separators.
#[derive(Debug, Copy, Clone)]
#[repr(transparent)]
pub struct Tokenizer {
    field: Field,
}

impl Tokenizer {
    /// Creates a new tokenizer for the specified field.
    #[inline]
    pub const fn new(field: Field) -> Self {
        Self { field }
    }

    /// Tokenizes normalized input and emits `(text, field, position)`.
    #[inline]
    pub fn tokenize<'n, F>(&self, normalized: &'n str, mut emit: F)
    where
        F: FnMut(&'n str, Field, u32),
    {
        debug_assert!(
            !normalized.bytes().any(|b| b.is_ascii_uppercase()),
            "tokenizer: uppercase input — normalizer contract violated"
        );

        let field = self.field;
        let mut start: Option<usize> = None;
        let mut pos = 0u32;

        for (i, ch) in normalized.char_indices() {
            if ch.is_alphanumeric() {
                if start.is_none() {
                    start = Some(i);
                }
            } else if let Some(s) = start.take() {
                emit(&normalized[s..i], field, pos);
                pos += 1;
            }
        }

        if let Some(s) = start {
            emit(&normalized[s..], field, pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &str, field: Field) -> Vec<(&str, Field, u32)> {
        let mut out = Vec::new();
        Tokenizer::new(field).tokenize(input, |text, f, pos| {
            out.push((text, f, pos));
        });
        out
    }

    #[test]
    fn field_size_is_1_byte() {
        assert_eq!(size_of::<Field>(), 1);
    }

    #[test]
    fn splits_on_whitespace() {
        let out = collect("paracetamol 500mg", Field::Name);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].0, "paracetamol");
        assert_eq!(out[1].0, "500mg");
    }

    #[test]
    fn punctuation_acts_as_separator() {
        let out = collect("co-trimoxazole (480mg)", Field::Name);
        let terms: Vec<&str> = out.iter().map(|t| t.0).collect();
        assert_eq!(terms, vec!["co", "trimoxazole", "480mg"]);
    }

    #[test]
    fn positions_are_sequential() {
        let out = collect("amoxicillin and clavulanic acid", Field::Composition);
        for (i, (_, _, pos)) in out.iter().enumerate() {
            assert_eq!(*pos, i as u32);
        }
    }

    #[test]
    fn empty_emits_nothing() {
        assert!(collect("", Field::Name).is_empty());
        assert!(collect("()- /", Field::Name).is_empty());
    }

    #[test]
    fn field_propagated_to_all_tokens() {
        for (_, field, _) in collect("one two three", Field::Manufacturer) {
            assert_eq!(field, Field::Manufacturer);
        }
    }

    #[test]
    fn weight_derivable_from_field() {
        assert_eq!(Field::Name.weight(), 2.0);
        assert_eq!(Field::Composition.weight(), 1.0);
        assert_eq!(Field::Manufacturer.weight(), 1.0);
    }

    #[test]
    fn tokens_are_slices_of_input() {
        let input = String::from("dolo 650");
        let base = input.as_ptr() as usize;
        let end = base + input.len();

        Tokenizer::new(Field::Name).tokenize(&input, |text, _, _| {
            let ptr = text.as_ptr() as usize;
            assert!(ptr >= base && ptr < end);
        });
    }

    #[test]
    fn digits_stay_inside_terms() {
        let out = collect("b12 d3", Field::Name);
        let terms: Vec<&str> = out.iter().map(|t| t.0).collect();
        assert_eq!(terms, vec!["b12", "d3"]);
    }
}
