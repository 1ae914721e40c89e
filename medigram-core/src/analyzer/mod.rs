//! Text analysis pipeline.
//!
//! This module provides the text processing components:
//! - **Normalizer**: folds raw catalog text and queries to canonical form
//! - **Tokenizer**: splits normalized text into searchable terms
//! - **Trigram**: extracts boundary-padded 3-byte sequences for matching

pub mod normalizer;
pub mod tokenizer;
pub mod trigram;

pub use normalizer::TextNormalizer;
pub use tokenizer::{Field, Tokenizer};
