//! Core types for the Medigram search engine.
//!
//! This crate provides the fundamental types that are shared across
//! the Medigram ecosystem. Keeping types separate ensures:
//!
//! - **Cheap values**: types are sized for cache efficiency
//! - **Cross-crate compatibility**: core and tooling share the same types
//! - **Clean boundaries**: no circular dependencies between crates

#![warn(missing_docs)]

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique catalog record identifier.
///
/// Record ids come from the external catalog source (a 64-bit primary key)
/// and are sparse. Index-internal structures never store them directly; they
/// store dense positions and translate back at result time.
pub type RecordId = u64;

/// A trigram (3-byte sequence) represented as a 24-bit integer.
///
/// Trigrams are packed as: `(b0 << 16) | (b1 << 8) | b2`. This representation:
/// - Fits in 3 bytes (u24 would be ideal, but u32 is used)
/// - Enables fast equality comparison and cheap sorting
/// - Works as an index key without allocation
///
/// Trigrams over catalog names are extracted from the *boundary-padded*
/// normalized name, so edge trigrams are distinguishable from mid-string
/// ones. The padding byte never occurs in normalized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Trigram(pub u32);

impl Trigram {
    /// Maximum possible trigram value (0xFFFFFF).
    pub const MAX: u32 = 0xFFFFFF;

    /// Creates a trigram from three bytes.
    #[inline(always)]
    pub const fn from_bytes(b0: u8, b1: u8, b2: u8) -> Self {
        Self(((b0 as u32) << 16) | ((b1 as u32) << 8) | (b2 as u32))
    }

    /// Creates a trigram from the first three bytes of a string slice.
    /// Panics in debug builds if the slice is shorter than 3 bytes.
    #[inline(always)]
    pub fn from_str(s: &str) -> Self {
        let bytes = s.as_bytes();
        debug_assert!(bytes.len() >= 3, "trigram requires at least 3 bytes");
        Self::from_bytes(bytes[0], bytes[1], bytes[2])
    }

    /// Returns the three bytes of this trigram.
    #[inline(always)]
    pub const fn to_bytes(self) -> [u8; 3] {
        [
            ((self.0 >> 16) & 0xFF) as u8,
            ((self.0 >> 8) & 0xFF) as u8,
            (self.0 & 0xFF) as u8,
        ]
    }

    /// Returns the underlying u32 value.
    #[inline(always)]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl From<u32> for Trigram {
    #[inline(always)]
    fn from(value: u32) -> Self {
        Self(value & Self::MAX)
    }
}

impl From<Trigram> for u32 {
    #[inline(always)]
    fn from(t: Trigram) -> Self {
        t.0
    }
}

/// The four search strategies the engine supports.
///
/// Each mode is answered by a dedicated index component; the query router
/// dispatches on this tag instead of branching on request strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Exact case-insensitive prefix match on the record name.
    Prefix,
    /// Arbitrary substring containment in the record name.
    Substring,
    /// Typo-tolerant trigram-similarity match, ranked by score.
    Fuzzy,
    /// Token-based relevance-ranked full-text search.
    Fulltext,
}

impl SearchMode {
    /// All modes, in dispatch order.
    pub const ALL: [SearchMode; 4] = [
        SearchMode::Prefix,
        SearchMode::Substring,
        SearchMode::Fuzzy,
        SearchMode::Fulltext,
    ];

    /// Canonical lowercase name of this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SearchMode::Prefix => "prefix",
            SearchMode::Substring => "substring",
            SearchMode::Fuzzy => "fuzzy",
            SearchMode::Fulltext => "fulltext",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prefix" => Ok(SearchMode::Prefix),
            "substring" => Ok(SearchMode::Substring),
            "fuzzy" => Ok(SearchMode::Fuzzy),
            "fulltext" => Ok(SearchMode::Fulltext),
            other => Err(QueryError::UnknownMode(other.to_string())),
        }
    }
}

/// One search result returned to callers.
///
/// `score` is populated only for the fuzzy and fulltext modes; prefix and
/// substring results are ordered purely by name and carry no score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredHit {
    /// External catalog id of the matched record.
    pub id: RecordId,
    /// Original (un-normalized) record name.
    pub name: String,
    /// Manufacturer, when the catalog knows it.
    pub manufacturer_name: Option<String>,
    /// List price, when the catalog knows it.
    pub price: Option<f64>,
    /// Similarity or relevance score; `None` for unscored modes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

/// A single search request as seen by the query router.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Which index answers the request.
    pub mode: SearchMode,
    /// Raw user query; the router trims and validates it.
    pub query: String,
    /// Page size; `None` means the configured default.
    pub limit: Option<usize>,
    /// Number of leading results to skip.
    pub offset: usize,
}

impl SearchRequest {
    /// Creates a request with default pagination.
    pub fn new(mode: SearchMode, query: impl Into<String>) -> Self {
        Self {
            mode,
            query: query.into(),
            limit: None,
            offset: 0,
        }
    }

    /// Sets an explicit page size.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the pagination offset.
    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

/// Validation failures for a search request.
///
/// These are always recoverable at the boundary: the caller gets enough
/// detail to fix the request, and nothing is retried automatically. An empty
/// result set is *not* an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Query was empty or whitespace-only after trimming.
    #[error("query must not be empty")]
    EmptyQuery,
    /// Query exceeded the configured maximum length. Rejected, not truncated.
    #[error("query too long: {len} characters (max {max})")]
    QueryTooLong {
        /// Character count of the offending query.
        len: usize,
        /// Configured maximum.
        max: usize,
    },
    /// Page size was zero or above the configured maximum.
    #[error("limit out of range: {limit} (must be 1..={max})")]
    LimitOutOfRange {
        /// Requested page size.
        limit: usize,
        /// Configured maximum.
        max: usize,
    },
    /// Mode string did not name any known search strategy.
    #[error("unknown search mode: {0:?}")]
    UnknownMode(String),
}

/// Per-record failures during catalog ingestion.
///
/// A failing record is skipped and reported; it never aborts the rest of
/// its batch and never corrupts records already ingested.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// Record name was empty or whitespace-only.
    #[error("record {id} has an empty name")]
    EmptyName {
        /// Id of the rejected record.
        id: RecordId,
    },
    /// A record with this id already exists; first write wins.
    #[error("record {id} already ingested")]
    DuplicateId {
        /// Id of the rejected record.
        id: RecordId,
    },
}

/// Fuzzy-match configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyConfig {
    /// Minimum trigram similarity for a record to count as a fuzzy match
    /// (0.0-1.0). Default: 0.3, the conventional trigram-similarity cutoff.
    pub min_similarity: f32,
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        Self {
            min_similarity: 0.3,
        }
    }
}

impl FuzzyConfig {
    /// Configuration that only admits close matches.
    pub const fn strict() -> Self {
        Self {
            min_similarity: 0.5,
        }
    }

    /// Configuration that admits distant matches.
    pub const fn lenient() -> Self {
        Self {
            min_similarity: 0.1,
        }
    }
}

/// Request validation limits enforced by the query router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum query length in characters. Longer queries are rejected.
    pub max_query_len: usize,
    /// Page size applied when a request does not specify one.
    pub default_limit: usize,
    /// Largest admissible page size.
    pub max_limit: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_query_len: 200,
            default_limit: 20,
            max_limit: 200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigram_from_bytes() {
        let t = Trigram::from_bytes(b'a', b'b', b'c');
        assert_eq!(t.as_u32(), 0x00616263);
        assert_eq!(t.to_bytes(), [b'a', b'b', b'c']);
    }

    #[test]
    fn trigram_from_str() {
        let t = Trigram::from_str("abc");
        assert_eq!(t.as_u32(), 0x00616263);
    }

    #[test]
    fn trigram_ordering_matches_packed_value() {
        let a = Trigram::from_bytes(0, b'a', b'b');
        let b = Trigram::from_bytes(b'a', b'b', b'c');
        assert!(a < b);
    }

    #[test]
    fn mode_round_trips_through_str() {
        for mode in SearchMode::ALL {
            assert_eq!(mode.as_str().parse::<SearchMode>(), Ok(mode));
            assert_eq!(format!("{mode}"), mode.as_str());
        }
    }

    #[test]
    fn mode_rejects_unknown_strings() {
        let err = "regex".parse::<SearchMode>().unwrap_err();
        assert_eq!(err, QueryError::UnknownMode("regex".to_string()));
    }

    #[test]
    fn mode_serde_uses_lowercase() {
        let json = serde_json::to_string(&SearchMode::Fulltext).unwrap();
        assert_eq!(json, "\"fulltext\"");
        let back: SearchMode = serde_json::from_str("\"fuzzy\"").unwrap();
        assert_eq!(back, SearchMode::Fuzzy);
    }

    #[test]
    fn scored_hit_omits_null_score() {
        let hit = ScoredHit {
            id: 7,
            name: "Paracetamol 500mg".to_string(),
            manufacturer_name: None,
            price: Some(12.5),
            score: None,
        };
        let json = serde_json::to_string(&hit).unwrap();
        assert!(!json.contains("score"));
    }

    #[test]
    fn request_builder_defaults() {
        let req = SearchRequest::new(SearchMode::Prefix, "para");
        assert_eq!(req.limit, None);
        assert_eq!(req.offset, 0);

        let req = req.with_limit(50).with_offset(100);
        assert_eq!(req.limit, Some(50));
        assert_eq!(req.offset, 100);
    }

    #[test]
    fn error_messages_name_the_limit() {
        let err = QueryError::QueryTooLong { len: 201, max: 200 };
        assert_eq!(format!("{err}"), "query too long: 201 characters (max 200)");

        let err = QueryError::LimitOutOfRange { limit: 0, max: 200 };
        assert!(format!("{err}").contains("1..=200"));
    }

    #[test]
    fn limits_default_matches_service_contract() {
        let limits = SearchLimits::default();
        assert_eq!(limits.max_query_len, 200);
        assert_eq!(limits.default_limit, 20);
        assert_eq!(limits.max_limit, 200);
    }
}
