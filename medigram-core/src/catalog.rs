//! Catalog store and bulk ingestion.
//!
//! The catalog is the authoritative record set every index is built from.
//! Records arrive in bulk from an external JSON source, are validated one
//! by one, and are immutable once ingested. Duplicate ids resolve by
//! first write wins, matching an insert-ignore-on-conflict import policy;
//! a malformed record is skipped with a warning and never aborts its batch.

use core::fmt;
use std::collections::hash_map::Entry;

use medigram_types::{RecordError, RecordId};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use tracing::{debug, warn};

/// One medicine record, immutable after ingest.
///
/// The field set mirrors the searched and returned columns of the external
/// catalog; unrelated payload columns are not carried.
#[derive(Debug, Clone, Deserialize)]
pub struct Record {
    /// Unique external id.
    pub id: RecordId,
    /// Product name; required and non-blank.
    pub name: String,
    /// Source SKU, when present.
    #[serde(default)]
    pub sku_id: Option<String>,
    /// Manufacturer name.
    #[serde(default)]
    pub manufacturer_name: Option<String>,
    /// List price.
    #[serde(default)]
    pub price: Option<f64>,
    /// Pack size label, e.g. "strip of 15 tablets".
    #[serde(default)]
    pub pack_size_label: Option<String>,
    /// Active-ingredient composition text.
    #[serde(default)]
    pub short_composition: Option<String>,
    /// Whether the product has been discontinued.
    #[serde(default)]
    pub is_discontinued: Option<bool>,
}

impl Record {
    /// Creates a record with only the required fields set.
    pub fn new(id: RecordId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            sku_id: None,
            manufacturer_name: None,
            price: None,
            pack_size_label: None,
            short_composition: None,
            is_discontinued: None,
        }
    }
}

/// Outcome of one bulk ingest call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Records accepted into the catalog.
    pub inserted: usize,
    /// Records dropped because their id was already taken.
    pub duplicates: usize,
    /// Records dropped because they failed to decode or validate.
    pub invalid: usize,
}

impl fmt::Display for IngestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} inserted, {} duplicates, {} invalid",
            self.inserted, self.duplicates, self.invalid
        )
    }
}

/// Authoritative record set.
///
/// Indexes reference records by their dense `u32` position in insertion
/// order; the external id only appears in results. Every position handed
/// out stays valid for the catalog's lifetime - records are never removed.
#[derive(Debug, Default)]
pub struct Catalog {
    records: Vec<Record>,
    by_id: FxHashMap<RecordId, u32>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog with pre-allocated capacity.
    pub fn with_capacity(records: usize) -> Self {
        Self {
            records: Vec::with_capacity(records),
            by_id: FxHashMap::with_capacity_and_hasher(records, Default::default()),
        }
    }

    /// Returns the number of records.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the catalog holds no records.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Gets a record by dense position.
    #[inline(always)]
    pub fn get(&self, pos: u32) -> Option<&Record> {
        self.records.get(pos as usize)
    }

    /// Gets a record by external id.
    pub fn by_id(&self, id: RecordId) -> Option<&Record> {
        self.by_id.get(&id).and_then(|&pos| self.get(pos))
    }

    /// All records in insertion order.
    #[inline(always)]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Inserts one record, returning its position.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::EmptyName` for blank names and
    /// `RecordError::DuplicateId` when the id is already taken (the
    /// existing record is kept untouched).
    pub fn insert(&mut self, record: Record) -> Result<u32, RecordError> {
        if record.name.trim().is_empty() {
            return Err(RecordError::EmptyName { id: record.id });
        }

        match self.by_id.entry(record.id) {
            Entry::Occupied(_) => Err(RecordError::DuplicateId { id: record.id }),
            Entry::Vacant(slot) => {
                let pos = self.records.len() as u32;
                slot.insert(pos);
                self.records.push(record);
                Ok(pos)
            }
        }
    }

    /// Ingests a batch of decoded JSON values.
    ///
    /// Each element is decoded and validated independently: a record that
    /// fails is counted, logged, and skipped, and the rest of the batch
    /// proceeds.
    pub fn ingest_values(&mut self, values: Vec<serde_json::Value>) -> IngestReport {
        let mut report = IngestReport::default();

        for value in values {
            let record = match serde_json::from_value::<Record>(value) {
                Ok(record) => record,
                Err(err) => {
                    warn!(error = %err, "skipping undecodable catalog record");
                    report.invalid += 1;
                    continue;
                }
            };

            match self.insert(record) {
                Ok(_) => report.inserted += 1,
                Err(RecordError::DuplicateId { id }) => {
                    debug!(id, "duplicate record id, first write wins");
                    report.duplicates += 1;
                }
                Err(err) => {
                    warn!(error = %err, "skipping invalid catalog record");
                    report.invalid += 1;
                }
            }
        }

        report
    }

    /// Ingests a batch from raw JSON (an array of record objects).
    ///
    /// # Errors
    ///
    /// Fails only when the document itself is not a JSON array; individual
    /// bad records are handled per [`Catalog::ingest_values`].
    pub fn ingest_json(&mut self, json: &str) -> Result<IngestReport, serde_json::Error> {
        let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
        Ok(self.ingest_values(values))
    }
}
