//! CSV batch ingestion and validation
//!
//! A batch file is a CSV with the header row `about,key,val`, one attestation
//! per line. Rows are validated independently and failures are reported per
//! category with the offending row indices, so the caller can say
//! "rows 2, 5, 9 have bad addresses" rather than failing one row at a time.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;

use crate::codec::{key as key_codec, value as value_codec};
use crate::types::{Address, Attestation};

/// Expected CSV header columns, in order
pub const EXPECTED_HEADERS: [&str; 3] = ["about", "key", "val"];

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV header must be 'about,key,val', got '{0}'")]
    BadHeader(String),
}

/// One parsed CSV line, not yet validated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRow {
    pub about: String,
    pub key: String,
    pub val: String,
}

/// Validation failure categories for batch rows
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCategory {
    InvalidAddress,
    EmptyKey,
    EmptyValue,
}

/// Per-category row indices of a validated batch
///
/// Recomputed fully on every validation pass; a row can appear under several
/// categories at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub row_errors: BTreeMap<ErrorCategory, Vec<usize>>,
    pub is_valid: bool,
}

impl ValidationReport {
    fn add(&mut self, category: ErrorCategory, row: usize) {
        self.row_errors.entry(category).or_default().push(row);
    }

    /// Row indices failing the given category, in row order
    pub fn rows_failing(&self, category: ErrorCategory) -> &[usize] {
        self.row_errors
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Read batch rows from CSV data with an `about,key,val` header row
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<BatchRow>, BatchError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if headers.iter().ne(EXPECTED_HEADERS) {
        return Err(BatchError::BadHeader(headers.iter().collect::<Vec<_>>().join(",")));
    }

    let mut rows = Vec::new();
    for record in csv_reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

/// Validate a batch, grouping failing row indices per category
///
/// Rules, evaluated independently per row: `about` must parse as an Ethereum
/// address, `key` and `val` must be non-empty. `is_valid` holds iff no row
/// fails any category.
pub fn validate(rows: &[BatchRow]) -> ValidationReport {
    let mut report = ValidationReport::default();
    for (index, row) in rows.iter().enumerate() {
        if Address::parse(&row.about).is_err() {
            report.add(ErrorCategory::InvalidAddress, index);
        }
        if row.key.is_empty() {
            report.add(ErrorCategory::EmptyKey, index);
        }
        if row.val.is_empty() {
            report.add(ErrorCategory::EmptyValue, index);
        }
    }
    report.is_valid = report.row_errors.is_empty();
    report
}

/// Encode validated rows into on-chain-ready attestation tuples
///
/// Does not re-validate: callers must check [`validate`]'s `is_valid` first.
/// Rows whose address still fails to parse are skipped, a path that cannot
/// be reached when callers gate on `is_valid`.
pub fn normalize(rows: &[BatchRow]) -> Vec<Attestation> {
    rows.iter()
        .filter_map(|row| {
            let about = Address::parse(&row.about).ok()?;
            Some(Attestation {
                about,
                key: key_codec::encode(&row.key),
                val: value_codec::encode(&row.val),
            })
        })
        .collect()
}
