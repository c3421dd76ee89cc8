//! Read-side attestation feed: grouping and display shaping
//!
//! The indexer returns one row per attestation log entry, pre-ordered by
//! transaction. Entries that share a transaction hash are merged into a
//! single display record carrying parallel key/value lists.

pub mod session;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::codec::{key as key_codec, value as value_codec};
use crate::codec::value::ValueEncoding;
use crate::types::{Address, Bytes32, TxHash};

/// One attestation log entry as returned by the indexer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawLogEntry {
    pub creator: Address,
    pub about: Address,
    pub key: Bytes32,
    /// Raw value field as delivered by the provider (typically hex digits)
    pub val: String,
    #[serde(rename = "transactionHash")]
    pub transaction_hash: TxHash,
    #[serde(rename = "createdAtTimestamp")]
    pub created_at: DateTime<Utc>,
}

/// A field that holds either one value or several
///
/// A record keeps the `Single` form for its whole lifetime unless a second
/// entry with the same transaction hash promotes it; callers branch on the
/// variant instead of duck-typing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Grouped<T> {
    Single(T),
    Many(Vec<T>),
}

impl<T> Grouped<T> {
    /// Append an item, promoting `Single` to `Many` on the second value
    pub fn push(&mut self, item: T) {
        match std::mem::replace(self, Grouped::Many(Vec::new())) {
            Grouped::Single(first) => *self = Grouped::Many(vec![first, item]),
            Grouped::Many(mut items) => {
                items.push(item);
                *self = Grouped::Many(items);
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Grouped::Single(_) => 1,
            Grouped::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_single(&self) -> bool {
        matches!(self, Grouped::Single(_))
    }

    pub fn as_slice(&self) -> &[T] {
        match self {
            Grouped::Single(item) => std::slice::from_ref(item),
            Grouped::Many(items) => items.as_slice(),
        }
    }

    /// Map each value, preserving the scalar/list shape
    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> Grouped<U> {
        match self {
            Grouped::Single(item) => Grouped::Single(f(item)),
            Grouped::Many(items) => Grouped::Many(items.iter().map(f).collect()),
        }
    }
}

/// A grouped, display-ready attestation record
///
/// `keys` and `values` are parallel: they always have the same arity and the
/// same encounter order as the source entries.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayRecord {
    pub transaction_hash: TxHash,
    pub creator: Address,
    pub about: Address,
    pub keys: Grouped<Bytes32>,
    pub values: Grouped<Vec<u8>>,
    pub created_at: DateTime<Utc>,
}

impl DisplayRecord {
    fn from_entry(entry: RawLogEntry) -> Self {
        Self {
            transaction_hash: entry.transaction_hash,
            creator: entry.creator,
            about: entry.about,
            keys: Grouped::Single(entry.key),
            values: Grouped::Single(entry.val.into_bytes()),
            created_at: entry.created_at,
        }
    }

    fn absorb(&mut self, entry: RawLogEntry) {
        self.keys.push(entry.key);
        self.values.push(entry.val.into_bytes());
    }
}

/// Merge adjacent entries sharing a transaction hash into display records
///
/// Single left-to-right pass, no sorting: correctness relies on the indexer
/// returning same-transaction entries adjacent to each other. Equal hashes
/// that are not adjacent produce separate records.
pub fn group(entries: Vec<RawLogEntry>) -> Vec<DisplayRecord> {
    let mut records: Vec<DisplayRecord> = Vec::new();
    for entry in entries {
        match records.last_mut() {
            Some(last) if last.transaction_hash == entry.transaction_hash => last.absorb(entry),
            _ => records.push(DisplayRecord::from_entry(entry)),
        }
    }
    records
}

/// Shorten an address for card display: `0x1234...abcd`
pub fn truncate_address(address: &Address) -> String {
    let full = address.to_string();
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

/// Date part of a timestamp for card display
pub fn display_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d").to_string()
}

/// Minute-resolution time part of a timestamp for card display
pub fn display_time(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%H:%MZ").to_string()
}

/// Human-readable form of an on-chain key
///
/// Padded keys decode back to their text; hashed keys are irreversible and
/// fall back to the hex digest.
pub fn display_key(key: &Bytes32) -> String {
    key_codec::decode(key).unwrap_or_else(|_| key.to_string())
}

/// Human-readable form of a stored value
///
/// The indexer ships values as hex digit strings, so that path is tried
/// first; plain UTF-8 is the fallback, then the raw hex of the bytes.
pub fn display_value(val: &[u8]) -> String {
    value_codec::decode_as_text(val, ValueEncoding::HexAscii)
        .or_else(|_| value_codec::decode_as_text(val, ValueEncoding::Utf8))
        .unwrap_or_else(|_| format!("0x{}", hex::encode(val)))
}
