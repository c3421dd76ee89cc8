//! HTTP client for the attestation indexing API
//!
//! The indexer exposes historical attestation log entries, filterable by
//! creator, subject, key, and transaction hash, plus precomputed leaderboard
//! aggregates. Authentication is an API key passed as a query parameter.

use log::debug;
use reqwest::header::ACCEPT;
use serde_json::Value;
use url::Url;

use crate::codec::key as key_codec;
use crate::feed::RawLogEntry;
use crate::types::{Address, TxHash};

#[derive(Debug, thiserror::Error)]
pub enum IndexerError {
    #[error("indexer request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("indexer returned status {0}")]
    Status(u16),

    #[error("failed to decode indexer response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid indexer URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("indexer returned an unexpected response shape")]
    UnexpectedShape,
}

pub type Result<T> = std::result::Result<T, IndexerError>;

/// Search filter for historical attestations
///
/// All fields are optional; an empty filter returns the most recent entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    pub creator: Option<Address>,
    pub about: Option<Address>,
    /// Pre-encoded key query value, see [`SearchFilter::with_human_key`]
    pub key: Option<String>,
    pub transaction_hash: Option<TxHash>,
}

impl SearchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_creator(mut self, creator: Address) -> Self {
        self.creator = Some(creator);
        self
    }

    pub fn with_about(mut self, about: Address) -> Self {
        self.about = Some(about);
        self
    }

    /// Filter by a human-readable key
    ///
    /// A key that fits the padded encoding is sent as its bytes32 hex form;
    /// a longer key is passed through as typed, matching the search form's
    /// behavior.
    pub fn with_human_key(mut self, human_key: &str) -> Self {
        self.key = Some(if key_codec::is_hashed(human_key) {
            human_key.to_string()
        } else {
            key_codec::encode(human_key).to_string()
        });
        self
    }

    pub fn with_transaction_hash(mut self, hash: TxHash) -> Self {
        self.transaction_hash = Some(hash);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.creator.is_none()
            && self.about.is_none()
            && self.key.is_none()
            && self.transaction_hash.is_none()
    }
}

/// One leaderboard aggregate row
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct LeaderboardEntry {
    pub address: Address,
    pub attestation_count: u64,
}

/// Which side of an attestation a leaderboard aggregates over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderboardGroup {
    Creator,
    About,
}

impl LeaderboardGroup {
    fn path(&self) -> &'static str {
        match self {
            LeaderboardGroup::Creator => "Leaderboard/Creator",
            LeaderboardGroup::About => "Leaderboard/About",
        }
    }

    fn field(&self) -> &'static str {
        match self {
            LeaderboardGroup::Creator => "creator",
            LeaderboardGroup::About => "about",
        }
    }
}

/// Client for the attestation indexer API
#[derive(Debug, Clone)]
pub struct IndexerClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl IndexerClient {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        // A trailing slash keeps Url::join from replacing the last segment
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: Url::parse(&normalized)?,
            api_key: api_key.into(),
        })
    }

    /// Query historical attestation entries matching the filter
    ///
    /// The indexer answers an unmatched query with a bare JSON string
    /// ("Not Found!"); that decodes to an empty result set rather than an
    /// error.
    pub async fn search(&self, filter: &SearchFilter) -> Result<Vec<RawLogEntry>> {
        let url = self.search_url(filter)?;
        debug!("querying indexer: {}", url.path());

        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(IndexerError::Status(response.status().as_u16()));
        }

        let body: Value = response.json().await?;
        parse_search_body(body)
    }

    /// Fetch a precomputed attestation-count leaderboard
    pub async fn leaderboard(&self, group: LeaderboardGroup) -> Result<Vec<LeaderboardEntry>> {
        let mut url = self.base_url.join(group.path())?;
        url.query_pairs_mut().append_pair("apikey", &self.api_key);

        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(IndexerError::Status(response.status().as_u16()));
        }

        let body: Value = response.json().await?;
        parse_leaderboard_body(body, group)
    }

    fn search_url(&self, filter: &SearchFilter) -> Result<Url> {
        let mut url = self.base_url.join("Attestations")?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(creator) = &filter.creator {
                pairs.append_pair("creator", &creator.to_string());
            }
            if let Some(about) = &filter.about {
                pairs.append_pair("about", &about.to_string());
            }
            if let Some(key) = &filter.key {
                pairs.append_pair("key", key);
            }
            if let Some(hash) = &filter.transaction_hash {
                pairs.append_pair("transactionHash", &hash.to_string());
            }
            pairs.append_pair("apikey", &self.api_key);
        }
        Ok(url)
    }
}

fn parse_search_body(body: Value) -> Result<Vec<RawLogEntry>> {
    match body {
        // "Not Found!" shape
        Value::String(_) => Ok(Vec::new()),
        Value::Array(_) => Ok(serde_json::from_value(body)?),
        _ => Err(IndexerError::UnexpectedShape),
    }
}

fn parse_leaderboard_body(body: Value, group: LeaderboardGroup) -> Result<Vec<LeaderboardEntry>> {
    let rows = match body {
        Value::String(_) => return Ok(Vec::new()),
        Value::Array(rows) => rows,
        _ => return Err(IndexerError::UnexpectedShape),
    };

    // Malformed rows are dropped rather than failing the whole board
    Ok(rows
        .iter()
        .filter_map(|row| {
            let address = Address::parse(row.get(group.field())?.as_str()?).ok()?;
            let attestation_count = row
                .get("attestationCount")
                .and_then(Value::as_u64)
                .unwrap_or(0);
            Some(LeaderboardEntry {
                address,
                attestation_count,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> IndexerClient {
        IndexerClient::new("https://indexer.example/api/v1/dapp/attestationstation", "sekrit")
            .unwrap()
    }

    #[test]
    fn test_search_url_with_no_filters() {
        let url = client().search_url(&SearchFilter::new()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://indexer.example/api/v1/dapp/attestationstation/Attestations?apikey=sekrit"
        );
    }

    #[test]
    fn test_search_url_with_all_filters() {
        let filter = SearchFilter::new()
            .with_creator(Address::parse("0x1111111111111111111111111111111111111111").unwrap())
            .with_about(Address::parse("0x2222222222222222222222222222222222222222").unwrap())
            .with_human_key("k")
            .with_transaction_hash(TxHash::parse(&format!("0x{}", "cd".repeat(32))).unwrap());
        let url = client().search_url(&filter).unwrap();
        let query = url.query().unwrap();
        assert!(query.starts_with("creator=0x1111"));
        assert!(query.contains("&about=0x2222"));
        assert!(query.contains(&format!("&key={}", key_codec::encode("k"))));
        assert!(query.contains(&format!("&transactionHash=0x{}", "cd".repeat(32))));
        assert!(query.ends_with("&apikey=sekrit"));
    }

    #[test]
    fn test_short_key_filter_is_padded_bytes32() {
        let filter = SearchFilter::new().with_human_key("short");
        let key = filter.key.unwrap();
        assert!(key.starts_with("0x"));
        assert_eq!(key.len(), 66);
    }

    #[test]
    fn test_long_key_filter_is_passed_through() {
        let long = "a".repeat(40);
        let filter = SearchFilter::new().with_human_key(&long);
        assert_eq!(filter.key.unwrap(), long);
    }

    #[test]
    fn test_parse_search_body_array() {
        let body = json!([{
            "creator": "0x1111111111111111111111111111111111111111",
            "about": "0x2222222222222222222222222222222222222222",
            "key": format!("0x{}", hex::encode(key_codec::encode("k").as_bytes())),
            "val": "74727565",
            "transactionHash": format!("0x{}", "ab".repeat(32)),
            "createdAtTimestamp": "2022-12-15T09:30:45.000Z"
        }]);
        let entries = parse_search_body(body).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].val, "74727565");
    }

    #[test]
    fn test_parse_search_body_not_found_string() {
        assert!(parse_search_body(json!("Not Found!")).unwrap().is_empty());
    }

    #[test]
    fn test_parse_search_body_rejects_other_shapes() {
        assert!(matches!(
            parse_search_body(json!({"weird": true})),
            Err(IndexerError::UnexpectedShape)
        ));
    }

    #[test]
    fn test_parse_leaderboard_body() {
        let body = json!([
            {"creator": "0x1111111111111111111111111111111111111111", "attestationCount": 42},
            {"creator": "not-an-address", "attestationCount": 7},
        ]);
        let entries = parse_leaderboard_body(body, LeaderboardGroup::Creator).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].attestation_count, 42);
    }

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let with_slash =
            IndexerClient::new("https://indexer.example/api/", "k").unwrap();
        let url = with_slash.search_url(&SearchFilter::new()).unwrap();
        assert!(url.path().ends_with("/api/Attestations"));
    }
}
