//! REST handlers for the explorer API

use axum::extract::{Query, State};
use axum::Json;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::api::errors::{ApiError, ApiResult, FieldErrors};
use crate::api::server::AppState;
use crate::api::validation::{validate_address, validate_tx_hash};
use crate::batch;
use crate::codec::{key as key_codec, value as value_codec};
use crate::feed::{self, DisplayRecord, Grouped};
use crate::indexer::{LeaderboardGroup, SearchFilter};
use crate::types::{Address, Attestation, TxHash};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Query parameters of the attestation search endpoint
///
/// Empty parameters are treated as absent, matching the search form.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub creator: Option<String>,
    pub about: Option<String>,
    pub key: Option<String>,
    pub tx: Option<String>,
}

/// One grouped attestation card in API responses
#[derive(Debug, Serialize)]
pub struct FeedRecord {
    pub transaction_hash: TxHash,
    pub creator: String,
    pub creator_short: String,
    pub about: String,
    pub about_short: String,
    pub keys: Grouped<String>,
    pub values: Grouped<String>,
    pub date: String,
    pub time: String,
}

impl FeedRecord {
    fn from_display(record: &DisplayRecord) -> Self {
        Self {
            transaction_hash: record.transaction_hash,
            creator: record.creator.to_string(),
            creator_short: feed::truncate_address(&record.creator),
            about: record.about.to_string(),
            about_short: feed::truncate_address(&record.about),
            keys: record.keys.map(feed::display_key),
            values: record.values.map(|val| feed::display_value(val)),
            date: feed::display_date(&record.created_at),
            time: feed::display_time(&record.created_at),
        }
    }
}

/// Search historical attestations via the indexer
///
/// An indexer failure degrades to an empty feed instead of an error; the
/// view renders "no data" and the failure is logged.
pub async fn search_attestations(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<FeedRecord>>> {
    let filter = build_filter(&params)?;

    let entries = match state.indexer.search(&filter).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!("indexer query failed: {e}");
            Vec::new()
        }
    };

    let records = feed::group(entries);
    Ok(Json(records.iter().map(FeedRecord::from_display).collect()))
}

fn build_filter(params: &SearchParams) -> ApiResult<SearchFilter> {
    let mut filter = SearchFilter::new();
    if let Some(creator) = present(&params.creator) {
        filter = filter.with_creator(validate_address("creator", creator)?);
    }
    if let Some(about) = present(&params.about) {
        filter = filter.with_about(validate_address("about", about)?);
    }
    if let Some(key) = present(&params.key) {
        filter = filter.with_human_key(key);
    }
    if let Some(tx) = present(&params.tx) {
        filter = filter.with_transaction_hash(validate_tx_hash("tx", tx)?);
    }
    Ok(filter)
}

fn present(param: &Option<String>) -> Option<&str> {
    param.as_deref().filter(|value| !value.is_empty())
}

#[derive(Debug, Serialize)]
pub struct LeaderboardRow {
    pub address: String,
    pub address_short: String,
    pub attestation_count: u64,
}

pub async fn leaderboard_creators(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<LeaderboardRow>>> {
    leaderboard(state, LeaderboardGroup::Creator).await
}

pub async fn leaderboard_subjects(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<LeaderboardRow>>> {
    leaderboard(state, LeaderboardGroup::About).await
}

async fn leaderboard(state: AppState, group: LeaderboardGroup) -> ApiResult<Json<Vec<LeaderboardRow>>> {
    let entries = match state.indexer.leaderboard(group).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!("leaderboard query failed: {e}");
            Vec::new()
        }
    };

    Ok(Json(
        entries
            .iter()
            .map(|entry| LeaderboardRow {
                address: entry.address.to_string(),
                address_short: feed::truncate_address(&entry.address),
                attestation_count: entry.attestation_count,
            })
            .collect(),
    ))
}

/// Request body for a single attestation
#[derive(Debug, Deserialize)]
pub struct NewAttestationRequest {
    pub about: String,
    pub key: String,
    pub val: String,
}

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub success: bool,
    pub transaction_hash: String,
    pub explorer_url: String,
    pub attestation_count: usize,
    /// Digest the key was compressed to, present only for long keys
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hashed_key: Option<String>,
}

/// Submit a single attestation
pub async fn submit_attestation(
    State(state): State<AppState>,
    Json(payload): Json<NewAttestationRequest>,
) -> ApiResult<Json<SubmissionResponse>> {
    let mut errors = FieldErrors::new();
    let about = Address::parse(&payload.about);
    if let Err(e) = &about {
        errors.add("about", e.to_string());
    }
    if payload.key.is_empty() {
        errors.add("key", "key cannot be empty".to_string());
    }
    if payload.val.is_empty() {
        errors.add("val", "value cannot be empty".to_string());
    }
    let about = match (about, errors.is_empty()) {
        (Ok(about), true) => about,
        _ => return Err(errors.into_api_error()),
    };

    if !state.station.can_submit() {
        return Err(ApiError::submission_disabled());
    }

    let hashed_key =
        key_codec::is_hashed(&payload.key).then(|| key_codec::encode(&payload.key).to_string());
    let attestation = Attestation {
        about,
        key: key_codec::encode(&payload.key),
        val: value_codec::encode(&payload.val),
    };

    let tx_hash = state
        .station
        .attest(&[attestation])
        .await
        .map_err(|e| ApiError::submission_failed(&e.to_string()))?;

    Ok(Json(SubmissionResponse {
        success: true,
        transaction_hash: tx_hash.to_string(),
        explorer_url: state.station.etherscan_tx_url(&tx_hash),
        attestation_count: 1,
        hashed_key,
    }))
}

/// Submit a CSV batch of attestations in one transaction
///
/// The body is the raw CSV text with an `about,key,val` header. Validation
/// failures return the full per-category report so the caller can point at
/// every offending row at once.
pub async fn submit_batch(
    State(state): State<AppState>,
    body: String,
) -> ApiResult<Json<SubmissionResponse>> {
    let rows = batch::read_rows(body.as_bytes())
        .map_err(|e| ApiError::bad_request(&e.to_string()))?;
    if rows.is_empty() {
        return Err(ApiError::unprocessable_entity("batch contains no rows"));
    }

    let report = batch::validate(&rows);
    if !report.is_valid {
        return Err(ApiError::invalid_batch(&report));
    }

    if !state.station.can_submit() {
        return Err(ApiError::submission_disabled());
    }

    let attestations = batch::normalize(&rows);
    let tx_hash = state
        .station
        .attest(&attestations)
        .await
        .map_err(|e| ApiError::submission_failed(&e.to_string()))?;

    Ok(Json(SubmissionResponse {
        success: true,
        transaction_hash: tx_hash.to_string(),
        explorer_url: state.station.etherscan_tx_url(&tx_hash),
        attestation_count: attestations.len(),
        hashed_key: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_skips_empty_params() {
        let params = SearchParams {
            creator: Some(String::new()),
            about: None,
            key: Some("k".to_string()),
            tx: None,
        };
        let filter = build_filter(&params).unwrap();
        assert!(filter.creator.is_none());
        assert!(filter.key.is_some());
    }

    #[test]
    fn test_build_filter_rejects_bad_address() {
        let params = SearchParams {
            creator: Some("0xBAD".to_string()),
            ..Default::default()
        };
        let error = build_filter(&params).unwrap_err();
        assert_eq!(error.code, 422);
    }

    #[test]
    fn test_build_filter_rejects_bad_tx_hash() {
        let params = SearchParams {
            tx: Some("0x1234".to_string()),
            ..Default::default()
        };
        assert!(build_filter(&params).is_err());
    }
}
