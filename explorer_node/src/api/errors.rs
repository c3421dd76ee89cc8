//! API error handling for the explorer service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::batch::ValidationReport;

/// API error payload returned with a matching HTTP status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: u16,
    pub message: String,
    pub details: Option<serde_json::Value>,
    pub timestamp: u64,
}

impl ApiError {
    pub fn new(code: u16, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            timestamp: chrono::Utc::now().timestamp() as u64,
        }
    }

    pub fn with_details(code: u16, message: String, details: serde_json::Value) -> Self {
        Self {
            code,
            message,
            details: Some(details),
            timestamp: chrono::Utc::now().timestamp() as u64,
        }
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new(400, message.to_string())
    }

    pub fn unprocessable_entity(message: &str) -> Self {
        Self::new(422, message.to_string())
    }

    pub fn internal_server_error(message: &str) -> Self {
        Self::new(500, message.to_string())
    }

    /// A single field failed syntactic validation
    pub fn validation_error(field: &str, reason: &str) -> Self {
        Self::with_details(
            422,
            "Validation error".to_string(),
            serde_json::json!({
                "field": field,
                "reason": reason
            }),
        )
    }

    /// A CSV batch failed validation; details carry the per-category report
    pub fn invalid_batch(report: &ValidationReport) -> Self {
        Self::with_details(
            422,
            "Batch validation failed".to_string(),
            serde_json::to_value(report).unwrap_or(serde_json::Value::Null),
        )
    }

    /// The wallet/contract layer rejected a submission
    pub fn submission_failed(reason: &str) -> Self {
        Self::with_details(
            502,
            "Attestation submission failed".to_string(),
            serde_json::json!({
                "reason": reason
            }),
        )
    }

    /// Submissions are disabled because no relayer wallet is configured
    pub fn submission_disabled() -> Self {
        Self::new(503, "Submission disabled: no relayer wallet configured".to_string())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API Error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Accumulates per-field validation failures for one request
#[derive(Debug, Default, Serialize)]
pub struct FieldErrors {
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: String) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_api_error(self) -> ApiError {
        ApiError::with_details(
            422,
            "Validation failed".to_string(),
            serde_json::to_value(self).unwrap_or(serde_json::Value::Null),
        )
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{validate, BatchRow};

    #[test]
    fn test_validation_error_carries_field_details() {
        let error = ApiError::validation_error("about", "address must start with '0x'");
        assert_eq!(error.code, 422);
        let details = error.details.unwrap();
        assert_eq!(details["field"], "about");
    }

    #[test]
    fn test_invalid_batch_embeds_report() {
        let report = validate(&[BatchRow {
            about: "0xBAD".to_string(),
            key: "k".to_string(),
            val: "v".to_string(),
        }]);
        let error = ApiError::invalid_batch(&report);
        let details = error.details.unwrap();
        assert_eq!(details["row_errors"]["invalid-address"][0], 0);
    }

    #[test]
    fn test_field_errors_accumulate() {
        let mut errors = FieldErrors::new();
        assert!(errors.is_empty());
        errors.add("key", "key cannot be empty".to_string());
        errors.add("val", "value cannot be empty".to_string());
        let error = errors.into_api_error();
        assert_eq!(error.code, 422);
        assert_eq!(error.details.unwrap()["errors"][1]["field"], "val");
    }
}
