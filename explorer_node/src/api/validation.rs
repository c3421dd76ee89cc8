//! Request validation utilities for the explorer API

use crate::api::errors::ApiError;
use crate::types::{Address, TxHash};

/// Validate an EVM-style address field
pub fn validate_address(field: &str, value: &str) -> Result<Address, ApiError> {
    Address::parse(value).map_err(|e| ApiError::validation_error(field, &e.to_string()))
}

/// Validate a transaction-hash field (`0x` + 64 hex characters)
pub fn validate_tx_hash(field: &str, value: &str) -> Result<TxHash, ApiError> {
    TxHash::parse(value).map_err(|e| ApiError::validation_error(field, &e.to_string()))
}

/// Validate a required non-empty text field
pub fn validate_non_empty(field: &str, value: &str) -> Result<(), ApiError> {
    if value.is_empty() {
        return Err(ApiError::validation_error(
            field,
            &format!("{field} cannot be empty"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_address_accepts_valid() {
        assert!(validate_address("about", "0x1111111111111111111111111111111111111111").is_ok());
    }

    #[test]
    fn test_validate_address_reports_field() {
        let error = validate_address("creator", "0xBAD").unwrap_err();
        assert_eq!(error.code, 422);
        assert_eq!(error.details.unwrap()["field"], "creator");
    }

    #[test]
    fn test_validate_tx_hash() {
        let good = format!("0x{}", "ab".repeat(32));
        assert!(validate_tx_hash("tx", &good).is_ok());
        assert!(validate_tx_hash("tx", "0x1234").is_err());
    }

    #[test]
    fn test_validate_non_empty() {
        assert!(validate_non_empty("key", "k").is_ok());
        assert!(validate_non_empty("key", "").is_err());
    }
}
