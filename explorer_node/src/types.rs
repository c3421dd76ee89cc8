//! Core attestation types and parsing

use ethereum_types::{H160, H256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::crypto::to_checksum_address;

/// Errors raised when parsing addresses, keys, or transaction hashes
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("address must start with '0x'")]
    MissingHexPrefix,

    #[error("address must be 42 characters long (including '0x')")]
    BadAddressLength,

    #[error("address contains invalid hex characters")]
    NonHexAddress,

    #[error("address checksum does not match EIP-55 encoding")]
    ChecksumMismatch,

    #[error("expected exactly 32 bytes, got {0}")]
    BadByteLength(usize),

    #[error("value contains invalid hex characters")]
    NonHexValue,

    #[error("transaction hash must be '0x' followed by 64 hex characters")]
    BadTransactionHash,
}

/// A 20-byte Ethereum address
///
/// Parsing accepts all-lowercase and all-uppercase hex as-is; mixed-case
/// input must satisfy the EIP-55 checksum. Displays as the checksummed form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(H160);

impl Address {
    pub fn new(inner: H160) -> Self {
        Self(inner)
    }

    /// Parse a `0x`-prefixed hex address, enforcing EIP-55 on mixed-case input
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let hex_part = s.strip_prefix("0x").ok_or(ParseError::MissingHexPrefix)?;
        if s.len() != 42 {
            return Err(ParseError::BadAddressLength);
        }
        if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseError::NonHexAddress);
        }

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(hex_part.to_ascii_lowercase(), &mut bytes)
            .map_err(|_| ParseError::NonHexAddress)?;
        let address = H160::from(bytes);

        let has_upper = hex_part.chars().any(|c| c.is_ascii_uppercase());
        let has_lower = hex_part.chars().any(|c| c.is_ascii_lowercase());
        if has_upper && has_lower {
            let checksummed = to_checksum_address(&address);
            if checksummed[2..] != *hex_part {
                return Err(ParseError::ChecksumMismatch);
            }
        }

        Ok(Self(address))
    }

    pub fn h160(&self) -> H160 {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", to_checksum_address(&self.0))
    }
}

impl FromStr for Address {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

impl From<H160> for Address {
    fn from(inner: H160) -> Self {
        Self(inner)
    }
}

/// A fixed 32-byte value (attestation key, hash digest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Bytes32([u8; 32]);

impl Bytes32 {
    /// Create a new value from a 32-byte array
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create a value from a slice (returns error if not 32 bytes)
    pub fn from_slice(slice: &[u8]) -> Result<Self, ParseError> {
        if slice.len() != 32 {
            return Err(ParseError::BadByteLength(slice.len()));
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(slice);
        Ok(Self(bytes))
    }

    /// Parse from a hex string, with or without the `0x` prefix
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.len() != 64 {
            return Err(ParseError::BadByteLength(digits.len() / 2));
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| ParseError::NonHexValue)?;
        Ok(Self(bytes))
    }

    /// Get the value as a byte slice
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Get the value as a byte array
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }
}

impl Default for Bytes32 {
    fn default() -> Self {
        Self([0u8; 32])
    }
}

impl fmt::Display for Bytes32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Bytes32 {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Bytes32 {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Bytes32> for String {
    fn from(value: Bytes32) -> Self {
        value.to_string()
    }
}

impl From<[u8; 32]> for Bytes32 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Bytes32 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A 32-byte transaction hash
///
/// Unlike [`Bytes32`], parsing is strict: the `0x` prefix is required,
/// matching how hashes are entered in the search form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TxHash(H256);

impl TxHash {
    pub fn new(inner: H256) -> Self {
        Self(inner)
    }

    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let digits = s.strip_prefix("0x").ok_or(ParseError::BadTransactionHash)?;
        if digits.len() != 64 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseError::BadTransactionHash);
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits.to_ascii_lowercase(), &mut bytes)
            .map_err(|_| ParseError::BadTransactionHash)?;
        Ok(Self(H256::from(bytes)))
    }

    pub fn h256(&self) -> H256 {
        self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0.as_bytes()))
    }
}

impl FromStr for TxHash {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TxHash {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<TxHash> for String {
    fn from(hash: TxHash) -> Self {
        hash.to_string()
    }
}

impl From<H256> for TxHash {
    fn from(inner: H256) -> Self {
        Self(inner)
    }
}

/// An attestation tuple ready for on-chain submission
///
/// `key` is always exactly 32 bytes: either a zero-padded short key or the
/// keccak256 digest of a long one. `val` is an arbitrary byte sequence,
/// typically UTF-8 text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attestation {
    /// The address the claim is about
    pub about: Address,
    /// The 32-byte on-chain key
    pub key: Bytes32,
    /// The raw value bytes
    pub val: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_accepts_lowercase() {
        let address = Address::parse("0x1111111111111111111111111111111111111111").unwrap();
        assert_eq!(address.as_bytes(), &[0x11u8; 20]);
    }

    #[test]
    fn test_address_accepts_valid_checksum() {
        let address = Address::parse("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").unwrap();
        assert_eq!(
            address.to_string(),
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        );
    }

    #[test]
    fn test_address_rejects_bad_checksum() {
        // Same address with two case flips
        let result = Address::parse("0x5aaeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
        assert_eq!(result, Err(ParseError::ChecksumMismatch));
    }

    #[test]
    fn test_address_rejects_malformed_input() {
        assert_eq!(
            Address::parse("1111111111111111111111111111111111111111"),
            Err(ParseError::MissingHexPrefix)
        );
        assert_eq!(
            Address::parse("0x11111111111111111111111111111111111111"),
            Err(ParseError::BadAddressLength)
        );
        assert_eq!(
            Address::parse("0xzz11111111111111111111111111111111111111"),
            Err(ParseError::NonHexAddress)
        );
    }

    #[test]
    fn test_address_display_reparses() {
        let address = Address::parse("0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359").unwrap();
        let reparsed = Address::parse(&address.to_string()).unwrap();
        assert_eq!(address, reparsed);
    }

    #[test]
    fn test_bytes32_from_slice_rejects_wrong_length() {
        assert!(Bytes32::from_slice(&[1u8; 32]).is_ok());
        assert_eq!(
            Bytes32::from_slice(&[1u8; 31]),
            Err(ParseError::BadByteLength(31))
        );
    }

    #[test]
    fn test_bytes32_hex_round_trip() {
        let value = Bytes32::new([0xabu8; 32]);
        assert_eq!(Bytes32::parse(&value.to_string()).unwrap(), value);
        // Prefix is optional
        assert_eq!(Bytes32::parse(&"ab".repeat(32)).unwrap(), value);
    }

    #[test]
    fn test_tx_hash_requires_strict_format() {
        let hash = format!("0x{}", "4d".repeat(32));
        assert!(TxHash::parse(&hash).is_ok());
        assert!(TxHash::parse(&hash[2..]).is_err());
        assert!(TxHash::parse("0x1234").is_err());
        assert!(TxHash::parse(&format!("0x{}", "g".repeat(64))).is_err());
    }

    #[test]
    fn test_serde_uses_string_forms() {
        let address = Address::parse("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").unwrap();
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, "\"0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed\"");
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
    }
}
