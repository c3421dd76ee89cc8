//! Attestation key encoding
//!
//! A human key of at most 31 UTF-8 bytes is stored as a right-zero-padded
//! bytes32 and can be recovered exactly. A longer key is stored as its
//! keccak256 digest, a one-way commitment that cannot be decoded again.

use crate::codec::EMPTY_PLACEHOLDER;
use crate::crypto::keccak256;
use crate::types::Bytes32;

/// Longest key that fits the padded (reversible) encoding, in UTF-8 bytes
pub const MAX_PADDED_KEY_BYTES: usize = 31;

#[derive(Debug, thiserror::Error)]
pub enum KeyDecodeError {
    #[error("padded key is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Encode a human-readable key into its on-chain bytes32 form
///
/// The empty string is treated as the literal key `"0x"` before encoding.
pub fn encode(human_key: &str) -> Bytes32 {
    let key = effective_key(human_key);
    let bytes = key.as_bytes();
    if bytes.len() <= MAX_PADDED_KEY_BYTES {
        let mut out = [0u8; 32];
        out[..bytes.len()].copy_from_slice(bytes);
        Bytes32::new(out)
    } else {
        Bytes32::new(keccak256(bytes))
    }
}

/// Whether this key will be stored as a keccak256 digest rather than padded
///
/// The read side shows the hashed form to the user exactly when this holds,
/// since a hashed key cannot be recovered from chain data.
pub fn is_hashed(human_key: &str) -> bool {
    effective_key(human_key).len() > MAX_PADDED_KEY_BYTES
}

/// Decode a padded bytes32 key back into its human-readable form
///
/// Only defined for the padded (short-key) encoding: trailing zero bytes are
/// stripped and the rest decoded as UTF-8. Applying this to a hashed key
/// yields garbage or an error; callers must track which branch was used,
/// e.g. by checking [`is_hashed`] on the original key.
pub fn decode(key: &Bytes32) -> Result<String, KeyDecodeError> {
    let bytes = key.as_bytes();
    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |pos| pos + 1);
    Ok(String::from_utf8(bytes[..end].to_vec())?)
}

fn effective_key(human_key: &str) -> &str {
    if human_key.is_empty() {
        EMPTY_PLACEHOLDER
    } else {
        human_key
    }
}
