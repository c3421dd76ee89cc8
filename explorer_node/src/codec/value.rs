//! Attestation value encoding
//!
//! Writes are always UTF-8 text. Reads support two decode strategies because
//! the indexer has shipped values both as raw byte sequences and as bare hex
//! digit strings; the caller picks the strategy matching its data source.

use crate::codec::EMPTY_PLACEHOLDER;

#[derive(Debug, thiserror::Error)]
pub enum ValueDecodeError {
    #[error("value is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("value is not a hex digit string: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// How a stored value should be turned back into display text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueEncoding {
    /// The bytes are UTF-8 text
    Utf8,
    /// The bytes are ASCII hex digits; each pair maps to one character
    HexAscii,
}

/// Encode a human-readable value into its on-chain byte form
///
/// The empty string is treated as the literal value `"0x"` before encoding,
/// consistent with the key codec.
pub fn encode(human_value: &str) -> Vec<u8> {
    let value = if human_value.is_empty() {
        EMPTY_PLACEHOLDER
    } else {
        human_value
    };
    value.as_bytes().to_vec()
}

/// Decode a stored value into display text using the selected strategy
pub fn decode_as_text(val: &[u8], encoding: ValueEncoding) -> Result<String, ValueDecodeError> {
    match encoding {
        ValueEncoding::Utf8 => Ok(std::str::from_utf8(val)?.to_owned()),
        ValueEncoding::HexAscii => {
            let digits = std::str::from_utf8(val)?;
            hex_to_ascii(digits)
        }
    }
}

/// Map a hex digit string to characters, one per byte pair
fn hex_to_ascii(digits: &str) -> Result<String, ValueDecodeError> {
    let digits = digits.strip_prefix("0x").unwrap_or(digits);
    let bytes = hex::decode(digits)?;
    Ok(bytes.into_iter().map(char::from).collect())
}
