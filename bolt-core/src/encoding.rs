//! Encoding utilities — base64 and hex.
//!
//! TS uses `tweetnacl-util` for base64 (standard alphabet, no padding
//! quirks). Rust uses the `base64` crate with STANDARD engine.
//!
//! ## Parity gates (R1)
//! - `to_base64(bytes) == TS toBase64(bytes)` for all vector payloads.
//! - `to_hex(bytes) == TS bufferToHex(bytes)` for all vector nonces/keys.
//! - Round-trip: `from_base64(to_base64(x)) == x` for arbitrary input.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::errors::BoltError;

/// Encode bytes to standard base64 (RFC 4648, with padding).
///
/// # Parity
/// Must produce identical output to TS `toBase64(data: Uint8Array)`.
pub fn to_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decode standard base64 to bytes.
///
/// # Parity
/// Must accept all outputs of TS `toBase64` and return identical bytes.
///
/// # Errors
/// Returns `BoltError::Encoding` on invalid base64 input.
pub fn from_base64(encoded: &str) -> Result<Vec<u8>, BoltError> {
    STANDARD
        .decode(encoded)
        .map_err(|e| BoltError::Encoding(format!("invalid base64: {e}")))
}

/// Encode bytes to lowercase hex string.
///
/// # Parity
/// Must produce identical output to TS `bufferToHex(buffer: ArrayBuffer)`.
pub fn to_hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{b:02x}")).collect()
}

/// Decode hex string to bytes.
///
/// # Errors
/// Returns `BoltError::Encoding` on invalid hex input.
pub fn from_hex(encoded: &str) -> Result<Vec<u8>, BoltError> {
    if !encoded.len().is_multiple_of(2) {
        return Err(BoltError::Encoding("odd-length hex string".into()));
    }
    (0..encoded.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&encoded[i..i + 2], 16)
                .map_err(|e| BoltError::Encoding(format!("invalid hex: {e}")))
        })
        .collect()
}
