//! Error types for bolt-core.
//!
//! Maps to TS error hierarchy: `BoltError` (base), `EncryptionError`,
//! `ConnectionError`, `TransferError`, `IntegrityError`. Rust uses an
//! enum instead of class inheritance.
//!
//! ## Parity gate (R1)
//! Error variant names and messages must match TS error class names
//! and default messages for interop diagnostics.

/// Unified error type for all bolt-core operations.
#[derive(Debug, thiserror::Error)]
pub enum BoltError {
    /// Encryption or decryption failure (NaCl box).
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Connection-level error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// File transfer error.
    #[error("Transfer error: {0}")]
    Transfer(String),

    /// File integrity check failed.
    #[error("Integrity error: {0}")]
    Integrity(String),

    /// Encoding error (base64, hex).
    #[error("Encoding error: {0}")]
    Encoding(String),
}

/// Canonical wire error code registry (`spec.md` §4.1).
///
/// Exactly 22 codes in two classes of 11. This is the complete set of
/// strings a Bolt endpoint may place in an `Error` wire frame's `code`
/// field; it is a disjoint taxonomy from [`BoltError`] — the wire codes
/// describe *what the other peer is told*, `BoltError` describes *what
/// this process observed internally*. Order matches the protocol
/// registry and is asserted by conformance tests; do not reorder.
pub const WIRE_ERROR_CODES: [&str; 22] = [
    // Protocol class (11)
    "VERSION_MISMATCH",
    "ENCRYPTION_FAILED",
    "INTEGRITY_FAILED",
    "REPLAY_DETECTED",
    "TRANSFER_FAILED",
    "LIMIT_EXCEEDED",
    "CONNECTION_LOST",
    "PEER_NOT_FOUND",
    "ALREADY_CONNECTED",
    "INVALID_STATE",
    "KEY_MISMATCH",
    // Enforcement class (11)
    "DUPLICATE_HELLO",
    "ENVELOPE_REQUIRED",
    "ENVELOPE_UNNEGOTIATED",
    "ENVELOPE_DECRYPT_FAIL",
    "ENVELOPE_INVALID",
    "HELLO_PARSE_ERROR",
    "HELLO_DECRYPT_FAIL",
    "HELLO_SCHEMA_ERROR",
    "INVALID_MESSAGE",
    "UNKNOWN_MESSAGE_TYPE",
    "PROTOCOL_VIOLATION",
];

/// Validate a wire error code against the canonical registry.
///
/// Gates both outbound emission (never send a code outside the registry)
/// and inbound parsing (any unknown or non-canonical code on the wire is
/// treated as `PROTOCOL_VIOLATION`, never passed through as-is).
pub fn is_valid_wire_error_code(code: &str) -> bool {
    !code.is_empty() && WIRE_ERROR_CODES.contains(&code)
}
