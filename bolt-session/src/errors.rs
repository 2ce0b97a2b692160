//! Error types for bolt-session, and the one boundary point that maps
//! them onto the canonical wire error code registry (`spec.md` §4.1, §7).

use bolt_core::errors::{is_valid_wire_error_code, BoltError};
use bolt_core::identity::KeyMismatchError;
use bolt_transfer_core::errors::TransferError;

/// Internal surface error type for `bolt-session`. Disjoint from the wire
/// error code registry: this describes what *this process* observed;
/// [`WIRE_ERROR_CODES`](bolt_core::errors::WIRE_ERROR_CODES) describes
/// what the peer is told.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Bolt(#[from] BoltError),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error(transparent)]
    KeyMismatch(#[from] KeyMismatchError),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Protocol violation: {0}")]
    Protocol(String),
}

impl SessionError {
    /// Map this error onto the one canonical wire code that best
    /// describes it, for use in an outbound `Error` frame. This is the
    /// single conversion point between the internal error taxonomy and
    /// the wire taxonomy — callers must never invent a code ad hoc.
    pub fn wire_code(&self) -> &'static str {
        let code = match self {
            SessionError::Bolt(BoltError::Encryption(_)) => "ENCRYPTION_FAILED",
            SessionError::Bolt(BoltError::Integrity(_)) => "INTEGRITY_FAILED",
            SessionError::Bolt(BoltError::Connection(_)) => "CONNECTION_LOST",
            SessionError::Bolt(BoltError::Transfer(_)) => "TRANSFER_FAILED",
            SessionError::Bolt(BoltError::Encoding(_)) => "PROTOCOL_VIOLATION",
            SessionError::Transfer(TransferError::Integrity(_)) => "INTEGRITY_FAILED",
            SessionError::Transfer(_) => "TRANSFER_FAILED",
            SessionError::KeyMismatch(_) => "KEY_MISMATCH",
            SessionError::Connection(_) => "CONNECTION_LOST",
            SessionError::Protocol(_) => "PROTOCOL_VIOLATION",
        };
        debug_assert!(is_valid_wire_error_code(code));
        code
    }
}
