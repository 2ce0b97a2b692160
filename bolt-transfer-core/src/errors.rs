//! Error types for bolt-transfer-core.
//!
//! One enum for this crate's own concerns, per the workspace's
//! one-enum-per-crate convention (`bolt_core::errors::BoltError` for the
//! crypto/constants layer, this one for transfer bookkeeping).

/// Transfer-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// Generic transfer-state violation (bad field, unknown transfer, etc).
    #[error("Transfer error: {0}")]
    Transfer(String),

    /// Assembled-blob hash did not match the advertised `fileHash`.
    #[error("Integrity error: {0}")]
    Integrity(String),

    /// Propagated from `bolt-core` (SHA-256 failure, encoding failure).
    #[error(transparent)]
    Bolt(#[from] bolt_core::errors::BoltError),
}
