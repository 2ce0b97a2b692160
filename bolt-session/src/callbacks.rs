//! Embedder-facing callback types (`spec.md` §6.2, §7).

use crate::errors::SessionError;

/// Identity verification state, emitted exactly once per session
/// (`spec.md` §4.5.3 step 11) and on legacy fallback (§4.5.2).
///
/// An explicit enum variant for the legacy case (rather than a
/// `{state: "legacy", sas_code: None}` sentinel pair) lets callers match
/// exhaustively instead of having to separately check for a null SAS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationState {
    /// Peer never advertised an identity key; no SAS was computed.
    Legacy,
    /// First contact, or a pin on file that has not yet been confirmed
    /// out-of-band. Carries the computed SAS for the user to compare.
    Unverified(String),
    /// Pin on file and previously confirmed out-of-band.
    Verified(String),
}

/// `spec.md` §6.1 Control: one of paused/resumed/cancelled progress, or
/// in-flight progress with a chunk counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStatus {
    Transferring,
    Completed,
    Error,
    CanceledBySender,
    CanceledByReceiver,
}

/// A single progress event surfaced to the embedder during a transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferProgress {
    pub filename: String,
    pub status: TransferStatus,
    pub current_chunk: Option<u32>,
    pub total_chunks: Option<u32>,
}

/// Callbacks the embedder supplies to a [`crate::engine::Session`]
/// (`spec.md` §6.2). Plain synchronous callbacks: nothing here awaits,
/// matching the spec's framing of these as fire-and-forget notifications
/// rather than steps the protocol blocks on.
pub trait EngineCallbacks: Send {
    fn on_receive_file(&mut self, blob: Vec<u8>, filename: &str);
    fn on_error(&mut self, error: &SessionError);
    fn on_progress(&mut self, progress: TransferProgress);
    fn on_verification_state(&mut self, state: VerificationState);
}
