//! Engine tunables (`spec.md` §5).
//!
//! A plain, `Copy`-able config struct, the same shape as
//! `bolt_core::transfer_policy::TransferConstraints` — no env vars, no
//! config files, no global singleton. An embedder that wants those wires
//! them up and constructs [`EngineConfig`] itself.

use std::time::Duration;

use bolt_core::constants::DEFAULT_CHUNK_SIZE;

/// Tunable timing and sizing parameters for a [`crate::engine::Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// `spec.md` §4.5.2 / §5(c): time to wait for the peer's HELLO when
    /// identity is configured, before disconnecting.
    pub hello_timeout: Duration,
    /// `spec.md` §5(c): overall time budget for `connect()`.
    pub connect_timeout: Duration,
    /// `spec.md` §4.1: plaintext bytes per `file-chunk` before encryption.
    pub chunk_size: u32,
    /// `spec.md` §4.5.5: back-pressure poll cadence while paused.
    pub pause_poll_interval: Duration,
    /// `spec.md` §4.5.5 step 6 / §5(d): delay before the `"completed"`
    /// progress event, so the receiver has a moment to finish assembly.
    pub completion_event_delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hello_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(30),
            chunk_size: DEFAULT_CHUNK_SIZE as u32,
            pause_poll_interval: Duration::from_millis(100),
            completion_event_delay: Duration::from_millis(50),
        }
    }
}
