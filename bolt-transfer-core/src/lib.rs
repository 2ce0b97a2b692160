//! Bolt Transfer Core — the transport-agnostic chunked file-transfer state
//! machine for the Bolt secure peer-to-peer file transfer protocol.
//!
//! This crate knows nothing about encryption, the data channel, or the
//! handshake — it depends on `bolt-core` only for constants, `BoltError`,
//! and SHA-256. `bolt-session` drives chunks through [`sender::ChunkPlan`]
//! and [`receiver::ReceiverRegistry`] once they have already been
//! encrypted/decrypted and routed past the HELLO/envelope machinery.
//!
//! # Module map
//!
//! | Module | Responsibility |
//! |--------|-----------------|
//! | [`errors`] | `TransferError` |
//! | [`wire`] | `file-chunk` data/control frame shapes |
//! | [`sender`] | Chunk-index arithmetic, transfer-id registry, pause/cancel |
//! | [`receiver`] | Guarded/legacy reassembly, replay protection, integrity |
//! | [`metrics`] | Feature-gated transfer-sample ring buffer (`metrics`) |

pub mod errors;
pub mod receiver;
pub mod sender;
pub mod wire;

#[cfg(feature = "metrics")]
pub mod metrics;
