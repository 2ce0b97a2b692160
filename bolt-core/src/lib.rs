//! Bolt Core — crypto primitives, constants, and persistence traits for
//! the Bolt secure peer-to-peer file transfer protocol.
//!
//! This crate is transport-agnostic and has no async runtime dependency:
//! it is the protocol's cryptographic and data-model foundation, consumed
//! by `bolt-transfer-core` (chunk assembly) and `bolt-session` (the
//! handshake/envelope state machine).
//!
//! # Module map
//!
//! | Module | Responsibility |
//! |--------|-----------------|
//! | [`constants`] | Protocol-wide fixed sizes and identifiers |
//! | [`errors`] | `BoltError` + the 22-code wire error registry |
//! | [`encoding`] | Base64 / hex codecs |
//! | [`crypto`] | NaCl `box` sealing, ephemeral keypair generation |
//! | [`hash`] | SHA-256 |
//! | [`identity`] | Identity keypairs, `IdentityPersistence`, `KeyMismatchError` |
//! | [`pin`] | TOFU pin records, `PinPersistence`, pin verification |
//! | [`sas`] | Short Authentication String computation |
//! | [`peer_code`] | Peer code generation and validation |
//! | [`transfer_policy`] | Deterministic back-pressure / pacing decisions |

/// Protocol constants.
pub mod constants;

/// Error types: `BoltError` and the wire error code registry.
pub mod errors;

/// Encoding utilities — base64 and hex.
pub mod encoding;

/// Crypto primitives — NaCl box (XSalsa20-Poly1305).
pub mod crypto;

/// Hashing utilities — SHA-256.
pub mod hash;

/// Identity — long-lived keypairs, persistence trait, TOFU mismatch error.
pub mod identity;

/// TOFU pin records and persistence.
pub mod pin;

/// SAS — Short Authentication String computation.
pub mod sas;

/// Peer code generation and validation.
pub mod peer_code;

/// Transfer scheduling policy — pure, deterministic back-pressure decisions.
pub mod transfer_policy;
