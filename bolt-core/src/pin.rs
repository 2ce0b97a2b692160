//! TOFU pin store — binds a remote peer's identity public key to its peer
//! code on first contact, and flags any later divergence as a mismatch.
//!
//! Trust-on-first-use: the first identity key seen for a peer code is
//! pinned unverified (`verified: false`). A later SAS confirmation (or
//! other out-of-band check) upgrades the pin to `verified: true` via
//! [`PinPersistence::mark_verified`]. If a *different* identity key ever
//! shows up for the same peer code, [`verify_pinned_identity`] returns a
//! [`KeyMismatchError`] and the session MUST be aborted — see
//! [`crate::identity`] for the error type.
//!
//! Pin storage is distinct from identity storage: identity keys are the
//! local keypair, pins are what we remember about *remote* peers.

use crate::identity::KeyMismatchError;

/// A pinned remote identity, keyed externally by peer code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinRecord {
    /// The remote peer's identity public key (32 bytes).
    pub identity_pub: [u8; 32],
    /// Whether the pin has been confirmed out-of-band (e.g. via SAS).
    pub verified: bool,
}

/// Outcome of checking an incoming identity key against the pin store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinOutcome {
    /// No prior pin existed; one was created (unverified).
    Pinned,
    /// A prior pin existed and matched; carries its verified flag.
    Verified(bool),
}

/// Persistence contract for remote identity pins.
///
/// Implementations are provided by the embedder. `bolt-core` ships
/// [`InMemoryPinStore`] as a reference implementation for tests.
pub trait PinPersistence {
    /// Look up the pin for a peer code, if one exists.
    fn get_pin(&self, peer_code: &str) -> Option<PinRecord>;

    /// Store a pin for a peer code, replacing any previous one.
    fn set_pin(&mut self, peer_code: &str, record: PinRecord);

    /// Remove the pin for a peer code, if any.
    fn remove_pin(&mut self, peer_code: &str);

    /// Mark an existing pin as verified. No-op if the peer code has no pin.
    fn mark_verified(&mut self, peer_code: &str) {
        if let Some(mut record) = self.get_pin(peer_code) {
            record.verified = true;
            self.set_pin(peer_code, record);
        }
    }
}

/// In-memory [`PinPersistence`] — reference implementation and test double.
#[derive(Default)]
pub struct InMemoryPinStore {
    pins: std::collections::HashMap<String, PinRecord>,
}

impl PinPersistence for InMemoryPinStore {
    fn get_pin(&self, peer_code: &str) -> Option<PinRecord> {
        self.pins.get(peer_code).cloned()
    }

    fn set_pin(&mut self, peer_code: &str, record: PinRecord) {
        self.pins.insert(peer_code.to_string(), record);
    }

    fn remove_pin(&mut self, peer_code: &str) {
        self.pins.remove(peer_code);
    }
}

/// Check `identity_pub` against the pin store for `peer_code`.
///
/// - No pin on file: pin `identity_pub` unverified, return [`PinOutcome::Pinned`].
/// - Matching pin: return [`PinOutcome::Verified`] carrying the stored flag.
/// - Mismatched pin: return `Err(KeyMismatchError)`. The caller MUST treat
///   this as terminal and abort the session — never overwrite the pin.
///
/// # Parity
/// TS equivalent: `verifyPinnedIdentity(store, peerCode, identityPub)`.
pub fn verify_pinned_identity<S: PinPersistence + ?Sized>(
    store: &mut S,
    peer_code: &str,
    identity_pub: &[u8; 32],
) -> Result<PinOutcome, KeyMismatchError> {
    match store.get_pin(peer_code) {
        None => {
            store.set_pin(
                peer_code,
                PinRecord {
                    identity_pub: *identity_pub,
                    verified: false,
                },
            );
            Ok(PinOutcome::Pinned)
        }
        Some(existing) if existing.identity_pub == *identity_pub => {
            Ok(PinOutcome::Verified(existing.verified))
        }
        Some(existing) => Err(KeyMismatchError {
            peer_code: peer_code.to_string(),
            expected: existing.identity_pub,
            received: *identity_pub,
        }),
    }
}
