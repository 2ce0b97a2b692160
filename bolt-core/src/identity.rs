//! Identity — long-lived X25519 keypairs, their persistence trait, and the
//! TOFU mismatch error.
//!
//! Identity keys are persistent across sessions. Embedders provide the
//! actual storage (IndexedDB for web, filesystem/keychain for native) by
//! implementing [`IdentityPersistence`]; this module only provides
//! generation, the persistence contract, and the mismatch error type. Pin
//! storage (binding a *remote* identity key to a peer code) is a separate
//! concern — see [`crate::pin`].
//!
//! ## Parity
//! - `generate_identity_keypair()` produces valid 32-byte keys.
//! - Public key is derivable from secret key (X25519 property).
//! - `KeyMismatchError` carries peer_code, expected, received fields.

use crate::crypto::{generate_ephemeral_keypair, KeyPair};

/// Long-lived X25519 identity keypair.
///
/// Alias for `KeyPair` — same structure, different lifetime semantics.
/// Identity keys MUST NOT be sent through the signaling server; they
/// travel only inside encrypted DataChannel messages (HELLO).
pub type IdentityKeyPair = KeyPair;

/// Generate a persistent identity keypair (X25519).
///
/// # Parity
/// TS equivalent: `generateIdentityKeyPair()` (tweetnacl `box.keyPair()`).
/// Both use X25519 via OS CSPRNG — keypairs are structurally compatible.
pub fn generate_identity_keypair() -> IdentityKeyPair {
    generate_ephemeral_keypair()
}

/// TOFU violation error.
///
/// Thrown when a peer's identity public key does not match a previously
/// pinned value. The session MUST be aborted.
///
/// # Parity
/// TS equivalent: `KeyMismatchError` class (extends `BoltError`).
#[derive(Debug)]
pub struct KeyMismatchError {
    /// Peer code of the offending peer.
    pub peer_code: String,
    /// Previously pinned public key (32 bytes).
    pub expected: [u8; 32],
    /// Received public key that does not match (32 bytes).
    pub received: [u8; 32],
}

impl std::fmt::Display for KeyMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Identity key mismatch for peer {}", self.peer_code)
    }
}

impl std::error::Error for KeyMismatchError {}

/// Persistence contract for the local long-lived identity keypair.
///
/// Implementations are provided by the embedder (filesystem, IndexedDB,
/// platform keychain). `bolt-core` ships only [`InMemoryIdentityStore`] as
/// a reference implementation for tests and ephemeral (identity-less)
/// callers.
pub trait IdentityPersistence {
    /// Load the persisted identity keypair, if one has been saved.
    fn load(&self) -> Option<IdentityKeyPair>;

    /// Persist an identity keypair, replacing any previous one.
    fn save(&mut self, pair: &IdentityKeyPair);
}

/// In-memory [`IdentityPersistence`] — reference implementation and test
/// double. Not durable across process restarts.
#[derive(Default)]
pub struct InMemoryIdentityStore {
    stored: Option<IdentityKeyPair>,
}

impl IdentityPersistence for InMemoryIdentityStore {
    fn load(&self) -> Option<IdentityKeyPair> {
        self.stored.clone()
    }

    fn save(&mut self, pair: &IdentityKeyPair) {
        self.stored = Some(pair.clone());
    }
}

/// Return the persisted identity keypair, generating and saving a new one
/// if none exists yet.
///
/// # Parity
/// TS equivalent: `getOrCreateIdentity(store)`.
pub fn get_or_create_identity<S: IdentityPersistence + ?Sized>(store: &mut S) -> IdentityKeyPair {
    if let Some(existing) = store.load() {
        return existing;
    }
    let generated = generate_identity_keypair();
    store.save(&generated);
    generated
}
