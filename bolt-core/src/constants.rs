//! Protocol constants — canonical values shared with TypeScript SDK.
//!
//! Every constant here MUST exactly match the value in
//! `ts/bolt-core/src/constants.ts`. Drift is detected by
//! `scripts/verify-constants.sh` in CI.

/// NaCl box nonce length in bytes.
pub const NONCE_LENGTH: usize = 24;

/// NaCl public key length in bytes (Curve25519).
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// NaCl secret key length in bytes (Curve25519).
pub const SECRET_KEY_LENGTH: usize = 32;

/// Default chunk size for file transfer (bytes).
pub const DEFAULT_CHUNK_SIZE: usize = 16_384;

/// Peer code length (characters).
pub const PEER_CODE_LENGTH: usize = 6;

/// Peer code alphabet (31 chars, unambiguous base32 subset: no 0/O, 1/I/L).
pub const PEER_CODE_ALPHABET: &str = "ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// SAS (Short Authentication String) length in hex characters.
pub const SAS_LENGTH: usize = 6;

/// NaCl box overhead (Poly1305 MAC).
pub const BOX_OVERHEAD: usize = 16;

/// Transfer ID length in bytes (§14).
pub const TRANSFER_ID_LENGTH: usize = 16;

/// SAS entropy in bits (§14).
pub const SAS_ENTROPY: usize = 24;

/// File hash algorithm identifier (§14).
pub const FILE_HASH_ALGORITHM: &str = "SHA-256";

/// File hash length in bytes (§14).
pub const FILE_HASH_LENGTH: usize = 32;

/// Bolt Protocol version (§14).
pub const BOLT_VERSION: usize = 1;

/// Capability namespace prefix (§14). All capability strings start with this.
pub const CAPABILITY_NAMESPACE: &str = "bolt.";
