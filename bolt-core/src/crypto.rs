//! Crypto primitives — NaCl box (XSalsa20-Poly1305).
//!
//! Mirrors TS `sealBoxPayload` / `openBoxPayload` exactly.
//! Wire format: `base64(nonce || ciphertext)`.
//!
//! ## Parity
//! - For each golden vector: `open_box_payload(sealed, sender_pk, receiver_sk)`
//!   returns expected plaintext.
//! - For each corrupt vector: `open_box_payload` returns `BoltError::Encryption`.
//! - Round-trip: `open(seal(plaintext)) == plaintext`.

use crypto_box::{aead::Aead, Nonce, SalsaBox, SecretKey};
use rand_core::{OsRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::NONCE_LENGTH;
use crate::encoding::{from_base64, to_base64};
use crate::errors::BoltError;

/// X25519 keypair (ephemeral or identity).
///
/// 32-byte public key (Curve25519 point) and 32-byte secret key.
/// The secret key is zeroized on drop; the public key is not a secret
/// and is left untouched so callers can still read it after a partial move.
#[derive(Clone, ZeroizeOnDrop)]
pub struct KeyPair {
    /// Curve25519 public key (32 bytes).
    #[zeroize(skip)]
    pub public_key: [u8; 32],
    /// Curve25519 secret key (32 bytes).
    pub secret_key: [u8; 32],
}

/// Fill `buf` with CSPRNG bytes.
///
/// Used for transfer IDs, nonces minted outside of `seal_box_payload`, and
/// anywhere else the protocol needs uniformly random bytes without the
/// rejection-sampling bias correction `peer_code` applies.
pub fn fill_random(buf: &mut [u8]) {
    OsRng.fill_bytes(buf);
}

/// Generate a fresh ephemeral X25519 keypair.
///
/// Discard after session ends. Uses OS CSPRNG.
///
/// # Parity
/// TS equivalent: `generateEphemeralKeyPair()` (tweetnacl `box.keyPair()`).
/// Both use X25519 — keypairs are structurally compatible.
pub fn generate_ephemeral_keypair() -> KeyPair {
    let mut secret_bytes = [0u8; 32];
    OsRng.fill_bytes(&mut secret_bytes);
    let sk = SecretKey::from(secret_bytes);
    let pk = sk.public_key();
    KeyPair {
        public_key: *pk.as_bytes(),
        secret_key: secret_bytes,
    }
}

/// Seal plaintext using NaCl box (XSalsa20-Poly1305).
///
/// Wire format: `base64(nonce || ciphertext)`.
/// Random 24-byte nonce generated internally via CSPRNG.
///
/// # Parity
/// TS equivalent: `sealBoxPayload(plaintext, remotePublicKey, senderSecretKey)`.
/// Identical wire format, identical crypto — only the random nonce differs
/// (by design). Parity is verified via golden vector open tests.
///
/// # Errors
/// Returns `BoltError::Encryption` if box sealing fails.
pub fn seal_box_payload(
    plaintext: &[u8],
    remote_public_key: &[u8; 32],
    sender_secret_key: &[u8; 32],
) -> Result<String, BoltError> {
    let pk = crypto_box::PublicKey::from(*remote_public_key);
    let sk = SecretKey::from(*sender_secret_key);
    let salsa_box = SalsaBox::new(&pk, &sk);

    let mut nonce_bytes = [0u8; NONCE_LENGTH];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = salsa_box
        .encrypt(nonce, plaintext)
        .map_err(|_| BoltError::Encryption("Encryption failed".into()))?;

    let mut combined = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
    combined.extend_from_slice(&nonce_bytes);
    combined.extend_from_slice(&ciphertext);

    Ok(to_base64(&combined))
}

/// Open a sealed payload using NaCl box.open.
///
/// Expects wire format: `base64(nonce || ciphertext)`.
/// Splits first 24 bytes as nonce, remainder as ciphertext.
///
/// # Parity
/// TS equivalent: `openBoxPayload(sealed, senderPublicKey, receiverSecretKey)`.
/// Identical format parsing and decryption.
///
/// # Errors
/// Returns `BoltError::Encryption` on decryption failure (tampered,
/// wrong key, truncated, etc.).
pub fn open_box_payload(
    sealed: &str,
    sender_public_key: &[u8; 32],
    receiver_secret_key: &[u8; 32],
) -> Result<Vec<u8>, BoltError> {
    let data = from_base64(sealed)?;
    if data.len() < NONCE_LENGTH {
        return Err(BoltError::Encryption("Sealed payload too short".into()));
    }

    let nonce = Nonce::from_slice(&data[..NONCE_LENGTH]);
    let ciphertext = &data[NONCE_LENGTH..];

    let pk = crypto_box::PublicKey::from(*sender_public_key);
    let sk = SecretKey::from(*receiver_secret_key);
    let salsa_box = SalsaBox::new(&pk, &sk);

    salsa_box
        .decrypt(nonce, ciphertext)
        .map_err(|_| BoltError::Encryption("Decryption failed".into()))
}
