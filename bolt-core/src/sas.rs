//! SAS — Short Authentication String computation.
//!
//! CANONICAL: `compute_sas()` is the ONLY SAS implementation in the
//! Bolt ecosystem. No SAS logic may exist in transport or product
//! packages. See `scripts/verify-no-shadow-sas.sh`.
//!
//! ## Algorithm
//! ```text
//! SAS_input = SHA-256(sort32(identityA, identityB) || sort32(ephemeralA, ephemeralB))
//! Display   = first 6 hex chars, uppercase
//! ```
//!
//! ## Parity
//! - Each SAS golden vector produces expected 6-char string.
//! - Commutative: `compute_sas(A, B, ...) == compute_sas(B, A, ...)`.
//! - Wrong key lengths rejected (enforced by type system: `&[u8; 32]`).
//!
//! ## Design note
//! TS `computeSas` is async (Web Crypto digest is async). Rust SHA-256
//! via `sha2` is synchronous. The Rust function is sync.

use crate::constants::{PUBLIC_KEY_LENGTH, SAS_LENGTH};
use crate::encoding;
use crate::hash;

/// Lexicographically sort two 32-byte values and concatenate them.
///
/// Matches TS `sort32()` exactly: byte-by-byte comparison, smaller first.
/// If identical, concatenate as-is (a || b).
fn sort32(a: &[u8; 32], b: &[u8; 32]) -> [u8; 64] {
    let mut result = [0u8; 64];
    for i in 0..32 {
        if a[i] != b[i] {
            let (first, second) = if a[i] < b[i] { (a, b) } else { (b, a) };
            result[..32].copy_from_slice(first);
            result[32..].copy_from_slice(second);
            return result;
        }
    }
    // Keys are identical — concatenate as-is
    result[..32].copy_from_slice(a);
    result[32..].copy_from_slice(b);
    result
}

/// Compute a 6-character SAS (Short Authentication String).
///
/// Both peers compute the same SAS from their exchanged public keys.
/// The SAS is displayed to users for out-of-band verification.
///
/// # Arguments
/// - `identity_a`, `identity_b` — 32-byte identity public keys
/// - `ephemeral_a`, `ephemeral_b` — 32-byte ephemeral public keys
///
/// # Returns
/// 6-character uppercase hex string (24 bits of entropy).
///
/// # Parity
/// TS equivalent: `computeSas(identityA, identityB, ephemeralA, ephemeralB)`.
/// Identical algorithm: `SHA-256(sort32(id_a, id_b) || sort32(eph_a, eph_b))`,
/// take first 6 hex chars, uppercase.
pub fn compute_sas(
    identity_a: &[u8; PUBLIC_KEY_LENGTH],
    identity_b: &[u8; PUBLIC_KEY_LENGTH],
    ephemeral_a: &[u8; PUBLIC_KEY_LENGTH],
    ephemeral_b: &[u8; PUBLIC_KEY_LENGTH],
) -> String {
    let sorted_identity = sort32(identity_a, identity_b);
    let sorted_ephemeral = sort32(ephemeral_a, ephemeral_b);

    let mut combined = [0u8; 128];
    combined[..64].copy_from_slice(&sorted_identity);
    combined[64..].copy_from_slice(&sorted_ephemeral);

    let hash = hash::sha256(&combined);
    let hex = encoding::to_hex(&hash);
    hex[..SAS_LENGTH].to_uppercase()
}
