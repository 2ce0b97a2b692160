//! Conformance: SAS determinism, commutativity, and output format.
//!
//! Invariants under test (`spec.md` §4.3, §8):
//! - SAS is computed over raw 32-byte keys.
//! - `compute_sas(a, b, c, d) == compute_sas(b, a, d, c)` (role symmetry).
//! - Identical inputs always produce identical output (no hidden entropy).
//! - Output is exactly 6 uppercase hex characters.
//! - Flipping any single byte of any input changes the output.

use bolt_core::sas::compute_sas;

fn keys(seed: u8) -> [u8; 32] {
    core::array::from_fn(|i| seed.wrapping_add(i as u8))
}

#[test]
fn conformance_sas_commutative() {
    let a = keys(1);
    let b = keys(2);
    let c = keys(3);
    let d = keys(4);
    assert_eq!(compute_sas(&a, &b, &c, &d), compute_sas(&b, &a, &d, &c));
}

#[test]
fn conformance_sas_deterministic_100_rounds() {
    let a = keys(10);
    let b = keys(20);
    let c = keys(30);
    let d = keys(40);
    let reference = compute_sas(&a, &b, &c, &d);
    for round in 1..=100 {
        assert_eq!(compute_sas(&a, &b, &c, &d), reference, "drift at round {round}");
    }
}

#[test]
fn conformance_sas_output_format() {
    let sas = compute_sas(&keys(5), &keys(6), &keys(7), &keys(8));
    assert_eq!(sas.len(), 6);
    assert!(sas.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(sas, sas.to_uppercase());
}

#[test]
fn conformance_sas_sensitive_to_every_input() {
    let a = keys(1);
    let b = keys(2);
    let c = keys(3);
    let d = keys(4);
    let baseline = compute_sas(&a, &b, &c, &d);

    let mut a2 = a;
    a2[0] ^= 0x01;
    assert_ne!(compute_sas(&a2, &b, &c, &d), baseline, "insensitive to identity_a");

    let mut b2 = b;
    b2[31] ^= 0x01;
    assert_ne!(compute_sas(&a, &b2, &c, &d), baseline, "insensitive to identity_b");

    let mut c2 = c;
    c2[15] ^= 0x01;
    assert_ne!(compute_sas(&a, &b, &c2, &d), baseline, "insensitive to ephemeral_a");

    let mut d2 = d;
    d2[0] ^= 0x01;
    assert_ne!(compute_sas(&a, &b, &c, &d2), baseline, "insensitive to ephemeral_b");
}

#[test]
fn conformance_sas_distinct_key_sets_produce_distinct_outputs() {
    use std::collections::HashSet;
    let mut set = HashSet::new();
    for seed in 0u8..20 {
        set.insert(compute_sas(&keys(seed), &keys(seed + 1), &keys(seed + 2), &keys(seed + 3)));
    }
    assert_eq!(set.len(), 20, "SAS collision across distinct key sets");
}
