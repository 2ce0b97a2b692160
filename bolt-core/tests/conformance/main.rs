//! Conformance harness — core protocol invariant tests.
//!
//! Enforces MUST-level invariants from `spec.md` §4 and §8 against
//! bolt-core's implementation, using inline golden vectors (this crate
//! has no external sibling package to stay in sync with).
//!
//! Invariant coverage:
//! - Envelope roundtrip determinism + MAC enforcement (`spec.md` §4.2, §8)
//! - Nonce uniqueness sanity (`spec.md` §8)
//! - SAS determinism and commutativity (`spec.md` §4.3, §8)
//! - Wire error code registry exactness (`spec.md` §4.1)
//! - Error type → display format stability (`spec.md` §7)

mod error_code_mapping;
mod sas_determinism;
mod wire_error_registry;
