//! Conformance harness — transfer-layer invariants from `spec.md` §8.
