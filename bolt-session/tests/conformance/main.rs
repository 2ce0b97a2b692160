//! Conformance harness — the six concrete session scenarios.
//!
//! Each scenario wires two `Session`s together over an
//! `InMemoryDataChannel::pair()` and drives real frames through the real
//! dispatcher, asserting on the session-visible outcome (state,
//! callbacks) rather than on internal structure.

mod downgrade_attack;
mod duplicate_hello;
mod integrity_mismatch;
mod key_mismatch_tofu;
mod out_of_order_transfer;

mod support;
