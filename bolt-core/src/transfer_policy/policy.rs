//! Transfer policy implementation — deterministic scheduling decisions.
//!
//! The policy function is pure: identical inputs produce identical outputs.
//! No IO, no clocks, no global state.

use super::types::{Backpressure, PolicyInput, ScheduleDecision};

/// Compute a scheduling decision from the given input.
///
/// # Contract
///
/// - **Deterministic**: identical `input` always produces identical output
///   (including `next_chunk_ids` ordering).
/// - **Bounded**: `next_chunk_ids.len() <= input.constraints.max_parallel_chunks`.
/// - **Bounded**: `window_suggestion_chunks <= input.constraints.max_parallel_chunks`.
/// - **Bounded**: `pacing_delay_ms <= MAX_PACING_DELAY_MS`.
/// - **Backpressure**: if `input.link_stats.in_flight_bytes > input.constraints.max_in_flight_bytes`,
///   backpressure MUST be `Pause` (no new chunks scheduled).
///
/// # Current Implementation
///
/// This is a deterministic stub. It satisfies all contracts but performs
/// no intelligent scheduling. A real implementation will replace this
/// in a future S2 sub-phase.
pub fn decide(input: &PolicyInput) -> ScheduleDecision {
    // Contract: if over budget, pause and schedule nothing.
    if input.link_stats.in_flight_bytes > input.constraints.max_in_flight_bytes {
        return ScheduleDecision {
            next_chunk_ids: Vec::new(),
            pacing_delay_ms: 0,
            window_suggestion_chunks: 0,
            backpressure: Backpressure::Pause,
        };
    }

    // Stub: schedule up to max_parallel_chunks from the pending list.
    let limit = input.constraints.max_parallel_chunks as usize;
    let next_chunk_ids: Vec<u32> = input
        .pending_chunk_ids
        .iter()
        .take(limit)
        .copied()
        .collect();

    let window = next_chunk_ids.len() as u16;

    ScheduleDecision {
        next_chunk_ids,
        pacing_delay_ms: 0,
        window_suggestion_chunks: window,
        backpressure: Backpressure::NoChange,
    }
}
