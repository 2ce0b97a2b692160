//! Feature-gated transfer metrics ring buffer.
//!
//! Purely observational: nothing in the sender/receiver state machines
//! branches on a [`TransferMetrics`] value. Shape and stall threshold are
//! fixed here since the protocol leaves them unspecified beyond "must not
//! alter wire behavior."

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// A chunk ever takes longer than this since the previous sample counts
/// as a stall.
pub const STALL_THRESHOLD: Duration = Duration::from_millis(500);

/// Default ring-buffer capacity (samples retained per transfer).
pub const DEFAULT_CAPACITY: usize = 32;

/// One recorded data point for an in-flight transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferSample {
    pub at_chunk: u32,
    pub bytes: u32,
    pub stalled: bool,
}

/// Fixed-capacity ring buffer of [`TransferSample`]s for one transfer.
#[derive(Debug)]
pub struct TransferMetrics {
    capacity: usize,
    samples: VecDeque<TransferSample>,
    last_sample_at: Option<Instant>,
}

impl TransferMetrics {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            samples: VecDeque::with_capacity(capacity),
            last_sample_at: None,
        }
    }

    /// Record that `bytes` were transferred at `at_chunk`, stamping
    /// stall status against the elapsed time since the previous sample.
    pub fn record(&mut self, at_chunk: u32, bytes: u32) {
        let now = Instant::now();
        let stalled = self
            .last_sample_at
            .is_some_and(|prev| now.duration_since(prev) > STALL_THRESHOLD);
        self.last_sample_at = Some(now);

        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(TransferSample { at_chunk, bytes, stalled });
    }

    pub fn samples(&self) -> impl Iterator<Item = &TransferSample> {
        self.samples.iter()
    }

    pub fn any_stalled(&self) -> bool {
        self.samples.iter().any(|s| s.stalled)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl Default for TransferMetrics {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
