//! Sender-side transfer bookkeeping (`spec.md` §4.5.5).
//!
//! This module owns the chunk-index arithmetic, the `transferId` registry
//! keyed by filename, and the cooperative pause/cancel flags a running
//! send loop polls. It does not perform encryption or know about the data
//! channel — those live in `bolt-session`, which drives a send loop using
//! [`ChunkPlan`] and [`TransferControl`] from this module.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bolt_core::constants::TRANSFER_ID_LENGTH;
use bolt_core::crypto::fill_random;
use bolt_core::encoding::to_hex;

use crate::errors::TransferError;

/// Generate a fresh transfer id: `TRANSFER_ID_LENGTH` random bytes,
/// hex-encoded (32 characters).
pub fn generate_transfer_id() -> String {
    let mut bytes = [0u8; TRANSFER_ID_LENGTH];
    fill_random(&mut bytes);
    to_hex(&bytes)
}

/// Chunk-index arithmetic for a single file send, independent of any
/// particular chunk's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    pub file_size: u64,
    pub chunk_size: u32,
    pub total_chunks: u32,
}

impl ChunkPlan {
    /// Build a plan for `file_size` bytes split into `chunk_size`-byte
    /// chunks (the final chunk may be shorter). `total_chunks = ceil(size
    /// / chunk_size)`, with a minimum of 1 so empty files still send one
    /// (empty) chunk.
    pub fn new(file_size: u64, chunk_size: u32) -> Result<Self, TransferError> {
        if chunk_size == 0 {
            return Err(TransferError::Transfer("chunk size must be positive".into()));
        }
        let total_chunks = if file_size == 0 {
            1
        } else {
            file_size.div_ceil(chunk_size as u64) as u32
        };
        Ok(Self { file_size, chunk_size, total_chunks })
    }

    /// Byte range `[start, end)` for chunk `index`, clamped to `file_size`.
    pub fn bounds(&self, index: u32) -> Option<(u64, u64)> {
        if index >= self.total_chunks {
            return None;
        }
        let start = index as u64 * self.chunk_size as u64;
        let end = (start + self.chunk_size as u64).min(self.file_size);
        Some((start, end))
    }
}

/// Cooperative pause/cancel signal shared between the send loop and
/// whatever receives pause/resume/cancel control frames for this transfer.
#[derive(Debug, Clone)]
pub struct TransferControl {
    inner: Arc<ControlFlags>,
}

#[derive(Debug, Default)]
struct ControlFlags {
    paused: AtomicBool,
    cancelled: AtomicBool,
}

impl Default for TransferControl {
    fn default() -> Self {
        Self::new()
    }
}

impl TransferControl {
    pub fn new() -> Self {
        Self { inner: Arc::new(ControlFlags::default()) }
    }

    pub fn pause(&self) {
        self.inner.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.inner.paused.store(false, Ordering::SeqCst);
    }

    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.inner.paused.load(Ordering::SeqCst)
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }
}

/// One entry in the `sendTransferIds` registry: the id assigned to an
/// in-flight outbound transfer plus its cooperative control handle.
#[derive(Debug, Clone)]
pub struct SenderTransferHandle {
    pub transfer_id: String,
    pub control: TransferControl,
}

/// `sendTransferIds[filename] = transferId` (`spec.md` §4.5.5 step 2),
/// plus the control handles a remote-cancel or local pause/resume call
/// needs to reach the in-flight send loop.
#[derive(Debug, Default)]
pub struct SenderRegistry {
    transfers: HashMap<String, SenderTransferHandle>,
}

impl SenderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new outbound transfer for `filename`, replacing any
    /// prior entry (a new `sendFile` call for the same name supersedes it).
    pub fn begin(&mut self, filename: &str) -> SenderTransferHandle {
        let handle = SenderTransferHandle {
            transfer_id: generate_transfer_id(),
            control: TransferControl::new(),
        };
        self.transfers.insert(filename.to_string(), handle.clone());
        handle
    }

    pub fn control_for(&self, filename: &str) -> Option<TransferControl> {
        self.transfers.get(filename).map(|h| h.control.clone())
    }

    pub fn transfer_id_for(&self, filename: &str) -> Option<&str> {
        self.transfers.get(filename).map(|h| h.transfer_id.as_str())
    }

    pub fn remove(&mut self, filename: &str) -> Option<SenderTransferHandle> {
        self.transfers.remove(filename)
    }

    pub fn clear(&mut self) {
        self.transfers.clear();
    }
}
