//! Receiver-side transfer state (`spec.md` §4.5.6).
//!
//! [`ActiveTransfer`] is the guarded path: keyed by `transferId`, bound to
//! the sender's identity key, deduplicated, and integrity-checked.
//! [`LegacyTransfer`] is the fallback for peers that never advertised an
//! identity: keyed by filename only, no dedup, no integrity enforcement.
//! [`ReceiverRegistry`] holds both tables and is the type `bolt-session`'s
//! dispatcher drives per inbound `file-chunk` message.

use std::collections::{HashMap, HashSet};

use bolt_core::hash::sha256;

use crate::errors::TransferError;
use crate::wire::validate_chunk_fields;

/// Result of feeding one decrypted chunk into an [`ActiveTransfer`] or
/// [`LegacyTransfer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkOutcome {
    /// Stored; transfer is not yet complete.
    Accepted,
    /// Stored; this was the last missing slot — assemble and deliver.
    Completed,
    /// `chunkIndex`/`totalChunks` out of range; dropped (`[REPLAY_OOB]`).
    OutOfBounds,
    /// Already had this slot; dropped (`[REPLAY_DUP]`).
    DuplicateDropped,
    /// Sender identity changed mid-transfer; dropped (`[REPLAY_XFER_MISMATCH]`).
    IdentityMismatchDropped,
}

/// Guarded-path reconstruction state for one `transferId`.
#[derive(Debug)]
pub struct ActiveTransfer {
    pub transfer_id: String,
    pub filename: String,
    pub total_chunks: u32,
    pub file_size: u64,
    pub remote_identity_key: [u8; 32],
    pub expected_hash: Option<[u8; 32]>,
    buffer: Vec<Option<Vec<u8>>>,
    received: HashSet<u32>,
}

impl ActiveTransfer {
    pub fn new(
        transfer_id: String,
        filename: String,
        total_chunks: u32,
        file_size: u64,
        remote_identity_key: [u8; 32],
        expected_hash: Option<[u8; 32]>,
    ) -> Result<Self, TransferError> {
        if total_chunks == 0 {
            return Err(TransferError::Transfer("totalChunks must be positive".into()));
        }
        Ok(Self {
            transfer_id,
            filename,
            total_chunks,
            file_size,
            remote_identity_key,
            expected_hash,
            buffer: vec![None; total_chunks as usize],
            received: HashSet::new(),
        })
    }

    pub fn is_complete(&self) -> bool {
        self.received.len() == self.total_chunks as usize
    }

    /// Feed one decrypted chunk from `sender_identity_key` at `chunk_index`.
    pub fn accept(
        &mut self,
        sender_identity_key: &[u8; 32],
        chunk_index: u32,
        data: Vec<u8>,
    ) -> ChunkOutcome {
        if !validate_chunk_fields(chunk_index, self.total_chunks) {
            tracing::warn!(
                chunk_index,
                total_chunks = self.total_chunks,
                "[REPLAY_OOB] chunk index out of bounds, dropping"
            );
            return ChunkOutcome::OutOfBounds;
        }
        if sender_identity_key != &self.remote_identity_key {
            tracing::warn!(
                transfer_id = %self.transfer_id,
                "[REPLAY_XFER_MISMATCH] sender identity changed mid-transfer, dropping"
            );
            return ChunkOutcome::IdentityMismatchDropped;
        }
        if self.received.contains(&chunk_index) {
            tracing::warn!(
                transfer_id = %self.transfer_id,
                chunk_index,
                "[REPLAY_DUP] duplicate chunk, dropping"
            );
            return ChunkOutcome::DuplicateDropped;
        }

        self.buffer[chunk_index as usize] = Some(data);
        self.received.insert(chunk_index);

        if self.is_complete() {
            ChunkOutcome::Completed
        } else {
            ChunkOutcome::Accepted
        }
    }

    /// Concatenate all slots in order and verify against `expected_hash`
    /// if present. Only valid once [`ActiveTransfer::is_complete`] is true.
    pub fn assemble(&self) -> Result<Vec<u8>, TransferError> {
        let mut blob = Vec::with_capacity(self.file_size as usize);
        for slot in &self.buffer {
            let chunk = slot
                .as_ref()
                .ok_or_else(|| TransferError::Transfer("assemble called before completion".into()))?;
            blob.extend_from_slice(chunk);
        }
        if let Some(expected) = self.expected_hash {
            let actual = sha256(&blob);
            if actual != expected {
                return Err(TransferError::Integrity(
                    "assembled blob hash does not match advertised fileHash".into(),
                ));
            }
        }
        Ok(blob)
    }
}

/// Legacy-path reconstruction state, keyed by filename only. No identity
/// binding, no duplicate detection, no integrity enforcement.
#[derive(Debug)]
pub struct LegacyTransfer {
    pub filename: String,
    pub total_chunks: u32,
    pub file_size: u64,
    buffer: Vec<Option<Vec<u8>>>,
    received_count: usize,
}

impl LegacyTransfer {
    pub fn new(filename: String, total_chunks: u32, file_size: u64) -> Result<Self, TransferError> {
        if total_chunks == 0 {
            return Err(TransferError::Transfer("totalChunks must be positive".into()));
        }
        Ok(Self {
            filename,
            total_chunks,
            file_size,
            buffer: vec![None; total_chunks as usize],
            received_count: 0,
        })
    }

    /// Feed one decrypted chunk. Returns `true` once every slot is filled.
    pub fn accept(&mut self, chunk_index: u32, data: Vec<u8>) -> bool {
        if !validate_chunk_fields(chunk_index, self.total_chunks) {
            tracing::warn!(
                chunk_index,
                total_chunks = self.total_chunks,
                "[REPLAY_OOB] chunk index out of bounds, dropping (legacy path)"
            );
            return false;
        }
        tracing::warn!(
            filename = %self.filename,
            chunk_index,
            "[REPLAY_UNGUARDED] accepting chunk on legacy path with no replay protection"
        );
        let slot = &mut self.buffer[chunk_index as usize];
        if slot.is_none() {
            self.received_count += 1;
        }
        *slot = Some(data);
        self.received_count == self.buffer.len()
    }

    pub fn assemble(&self) -> Result<Vec<u8>, TransferError> {
        let mut blob = Vec::with_capacity(self.file_size as usize);
        for slot in &self.buffer {
            let chunk = slot
                .as_ref()
                .ok_or_else(|| TransferError::Transfer("assemble called before completion".into()))?;
            blob.extend_from_slice(chunk);
        }
        Ok(blob)
    }
}

/// Holds both the guarded (`transferId`-keyed) and legacy
/// (filename-keyed) receive tables for one session.
#[derive(Debug, Default)]
pub struct ReceiverRegistry {
    guarded: HashMap<String, ActiveTransfer>,
    legacy: HashMap<String, LegacyTransfer>,
}

impl ReceiverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn guarded(&mut self, transfer_id: &str) -> Option<&mut ActiveTransfer> {
        self.guarded.get_mut(transfer_id)
    }

    pub fn legacy(&mut self, filename: &str) -> Option<&mut LegacyTransfer> {
        self.legacy.get_mut(filename)
    }

    /// Return the existing guarded transfer for `transfer_id`, or create
    /// one and insert it if this is the first chunk (`spec.md` §4.5.6
    /// step 3, bullet 1).
    pub fn get_or_create_guarded(
        &mut self,
        transfer_id: &str,
        filename: &str,
        total_chunks: u32,
        file_size: u64,
        remote_identity_key: [u8; 32],
        expected_hash: Option<[u8; 32]>,
    ) -> Result<&mut ActiveTransfer, TransferError> {
        if !self.guarded.contains_key(transfer_id) {
            let transfer = ActiveTransfer::new(
                transfer_id.to_string(),
                filename.to_string(),
                total_chunks,
                file_size,
                remote_identity_key,
                expected_hash,
            )?;
            self.guarded.insert(transfer_id.to_string(), transfer);
        }
        Ok(self.guarded.get_mut(transfer_id).expect("just inserted"))
    }

    pub fn get_or_create_legacy(
        &mut self,
        filename: &str,
        total_chunks: u32,
        file_size: u64,
    ) -> Result<&mut LegacyTransfer, TransferError> {
        if !self.legacy.contains_key(filename) {
            let transfer = LegacyTransfer::new(filename.to_string(), total_chunks, file_size)?;
            self.legacy.insert(filename.to_string(), transfer);
        }
        Ok(self.legacy.get_mut(filename).expect("just inserted"))
    }

    pub fn remove_guarded(&mut self, transfer_id: &str) -> Option<ActiveTransfer> {
        self.guarded.remove(transfer_id)
    }

    pub fn remove_legacy(&mut self, filename: &str) -> Option<LegacyTransfer> {
        self.legacy.remove(filename)
    }

    /// Remote cancel removes both tables (`spec.md` §4.5.7): the guarded
    /// entry by id (if any) and the legacy entry by filename.
    pub fn cancel(&mut self, filename: &str, transfer_id: Option<&str>) {
        if let Some(id) = transfer_id {
            self.guarded.remove(id);
        }
        self.legacy.remove(filename);
    }

    /// `disconnect()` clears all transfer maps (`spec.md` §4.5.8).
    pub fn clear(&mut self) {
        self.guarded.clear();
        self.legacy.clear();
    }
}
