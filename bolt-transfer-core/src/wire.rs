//! Wire shapes for the `file-chunk` inner message family (`spec.md` §6.1).
//!
//! A `file-chunk` frame is either a data chunk or a pause/resume/cancel
//! control frame for an in-flight transfer — never both. Rust's `enum` +
//! `#[serde(untagged)]` expresses that disjunction directly instead of the
//! scattered optional booleans the wire format's prose suggests.

use serde::{Deserialize, Serialize};

/// The `type` discriminant carried by both data and control frames.
pub const FILE_CHUNK_TYPE: &str = "file-chunk";

/// A decoded `file-chunk` inner message, before the caller has decided
/// whether it is routed through the guarded or legacy receive path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileChunkFrame {
    Control(FileChunkControlFrame),
    Data(FileChunkDataFrame),
}

impl FileChunkFrame {
    pub fn filename(&self) -> &str {
        match self {
            FileChunkFrame::Control(c) => &c.filename,
            FileChunkFrame::Data(d) => &d.filename,
        }
    }
}

/// A single encrypted chunk of file data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChunkDataFrame {
    pub filename: String,
    /// `sealBoxPayload` output — opaque to this crate, decrypted upstream.
    pub chunk: String,
    pub chunk_index: u32,
    pub total_chunks: u32,
    pub file_size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_id: Option<String>,
    /// 64-hex-char SHA-256, present only on `chunk_index == 0`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_hash: Option<String>,
}

/// A pause/resume/cancel control frame for `filename` (and, when the
/// transfer is guarded, `transfer_id`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChunkControlFrame {
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_id: Option<String>,
    #[serde(flatten)]
    pub action: FileChunkControl,
}

/// Exactly one of paused / resumed / cancelled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum FileChunkControl {
    Paused { paused: bool },
    Resumed { resumed: bool },
    Cancelled { cancelled: bool, cancelled_by: CancelledBy },
}

/// Which side initiated a cancellation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CancelledBy {
    Sender,
    Receiver,
}

/// Validate `chunk_index`/`total_chunks` per `spec.md` §4.5.6 step 1:
/// both must be in range with `0 <= chunk_index < total_chunks`.
pub fn validate_chunk_fields(chunk_index: u32, total_chunks: u32) -> bool {
    total_chunks > 0 && chunk_index < total_chunks
}
