//! Inbound message dispatch (`spec.md` §4.5.1).
//!
//! Every frame that arrives on the data channel passes through
//! [`dispatch`] exactly once. It is the single place that decides: is
//! this HELLO, an enveloped message, a bare file-chunk, or a wire error —
//! and, for each, whether the session's current state and negotiated
//! capabilities allow it. Anything that doesn't fit becomes a
//! [`crate::engine::Session::terminal_error`] call with the wire code the
//! table assigns to that failure.

use bolt_core::crypto::open_box_payload;
use bolt_transfer_core::errors::TransferError;
use bolt_transfer_core::receiver::ChunkOutcome;
use bolt_transfer_core::wire::{CancelledBy, FileChunkControl, FileChunkControlFrame, FileChunkDataFrame, FileChunkFrame};

use crate::callbacks::{EngineCallbacks, TransferProgress, TransferStatus};
use crate::envelope::{ProfileEnvelopeV1, UnwrapFailure};
use crate::engine::Session;
use crate::errors::SessionError;
use crate::transport::DataChannel;

pub(crate) async fn dispatch<C: DataChannel, CB: EngineCallbacks>(session: &mut Session<C, CB>, raw: &str) {
    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(_) => {
            session.terminal_error("PROTOCOL_VIOLATION", "payload was not valid JSON").await;
            return;
        }
    };

    match value.get("type").and_then(|v| v.as_str()) {
        Some("hello") => handle_hello(session, &value).await,
        Some("profile-envelope") => handle_envelope(session, &value).await,
        Some("file-chunk") | Some("error") => handle_inner(session, &value, false).await,
        Some(_) => session.terminal_error("UNKNOWN_MESSAGE_TYPE", "unrecognized message type").await,
        None => session.terminal_error("INVALID_MESSAGE", "message has no type field").await,
    }
}

async fn handle_hello<C: DataChannel, CB: EngineCallbacks>(session: &mut Session<C, CB>, value: &serde_json::Value) {
    if !session.state().is_pre_hello() {
        session
            .terminal_error("DUPLICATE_HELLO", "HELLO received outside the PreHello state")
            .await;
        return;
    }
    session.process_hello(value).await;
}

async fn handle_envelope<C: DataChannel, CB: EngineCallbacks>(session: &mut Session<C, CB>, value: &serde_json::Value) {
    if session.state().is_pre_hello() {
        session
            .terminal_error("INVALID_STATE", "profile envelope received before HELLO completed")
            .await;
        return;
    }
    if !session.envelope_negotiated_pub() {
        session
            .terminal_error("ENVELOPE_UNNEGOTIATED", "profile envelope received without a negotiated capability")
            .await;
        return;
    }

    let envelope: ProfileEnvelopeV1 = match serde_json::from_value(value.clone()) {
        Ok(e) => e,
        Err(_) => {
            session.terminal_error("ENVELOPE_INVALID", "profile envelope did not match the expected schema").await;
            return;
        }
    };

    let inner_json = match session.unwrap_envelope(&envelope) {
        Ok(json) => json,
        Err(UnwrapFailure::Invalid) => {
            session.terminal_error("ENVELOPE_INVALID", "profile envelope version or encoding is unsupported").await;
            return;
        }
        Err(UnwrapFailure::DecryptFailed) => {
            session.terminal_error("ENVELOPE_DECRYPT_FAIL", "profile envelope failed to decrypt").await;
            return;
        }
    };

    let inner_value: serde_json::Value = match serde_json::from_str(&inner_json) {
        Ok(v) => v,
        Err(_) => {
            session.terminal_error("INVALID_MESSAGE", "enveloped payload was not valid JSON").await;
            return;
        }
    };
    handle_inner(session, &inner_value, true).await;
}

/// Dispatch a `file-chunk`/`error` message that has already been
/// unwrapped (or arrived bare, if envelope negotiation didn't require
/// wrapping). `enveloped` records which, so the downgrade defence can
/// reject a bare `file-chunk` once both sides have negotiated envelopes.
async fn handle_inner<C: DataChannel, CB: EngineCallbacks>(session: &mut Session<C, CB>, value: &serde_json::Value, enveloped: bool) {
    match value.get("type").and_then(|v| v.as_str()) {
        Some("file-chunk") => {
            if session.state().is_pre_hello() {
                session.terminal_error("INVALID_STATE", "file-chunk received before HELLO completed").await;
                return;
            }
            if session.envelope_negotiated_pub() && !enveloped {
                session
                    .terminal_error("ENVELOPE_REQUIRED", "file-chunk received unwrapped after envelope negotiation")
                    .await;
                return;
            }
            handle_file_chunk(session, value).await;
        }
        Some("error") => {
            if session.state().is_pre_hello() {
                session.terminal_error("INVALID_STATE", "error frame received before HELLO completed").await;
                return;
            }
            if session.envelope_negotiated_pub() && !enveloped {
                session
                    .terminal_error("ENVELOPE_REQUIRED", "error frame received unwrapped after envelope negotiation")
                    .await;
                return;
            }
            let code = value.get("code").and_then(|v| v.as_str()).unwrap_or("");
            let message = value.get("message").and_then(|v| v.as_str()).unwrap_or("");
            if !bolt_core::errors::is_valid_wire_error_code(code) {
                session
                    .terminal_error("PROTOCOL_VIOLATION", "error frame carried an unrecognized wire error code")
                    .await;
                return;
            }
            session.surface_remote_error(code, message).await;
        }
        Some(_) => session.terminal_error("UNKNOWN_MESSAGE_TYPE", "unrecognized message type").await,
        None => session.terminal_error("INVALID_MESSAGE", "message has no type field").await,
    }
}

async fn handle_file_chunk<C: DataChannel, CB: EngineCallbacks>(session: &mut Session<C, CB>, value: &serde_json::Value) {
    let frame: FileChunkFrame = match serde_json::from_value(value.clone()) {
        Ok(f) => f,
        Err(_) => {
            session.terminal_error("INVALID_MESSAGE", "file-chunk did not match the expected schema").await;
            return;
        }
    };
    if frame.filename().is_empty() {
        session.terminal_error("INVALID_MESSAGE", "file-chunk missing filename").await;
        return;
    }

    match frame {
        FileChunkFrame::Data(data) => handle_data_chunk(session, data).await,
        FileChunkFrame::Control(control) => handle_control_frame(session, control).await,
    }
}

async fn handle_data_chunk<C: DataChannel, CB: EngineCallbacks>(session: &mut Session<C, CB>, frame: FileChunkDataFrame) {
    let Some(remote_eph_pub) = session.remote_ephemeral_pub else {
        session.terminal_error("INVALID_STATE", "file-chunk received before a remote key was known").await;
        return;
    };

    let plaintext = match open_box_payload(&frame.chunk, &remote_eph_pub, &session.local_ephemeral.secret_key) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(filename = %frame.filename, "chunk decryption failed, dropping chunk");
            session.callbacks_mut().on_error(&SessionError::Bolt(err));
            session.callbacks_mut().on_progress(TransferProgress {
                filename: frame.filename.clone(),
                status: TransferStatus::Error,
                current_chunk: Some(frame.chunk_index),
                total_chunks: Some(frame.total_chunks),
            });
            return;
        }
    };

    let guarded = frame.transfer_id.is_some() && session.remote_identity_pub.is_some();
    if guarded {
        handle_guarded_chunk(session, frame, plaintext).await;
    } else {
        handle_legacy_chunk(session, frame, plaintext).await;
    }
}

async fn handle_guarded_chunk<C: DataChannel, CB: EngineCallbacks>(
    session: &mut Session<C, CB>,
    frame: FileChunkDataFrame,
    plaintext: Vec<u8>,
) {
    let transfer_id = frame.transfer_id.clone().expect("guarded dispatch requires transfer_id");
    let remote_identity = session.remote_identity_or_zero();
    let expected_hash = if frame.chunk_index == 0 && session.file_hash_negotiated() {
        frame.file_hash.as_deref().and_then(Session::<C, CB>::decode_file_hash)
    } else {
        None
    };

    let chunk_bytes = plaintext.len() as u32;
    let outcome = {
        let transfer = match session.receiver_registry.get_or_create_guarded(
            &transfer_id,
            &frame.filename,
            frame.total_chunks,
            frame.file_size,
            remote_identity,
            expected_hash,
        ) {
            Ok(t) => t,
            Err(_) => {
                tracing::warn!(filename = %frame.filename, "[REPLAY_OOB] refusing to open transfer with invalid totalChunks");
                return;
            }
        };
        transfer.accept(&remote_identity, frame.chunk_index, plaintext)
    };
    session.record_metric(&transfer_id, frame.chunk_index, chunk_bytes);

    match outcome {
        ChunkOutcome::Accepted => {
            session.callbacks_mut().on_progress(TransferProgress {
                filename: frame.filename,
                status: TransferStatus::Transferring,
                current_chunk: Some(frame.chunk_index + 1),
                total_chunks: Some(frame.total_chunks),
            });
        }
        ChunkOutcome::Completed => {
            let transfer = session.receiver_registry.remove_guarded(&transfer_id).expect("just completed");
            match transfer.assemble() {
                Ok(blob) => {
                    session.callbacks_mut().on_receive_file(blob, &frame.filename);
                    session.callbacks_mut().on_progress(TransferProgress {
                        filename: frame.filename,
                        status: TransferStatus::Completed,
                        current_chunk: Some(frame.total_chunks),
                        total_chunks: Some(frame.total_chunks),
                    });
                }
                Err(TransferError::Integrity(_)) => {
                    session.terminal_error("INTEGRITY_FAILED", "assembled transfer failed its advertised file hash").await;
                }
                Err(_) => {
                    session.terminal_error("TRANSFER_FAILED", "failed to assemble completed transfer").await;
                }
            }
        }
        ChunkOutcome::OutOfBounds | ChunkOutcome::DuplicateDropped | ChunkOutcome::IdentityMismatchDropped => {}
    }
}

async fn handle_legacy_chunk<C: DataChannel, CB: EngineCallbacks>(
    session: &mut Session<C, CB>,
    frame: FileChunkDataFrame,
    plaintext: Vec<u8>,
) {
    let chunk_bytes = plaintext.len() as u32;
    let completed = {
        let transfer = match session.receiver_registry.get_or_create_legacy(&frame.filename, frame.total_chunks, frame.file_size) {
            Ok(t) => t,
            Err(_) => {
                tracing::warn!(filename = %frame.filename, "[REPLAY_OOB] refusing to open legacy transfer with invalid totalChunks");
                return;
            }
        };
        transfer.accept(frame.chunk_index, plaintext)
    };
    session.record_metric(&frame.filename, frame.chunk_index, chunk_bytes);

    if completed {
        let transfer = session.receiver_registry.remove_legacy(&frame.filename).expect("just completed");
        match transfer.assemble() {
            Ok(blob) => {
                session.callbacks_mut().on_receive_file(blob, &frame.filename);
                session.callbacks_mut().on_progress(TransferProgress {
                    filename: frame.filename,
                    status: TransferStatus::Completed,
                    current_chunk: Some(frame.total_chunks),
                    total_chunks: Some(frame.total_chunks),
                });
            }
            Err(_) => {
                session.terminal_error("TRANSFER_FAILED", "failed to assemble completed legacy transfer").await;
            }
        }
    } else {
        session.callbacks_mut().on_progress(TransferProgress {
            filename: frame.filename,
            status: TransferStatus::Transferring,
            current_chunk: Some(frame.chunk_index + 1),
            total_chunks: Some(frame.total_chunks),
        });
    }
}

async fn handle_control_frame<C: DataChannel, CB: EngineCallbacks>(session: &mut Session<C, CB>, frame: FileChunkControlFrame) {
    match frame.action {
        FileChunkControl::Paused { .. } | FileChunkControl::Resumed { .. } => {
            tracing::debug!(filename = %frame.filename, "pause/resume control frame received, no wire-visible reaction defined");
        }
        FileChunkControl::Cancelled { cancelled_by, .. } => {
            session.receiver_registry.cancel(&frame.filename, frame.transfer_id.as_deref());
            if let Some(handle) = session.sender_registry.remove(&frame.filename) {
                handle.control.cancel();
            }
            let status = match cancelled_by {
                CancelledBy::Sender => TransferStatus::CanceledBySender,
                CancelledBy::Receiver => TransferStatus::CanceledByReceiver,
            };
            session.callbacks_mut().on_progress(TransferProgress {
                filename: frame.filename,
                status,
                current_chunk: None,
                total_chunks: None,
            });
        }
    }
}
