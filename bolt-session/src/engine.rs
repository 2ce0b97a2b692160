//! The session engine: lifecycle, HELLO handshake, and transfer dispatch
//! (`spec.md` §4.5).
//!
//! A `Session` is driven by exactly one logical task, per the
//! single-threaded cooperative scheduling model in `spec.md` §5 — there
//! is no internal locking. An embedder that wants to drive it from a
//! `tokio::spawn`ed task can, since `Session<C, CB>` is `Send` whenever
//! `C` and `CB` are; the actor-loop convention is: one task owns
//! `&mut Session` exclusively and feeds it inbound frames and timer ticks
//! by calling [`Session::handle_inbound`] and [`Session::hello_timed_out`]
//! from its own `select!`.

use std::collections::HashMap;
use std::sync::Arc;

use bolt_core::crypto::{generate_ephemeral_keypair, open_box_payload, seal_box_payload, KeyPair};
use bolt_core::encoding::from_hex;
use bolt_core::errors::is_valid_wire_error_code;
use bolt_core::identity::{IdentityKeyPair, KeyMismatchError};
use bolt_core::pin::{verify_pinned_identity, PinOutcome, PinPersistence};
use bolt_transfer_core::receiver::{ChunkOutcome, ReceiverRegistry};
use bolt_transfer_core::sender::{ChunkPlan, SenderRegistry, TransferControl};
use bolt_transfer_core::wire::{CancelledBy, FileChunkControl, FileChunkControlFrame, FileChunkDataFrame};
use tokio::sync::Notify;

use crate::callbacks::{EngineCallbacks, TransferProgress, TransferStatus, VerificationState};
use crate::capabilities::{self, CAP_FILE_HASH, CAP_PROFILE_ENVELOPE_V1};
use crate::config::EngineConfig;
use crate::dispatch;
use crate::envelope::{self, ProfileEnvelopeV1};
use crate::errors::SessionError;
use crate::hello::{self, HelloFailure};
use crate::state::{Generation, SessionState};
use crate::transport::DataChannel;

#[cfg(feature = "metrics")]
use bolt_transfer_core::metrics::TransferMetrics;

/// A single Bolt session. Generic over the data channel and the
/// embedder's callback sink so tests can substitute in-memory doubles.
pub struct Session<C: DataChannel, CB: EngineCallbacks> {
    pub(crate) config: EngineConfig,
    pub(crate) state: SessionState,
    pub(crate) generation: Generation,

    pub(crate) local_ephemeral: KeyPair,
    pub(crate) local_identity: Option<IdentityKeyPair>,
    pub(crate) remote_ephemeral_pub: Option<[u8; 32]>,
    pub(crate) remote_identity_pub: Option<[u8; 32]>,
    /// The human-shareable code (`spec.md` §4.3) used to reach this peer
    /// over signaling, established before the data channel opens. This is
    /// the key the pin store is keyed by — independent of whatever
    /// identity key shows up in HELLO, which is exactly what lets a TOFU
    /// mismatch be detected at all.
    pub(crate) remote_peer_code: String,

    pub(crate) negotiated_capabilities: Vec<String>,
    pub(crate) hello_processing: bool,
    pub(crate) hello_complete: bool,
    hello_notify: Arc<Notify>,
    /// Fired by `disconnect()` to cancel any in-flight back-pressure drain
    /// wait in `send_file` (`spec.md` §4.5.5 drain step, §207 teardown).
    backpressure_cancel: Arc<Notify>,
    verification_emitted: bool,

    pub(crate) pin_store: Option<Box<dyn PinPersistence + Send>>,
    pub(crate) sender_registry: SenderRegistry,
    pub(crate) receiver_registry: ReceiverRegistry,
    #[cfg(feature = "metrics")]
    pub(crate) metrics: HashMap<String, TransferMetrics>,
    #[cfg(not(feature = "metrics"))]
    #[allow(dead_code)]
    pub(crate) metrics: (),

    pub(crate) transport: C,
    pub(crate) callbacks: CB,
}

/// The two ways `process_hello_inner` can fail, kept distinct because
/// they carry different wire codes and different embedder-visible error
/// payloads: a `HelloFailure` maps through its own `wire_code`/`message`,
/// while a TOFU mismatch is always `KEY_MISMATCH` with a typed payload.
enum HelloOutcomeError {
    Hello(HelloFailure),
    KeyMismatch(KeyMismatchError),
}

impl<C: DataChannel, CB: EngineCallbacks> Session<C, CB> {
    pub fn new(
        config: EngineConfig,
        local_identity: Option<IdentityKeyPair>,
        pin_store: Option<Box<dyn PinPersistence + Send>>,
        remote_peer_code: impl Into<String>,
        transport: C,
        callbacks: CB,
    ) -> Self {
        Self {
            config,
            state: SessionState::PreHello,
            generation: Generation::new(),
            local_ephemeral: generate_ephemeral_keypair(),
            local_identity,
            remote_ephemeral_pub: None,
            remote_identity_pub: None,
            remote_peer_code: remote_peer_code.into(),
            negotiated_capabilities: Vec::new(),
            hello_processing: false,
            hello_complete: false,
            hello_notify: Arc::new(Notify::new()),
            backpressure_cancel: Arc::new(Notify::new()),
            verification_emitted: false,
            pin_store,
            sender_registry: SenderRegistry::new(),
            receiver_registry: ReceiverRegistry::new(),
            #[cfg(feature = "metrics")]
            metrics: HashMap::new(),
            #[cfg(not(feature = "metrics"))]
            metrics: (),
            transport,
            callbacks,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn local_ephemeral_public(&self) -> [u8; 32] {
        self.local_ephemeral.public_key
    }

    pub fn negotiated_capabilities(&self) -> &[String] {
        &self.negotiated_capabilities
    }

    fn capability_negotiated(&self, cap: &str) -> bool {
        self.negotiated_capabilities.iter().any(|c| c == cap)
    }

    fn envelope_negotiated(&self) -> bool {
        self.capability_negotiated(CAP_PROFILE_ENVELOPE_V1)
    }

    /// Record the remote ephemeral key (learned from signaling/offer
    /// exchange, out of this crate's scope) and send our HELLO, or fall
    /// back to a legacy session if no identity is configured
    /// (`spec.md` §4.5.2). Returns the generation to arm the 5s HELLO
    /// timeout against, or `None` for a legacy session (no timeout).
    pub async fn begin_handshake(&mut self, remote_ephemeral_pub: [u8; 32]) -> Result<Option<u64>, SessionError> {
        self.remote_ephemeral_pub = Some(remote_ephemeral_pub);

        let Some(identity) = &self.local_identity else {
            self.state = SessionState::PostHello;
            self.hello_complete = true;
            self.hello_notify.notify_waiters();
            self.emit_verification_state(VerificationState::Legacy);
            return Ok(None);
        };

        let inner = hello::build_inner(&identity.public_key, capabilities::local_capabilities());
        let inner_json = serde_json::to_string(&inner).expect("HelloInner always serializes");
        let payload = seal_box_payload(inner_json.as_bytes(), &remote_ephemeral_pub, &self.local_ephemeral.secret_key)?;
        let outer = hello::HelloOuter { msg_type: hello::HELLO_TYPE.to_string(), payload };
        let frame = serde_json::to_string(&outer).expect("HelloOuter always serializes");
        self.transport.send(frame).await?;

        Ok(Some(self.generation.current()))
    }

    /// Call when `config.hello_timeout` elapses after [`Self::begin_handshake`]
    /// armed it with `armed_generation`. A no-op if the generation has
    /// since advanced or HELLO already completed.
    pub async fn hello_timed_out(&mut self, armed_generation: u64) -> Option<SessionError> {
        if !self.generation.matches(armed_generation) || !self.state.is_pre_hello() {
            return None;
        }
        let err = SessionError::Connection("HELLO handshake timed out while identity is required".into());
        tracing::error!("HELLO handshake timed out while identity is required");
        self.callbacks.on_error(&err);
        self.disconnect().await;
        Some(err)
    }

    /// Feed one inbound wire frame through the dispatcher (`spec.md` §4.5.1).
    pub async fn handle_inbound(&mut self, raw: &str) {
        dispatch::dispatch(self, raw).await;
    }

    /// `processHello` (`spec.md` §4.5.3) — fail-closed, single-entry per
    /// session. `self.hello_processing` is set before any `.await` and
    /// cleared unconditionally afterward.
    pub(crate) async fn process_hello(&mut self, outer: &serde_json::Value) {
        if self.hello_processing {
            self.terminal_error("DUPLICATE_HELLO", "HELLO already in progress").await;
            return;
        }
        self.hello_processing = true;
        let outcome = self.process_hello_inner(outer).await;
        self.hello_processing = false;

        match outcome {
            Ok(()) => {}
            Err(HelloOutcomeError::Hello(failure)) => {
                let message = failure.message().to_string();
                self.terminal_error(failure.wire_code(), &message).await;
            }
            Err(HelloOutcomeError::KeyMismatch(mismatch)) => self.terminal_key_mismatch(mismatch).await,
        }
    }

    async fn process_hello_inner(&mut self, outer: &serde_json::Value) -> Result<(), HelloOutcomeError> {
        let (Some(payload), Some(remote_eph_pub)) = (
            outer.get("payload").and_then(|v| v.as_str()),
            self.remote_ephemeral_pub,
        ) else {
            return Err(HelloOutcomeError::Hello(HelloFailure::DecryptFailed));
        };

        let plaintext = open_box_payload(payload, &remote_eph_pub, &self.local_ephemeral.secret_key)
            .map_err(|_| HelloOutcomeError::Hello(HelloFailure::DecryptFailed))?;
        let plaintext = String::from_utf8(plaintext).map_err(|_| HelloOutcomeError::Hello(HelloFailure::DecryptFailed))?;

        let value = hello::parse_json(&plaintext).map_err(HelloOutcomeError::Hello)?;
        let (remote_identity_pub, raw_caps) = hello::extract_schema(&value).map_err(HelloOutcomeError::Hello)?;
        hello::validate_capabilities(&raw_caps, self.local_identity.is_some()).map_err(HelloOutcomeError::Hello)?;

        let negotiated = capabilities::negotiate(&raw_caps, &capabilities::local_capabilities());
        self.remote_identity_pub = Some(remote_identity_pub);
        self.negotiated_capabilities = negotiated;

        let verification = if let Some(store) = self.pin_store.as_deref_mut() {
            match verify_pinned_identity(store, &self.remote_peer_code, &remote_identity_pub) {
                Ok(PinOutcome::Pinned) => VerificationState::Unverified(self.compute_sas(&remote_identity_pub)),
                Ok(PinOutcome::Verified(true)) => VerificationState::Verified(self.compute_sas(&remote_identity_pub)),
                Ok(PinOutcome::Verified(false)) => VerificationState::Unverified(self.compute_sas(&remote_identity_pub)),
                Err(mismatch) => return Err(HelloOutcomeError::KeyMismatch(mismatch)),
            }
        } else {
            VerificationState::Unverified(self.compute_sas(&remote_identity_pub))
        };

        self.state = SessionState::PostHello;
        self.hello_complete = true;
        self.hello_notify.notify_waiters();
        self.emit_verification_state(verification);

        Ok(())
    }

    fn compute_sas(&self, remote_identity_pub: &[u8; 32]) -> String {
        let local_identity_pub = self.local_identity.as_ref().map(|k| k.public_key).unwrap_or([0u8; 32]);
        let remote_eph = self.remote_ephemeral_pub.unwrap_or([0u8; 32]);
        bolt_core::sas::compute_sas(&local_identity_pub, remote_identity_pub, &self.local_ephemeral.public_key, &remote_eph)
    }

    fn emit_verification_state(&mut self, state: VerificationState) {
        if self.verification_emitted {
            return;
        }
        self.verification_emitted = true;
        self.callbacks.on_verification_state(state);
    }

    /// Await HELLO completion — used by `send_file` (`spec.md` §4.5.5 step 1).
    pub async fn await_hello(&self) {
        if self.hello_complete {
            return;
        }
        self.hello_notify.notified().await;
    }

    /// Send a file over this session (`spec.md` §4.5.5).
    pub async fn send_file(&mut self, filename: &str, data: &[u8]) -> Result<(), SessionError> {
        if !self.transport.is_open() {
            return Err(SessionError::Connection("Data channel not open".into()));
        }
        self.await_hello().await;

        let remote_eph_pub = self
            .remote_ephemeral_pub
            .ok_or_else(|| SessionError::Connection("no remote ephemeral key".into()))?;

        let handle = self.sender_registry.begin(filename);
        let transfer_id = handle.transfer_id.clone();
        let control = handle.control;

        let file_hash = if self.capability_negotiated(CAP_FILE_HASH) {
            Some(bolt_core::encoding::to_hex(&bolt_core::hash::sha256(data)))
        } else {
            None
        };

        let plan = ChunkPlan::new(data.len() as u64, self.config.chunk_size)?;
        let generation_at_send = self.generation.current();

        for index in 0..plan.total_chunks {
            loop {
                if control.is_cancelled() {
                    self.sender_registry.remove(filename);
                    return Err(SessionError::Connection("transfer cancelled".into()));
                }
                if !control.is_paused() {
                    break;
                }
                tokio::time::sleep(self.config.pause_poll_interval).await;
            }

            while self.transport.buffered_amount() > self.transport.low_water_mark() {
                let cancel = self.backpressure_cancel.clone();
                tokio::select! {
                    _ = tokio::time::sleep(self.config.pause_poll_interval) => {}
                    _ = cancel.notified() => {}
                }
                if !self.generation.matches(generation_at_send) {
                    self.sender_registry.remove(filename);
                    return Err(SessionError::Connection("back-pressure wait cancelled by disconnect".into()));
                }
            }

            let (start, end) = plan.bounds(index).expect("index within plan bounds");
            let raw_chunk = &data[start as usize..end as usize];
            let ciphertext = seal_box_payload(raw_chunk, &remote_eph_pub, &self.local_ephemeral.secret_key)?;

            let inner = FileChunkDataFrame {
                filename: filename.to_string(),
                chunk: ciphertext,
                chunk_index: index,
                total_chunks: plan.total_chunks,
                file_size: plan.file_size,
                transfer_id: Some(transfer_id.clone()),
                file_hash: if index == 0 { file_hash.clone() } else { None },
            };
            let inner_json = serde_json::to_string(&inner).expect("FileChunkDataFrame always serializes");
            self.send_framed(&inner_json, "file-chunk").await?;
            self.record_metric(&transfer_id, index, raw_chunk.len() as u32);

            self.callbacks.on_progress(TransferProgress {
                filename: filename.to_string(),
                status: TransferStatus::Transferring,
                current_chunk: Some(index + 1),
                total_chunks: Some(plan.total_chunks),
            });
        }

        self.sender_registry.remove(filename);

        let delay = self.config.completion_event_delay;
        tokio::time::sleep(delay).await;
        self.callbacks.on_progress(TransferProgress {
            filename: filename.to_string(),
            status: TransferStatus::Completed,
            current_chunk: Some(plan.total_chunks),
            total_chunks: Some(plan.total_chunks),
        });

        Ok(())
    }

    /// Pause/resume/cancel handles for a transfer this session is sending.
    pub fn sender_control(&self, filename: &str) -> Option<TransferControl> {
        self.sender_registry.control_for(filename)
    }

    /// Send a cancel control frame for a transfer we are sending
    /// (`spec.md` §4.5.5/§4.5.7).
    pub async fn cancel_send(&mut self, filename: &str) -> Result<(), SessionError> {
        let Some(handle) = self.sender_registry.remove(filename) else {
            return Ok(());
        };
        handle.control.cancel();
        let frame = FileChunkControlFrame {
            filename: filename.to_string(),
            transfer_id: Some(handle.transfer_id),
            action: FileChunkControl::Cancelled { cancelled: true, cancelled_by: CancelledBy::Sender },
        };
        let json = serde_json::to_string(&frame).expect("FileChunkControlFrame always serializes");
        self.send_framed(&json, "file-chunk").await
    }

    /// Wrap `inner_json` in a Profile Envelope when negotiated (and keys
    /// are present), otherwise send it plaintext, and transmit it.
    pub(crate) async fn send_framed(&mut self, inner_json: &str, _inner_type: &str) -> Result<(), SessionError> {
        let frame = if self.envelope_negotiated() {
            if let Some(remote_eph) = self.remote_ephemeral_pub {
                let envelope = envelope::wrap(inner_json, &remote_eph, &self.local_ephemeral.secret_key)?;
                serde_json::to_string(&envelope).expect("ProfileEnvelopeV1 always serializes")
            } else {
                inner_json.to_string()
            }
        } else {
            inner_json.to_string()
        };
        self.transport.send(frame).await
    }

    /// Emit a wire `Error` frame (enveloped when negotiated and keys are
    /// present), surface it to the embedder, and disconnect. This is the
    /// single point where an internal/dispatch failure becomes a wire
    /// code (`spec.md` §7).
    pub(crate) async fn terminal_error(&mut self, code: &'static str, message: &str) {
        debug_assert!(is_valid_wire_error_code(code));
        tracing::error!(code, message, "terminal protocol error, disconnecting");

        let error_inner = serde_json::json!({ "type": "error", "code": code, "message": message });
        let inner_json = serde_json::to_string(&error_inner).expect("error frame always serializes");
        let _ = self.send_framed(&inner_json, "error").await;

        self.callbacks.on_error(&SessionError::Protocol(format!("{code}: {message}")));
        self.disconnect().await;
    }

    /// Like [`Self::terminal_error`], but for a TOFU pin mismatch: the wire
    /// code is always `KEY_MISMATCH` and the embedder gets the typed
    /// [`KeyMismatchError`] rather than a generic protocol string
    /// (`spec.md` §4.5.3 step 8, §8 scenario 6).
    async fn terminal_key_mismatch(&mut self, mismatch: KeyMismatchError) {
        let message = mismatch.to_string();
        tracing::error!(code = "KEY_MISMATCH", message = %message, "terminal protocol error, disconnecting");

        let error_inner = serde_json::json!({ "type": "error", "code": "KEY_MISMATCH", "message": message });
        let inner_json = serde_json::to_string(&error_inner).expect("error frame always serializes");
        let _ = self.send_framed(&inner_json, "error").await;

        self.callbacks.on_error(&SessionError::KeyMismatch(mismatch));
        self.disconnect().await;
    }

    /// A well-formed inbound `Error` frame with a canonical code: surface
    /// it and disconnect without sending anything back (`spec.md` §4.5.1).
    pub(crate) async fn surface_remote_error(&mut self, code: &str, message: &str) {
        tracing::warn!(code, message, "remote closed with wire error");
        self.callbacks.on_error(&SessionError::Protocol(format!("remote error {code}: {message}")));
        self.disconnect().await;
    }

    /// Decode a `fileHash` hex string into 32 bytes, if present and valid.
    pub(crate) fn decode_file_hash(hash: &str) -> Option<[u8; 32]> {
        from_hex(hash).ok().and_then(|v| v.try_into().ok())
    }

    pub(crate) fn remote_identity_or_zero(&self) -> [u8; 32] {
        self.remote_identity_pub.unwrap_or([0u8; 32])
    }

    pub(crate) fn file_hash_negotiated(&self) -> bool {
        self.capability_negotiated(CAP_FILE_HASH)
    }

    pub(crate) fn envelope_negotiated_pub(&self) -> bool {
        self.envelope_negotiated()
    }

    pub(crate) fn callbacks_mut(&mut self) -> &mut CB {
        &mut self.callbacks
    }

    /// Record an observational transfer-metrics sample for `key` (a
    /// transfer id for guarded transfers, a filename for legacy ones).
    /// Purely diagnostic: nothing downstream branches on it.
    #[cfg(feature = "metrics")]
    pub(crate) fn record_metric(&mut self, key: &str, chunk_index: u32, bytes: u32) {
        self.metrics.entry(key.to_string()).or_default().record(chunk_index, bytes);
    }

    #[cfg(not(feature = "metrics"))]
    pub(crate) fn record_metric(&mut self, _key: &str, _chunk_index: u32, _bytes: u32) {}

    /// Unwrap an inbound Profile Envelope v1 frame into its inner JSON.
    pub(crate) fn unwrap_envelope(&self, envelope: &ProfileEnvelopeV1) -> Result<String, envelope::UnwrapFailure> {
        let remote_eph = self.remote_ephemeral_pub.ok_or(envelope::UnwrapFailure::DecryptFailed)?;
        envelope::unwrap(envelope, &remote_eph, &self.local_ephemeral.secret_key)
    }

    /// Teardown (`spec.md` §4.5.8). Idempotent.
    pub async fn disconnect(&mut self) {
        if self.state.is_closed() {
            return;
        }
        self.generation.advance();
        self.backpressure_cancel.notify_waiters();
        self.local_ephemeral.secret_key.iter_mut().for_each(|b| *b = 0);
        if let Some(mut k) = self.remote_ephemeral_pub.take() {
            k.iter_mut().for_each(|b| *b = 0);
        }
        if let Some(mut k) = self.remote_identity_pub.take() {
            k.iter_mut().for_each(|b| *b = 0);
        }
        self.sender_registry.clear();
        self.receiver_registry.clear();
        #[cfg(feature = "metrics")]
        self.metrics.clear();
        self.negotiated_capabilities.clear();
        self.transport.close().await;
        self.state = SessionState::Closed;
    }
}
