//! The `DataChannel` boundary trait (`spec.md` §6.2) and an in-memory
//! duplex implementation for tests.
//!
//! `bolt-session` drives a `DataChannel`; it never opens one itself. The
//! signaling transport that negotiates the underlying connection (ICE,
//! offer/answer) is an out-of-scope external collaborator per `spec.md`
//! §1 — this trait only covers the open-channel send/back-pressure
//! surface the engine actually touches.

use async_trait::async_trait;

use crate::errors::SessionError;

/// A reliable, ordered, bidirectional message channel (typically a WebRTC
/// data channel). Messages are whole UTF-8 JSON frames; the channel does
/// not interpret them.
#[async_trait]
pub trait DataChannel: Send {
    /// Send one whole message frame.
    async fn send(&mut self, message: String) -> Result<(), SessionError>;

    /// Bytes currently queued for send but not yet flushed to the wire.
    fn buffered_amount(&self) -> usize;

    /// Back-pressure low-water mark: the sender awaits a drain signal
    /// whenever `buffered_amount()` exceeds this (`spec.md` §4.5.5).
    fn low_water_mark(&self) -> usize;

    /// Whether the channel is currently open for sending.
    fn is_open(&self) -> bool;

    /// Close the channel. Idempotent.
    async fn close(&mut self);
}

/// One end of an in-memory duplex channel pair, for tests that need two
/// [`crate::engine::Session`]s to exchange real frames without a network.
pub struct InMemoryDataChannel {
    outbox: tokio::sync::mpsc::UnboundedSender<String>,
    open: bool,
    low_water_mark: usize,
}

impl InMemoryDataChannel {
    /// Build a connected pair: `(a, inbox_a)` and `(b, inbox_b)`, where
    /// sending on `a` delivers to `inbox_b` and vice versa.
    pub fn pair() -> (
        (Self, tokio::sync::mpsc::UnboundedReceiver<String>),
        (Self, tokio::sync::mpsc::UnboundedReceiver<String>),
    ) {
        let (tx_a, rx_a) = tokio::sync::mpsc::unbounded_channel();
        let (tx_b, rx_b) = tokio::sync::mpsc::unbounded_channel();
        let a = Self { outbox: tx_b, open: true, low_water_mark: usize::MAX };
        let b = Self { outbox: tx_a, open: true, low_water_mark: usize::MAX };
        ((a, rx_a), (b, rx_b))
    }
}

#[async_trait]
impl DataChannel for InMemoryDataChannel {
    async fn send(&mut self, message: String) -> Result<(), SessionError> {
        if !self.open {
            return Err(SessionError::Connection("Data channel not open".into()));
        }
        self.outbox
            .send(message)
            .map_err(|_| SessionError::Connection("peer channel closed".into()))
    }

    fn buffered_amount(&self) -> usize {
        0
    }

    fn low_water_mark(&self) -> usize {
        self.low_water_mark
    }

    fn is_open(&self) -> bool {
        self.open
    }

    async fn close(&mut self) {
        self.open = false;
    }
}
