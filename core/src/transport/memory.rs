//! In-memory transport session
//!
//! Channel-backed implementation of the `TransportSession` contract for
//! single-process use: unit tests, development, and embedded front-ends
//! that fake a peer. FIFO ordering, single subscriber.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::{EventStream, TransportError, TransportSession};
use crate::event::TransportEvent;

/// In-memory session. Created together with its [`ChannelPeer`], which
/// plays the remote side.
pub struct ChannelSession {
    stream: Mutex<Option<EventStream>>,
    outbound: mpsc::UnboundedSender<String>,
    close_tx: mpsc::UnboundedSender<()>,
    closed: AtomicBool,
}

/// Far end of a [`ChannelSession`], held by the test or embedding code.
///
/// Emits events toward the session's subscriber and observes what the
/// session was asked to send or close.
pub struct ChannelPeer {
    events: mpsc::UnboundedSender<TransportEvent>,
    outbound: mpsc::UnboundedReceiver<String>,
    close_rx: mpsc::UnboundedReceiver<()>,
}

impl ChannelSession {
    /// Create a connected session/peer pair.
    pub fn pair() -> (Self, ChannelPeer) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (close_tx, close_rx) = mpsc::unbounded_channel();

        let session = ChannelSession {
            stream: Mutex::new(Some(event_rx)),
            outbound: outbound_tx,
            close_tx,
            closed: AtomicBool::new(false),
        };
        let peer = ChannelPeer {
            events: event_tx,
            outbound: outbound_rx,
            close_rx,
        };
        (session, peer)
    }
}

#[async_trait]
impl TransportSession for ChannelSession {
    fn subscribe(&self) -> Option<EventStream> {
        self.stream.lock().take()
    }

    async fn send(&self, text: &str) -> Result<(), TransportError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(TransportError::Disconnected {
                reason: "session closed".to_string(),
            });
        }
        self.outbound
            .send(text.to_string())
            .map_err(|_| TransportError::SendFailed {
                reason: "peer dropped".to_string(),
            })
    }

    async fn close(&self) {
        // Only the first close reaches the peer.
        if !self.closed.swap(true, Ordering::SeqCst) {
            let _ = self.close_tx.send(());
        }
    }
}

impl ChannelPeer {
    /// Deliver one event to the subscriber. Returns `false` once the
    /// subscription has been released.
    pub fn emit(&self, event: TransportEvent) -> bool {
        self.events.send(event).is_ok()
    }

    /// Await the next text the session sent.
    pub async fn next_outbound(&mut self) -> Option<String> {
        self.outbound.recv().await
    }

    /// Pop an already-sent text without waiting.
    pub fn try_outbound(&mut self) -> Option<String> {
        self.outbound.try_recv().ok()
    }

    /// Number of close requests received so far.
    pub fn close_requests(&mut self) -> usize {
        let mut count = 0;
        while self.close_rx.try_recv().is_ok() {
            count += 1;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stream_yielded_at_most_once() {
        let (session, _peer) = ChannelSession::pair();
        assert!(session.subscribe().is_some());
        assert!(session.subscribe().is_none());
    }

    #[tokio::test]
    async fn test_events_arrive_in_emit_order() {
        let (session, peer) = ChannelSession::pair();
        let mut stream = session.subscribe().unwrap();

        peer.emit(TransportEvent::Opened);
        peer.emit(TransportEvent::message("one"));
        peer.emit(TransportEvent::message("two"));

        assert_eq!(stream.recv().await, Some(TransportEvent::Opened));
        assert_eq!(stream.recv().await, Some(TransportEvent::message("one")));
        assert_eq!(stream.recv().await, Some(TransportEvent::message("two")));
    }

    #[tokio::test]
    async fn test_send_reaches_peer() {
        let (session, mut peer) = ChannelSession::pair();
        session.send("hello").await.unwrap();
        assert_eq!(peer.next_outbound().await, Some("hello".to_string()));
    }

    #[tokio::test]
    async fn test_send_after_close_fails() {
        let (session, _peer) = ChannelSession::pair();
        session.close().await;
        assert!(matches!(
            session.send("hello").await,
            Err(TransportError::Disconnected { .. })
        ));
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let (session, mut peer) = ChannelSession::pair();
        session.close().await;
        session.close().await;
        session.close().await;
        assert_eq!(peer.close_requests(), 1);
    }

    #[tokio::test]
    async fn test_emit_fails_after_subscription_dropped() {
        let (session, peer) = ChannelSession::pair();
        let stream = session.subscribe().unwrap();
        drop(stream);
        assert!(!peer.emit(TransportEvent::Opened));
    }
}
