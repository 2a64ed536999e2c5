//! Transport session contract
//!
//! The transport owns the live connection: establishment, framing,
//! reconnection and the socket lifecycle all live behind this trait.
//! The core only consumes its event stream and hands composed text back.
//!
//! # Implementations
//! - `ChannelSession`: in-memory pair over tokio channels (tests, embedding)
//! - `WsSession` (in the `sockchat` binary): tokio-tungstenite client

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::event::TransportEvent;

pub mod memory;

pub use memory::{ChannelPeer, ChannelSession};

/// Push-based event stream for one subscription.
///
/// Delivery is one event at a time, in emit order. Dropping the receiver
/// releases the subscription; events still in flight are never delivered
/// to a released subscription.
pub type EventStream = mpsc::UnboundedReceiver<TransportEvent>;

/// Errors surfaced by a transport session.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The session is closed or the peer went away.
    #[error("transport disconnected: {reason}")]
    Disconnected { reason: String },

    /// Outbound text could not be handed to the connection.
    #[error("send failed: {reason}")]
    SendFailed { reason: String },

    /// An inbound frame did not decode to a known event.
    #[error("undecodable frame: {0}")]
    Decode(String),
}

/// Contract required from a transport session.
///
/// One logical connection, one ordered event stream. The stream is lazy
/// and not restartable: `subscribe` yields it at most once, and a second
/// call returns `None` rather than replaying past events. `send` is
/// best-effort with no delivery guarantee. `close` is idempotent.
#[async_trait]
pub trait TransportSession: Send + Sync {
    /// Take the session's event stream. `None` once already taken.
    fn subscribe(&self) -> Option<EventStream>;

    /// Transmit `text` to the remote peer, best-effort.
    async fn send(&self, text: &str) -> Result<(), TransportError>;

    /// Request session termination. Safe to call more than once; only
    /// the first call has an observable effect.
    async fn close(&self);
}
