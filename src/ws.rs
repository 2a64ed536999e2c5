//! Websocket transport session
//!
//! tokio-tungstenite client implementing the `TransportSession` contract
//! against the broadcast chat server. Outbound chat text goes out as a
//! bare text frame; inbound text frames carry the JSON wire format
//! decoded by `sockchat_core::protocol`.
//!
//! Two tasks own the socket halves: a writer draining the outbound
//! channel and a reader turning frames into transport events. An
//! undecodable inbound frame is logged and skipped at this boundary, so
//! the event stream only ever carries well-formed events.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use sockchat_core::protocol::Frame;
use sockchat_core::transport::EventStream;
use sockchat_core::{TransportError, TransportEvent, TransportSession};

pub struct WsSession {
    stream: Mutex<Option<EventStream>>,
    outbound: mpsc::UnboundedSender<Message>,
    closed: AtomicBool,
}

impl WsSession {
    /// Connect to the chat server and spin up the socket tasks.
    pub async fn connect(url: &str) -> Result<Self> {
        let (ws, _response) = connect_async(url)
            .await
            .context("websocket handshake failed")?;
        let (mut sink, mut source) = ws.split();

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

        // The connection is open once the handshake returns.
        let _ = event_tx.send(TransportEvent::Opened);

        // Writer task: drains the outbound channel into the socket.
        tokio::spawn(async move {
            while let Some(msg) = outbound_rx.recv().await {
                let is_close = matches!(msg, Message::Close(_));
                if sink.send(msg).await.is_err() {
                    break;
                }
                if is_close {
                    break;
                }
            }
        });

        // Reader task: frames in, events out. Ends on close or error,
        // always emitting exactly one Closed.
        tokio::spawn(async move {
            while let Some(frame) = source.next().await {
                match frame {
                    Ok(Message::Text(text)) => match Frame::decode(text.as_str()) {
                        Ok(event) => {
                            if event_tx.send(event).is_err() {
                                break;
                            }
                        }
                        Err(err) => {
                            log::warn!("dropping undecodable frame: {}", err);
                        }
                    },
                    Ok(Message::Close(_)) => break,
                    Ok(Message::Binary(_)) => {
                        log::warn!("dropping unexpected binary frame");
                    }
                    Ok(_) => {} // ping/pong, handled by tungstenite
                    Err(err) => {
                        log::debug!("socket read error: {}", err);
                        break;
                    }
                }
            }
            let _ = event_tx.send(TransportEvent::Closed);
        });

        Ok(Self {
            stream: Mutex::new(Some(event_rx)),
            outbound: outbound_tx,
            closed: AtomicBool::new(false),
        })
    }
}

#[async_trait]
impl TransportSession for WsSession {
    fn subscribe(&self) -> Option<EventStream> {
        self.stream.lock().ok().and_then(|mut guard| guard.take())
    }

    async fn send(&self, text: &str) -> Result<(), TransportError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(TransportError::Disconnected {
                reason: "session closed".to_string(),
            });
        }
        self.outbound
            .send(Message::Text(text.to_string()))
            .map_err(|_| TransportError::SendFailed {
                reason: "socket writer gone".to_string(),
            })
    }

    async fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            let _ = self.outbound.send(Message::Close(None));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::Server;
    use sockchat_core::{ChatController, EntryKind};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    const TICK: Duration = Duration::from_secs(5);

    async fn connected_client(url: &str) -> ChatController {
        let session = WsSession::connect(url).await.unwrap();
        let mut controller = ChatController::new(Arc::new(session));
        controller.start();
        // First entry is always the local open notice.
        let opened = timeout(TICK, controller.next_event()).await.unwrap().unwrap();
        assert_eq!(opened.kind, EntryKind::System);
        controller
    }

    #[tokio::test]
    async fn test_roundtrip_against_local_server() {
        let server = Server::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}/ws", server.local_addr().unwrap());
        tokio::spawn(server.run());

        let mut alice = connected_client(&url).await;
        let mut bob = connected_client(&url).await;

        // Alice sees Bob's join notice: a peer message carrying the
        // legacy marker, classified User.
        let notice = timeout(TICK, alice.next_event()).await.unwrap().unwrap();
        assert_eq!(notice.kind, EntryKind::User);
        assert_eq!(notice.text, "/A new socket has connected.");

        // Bob talks; everyone (Bob included) gets it attributed to his
        // server-assigned id.
        bob.submit("hello").await.unwrap();
        let received = timeout(TICK, alice.next_event()).await.unwrap().unwrap();
        assert_eq!(received.kind, EntryKind::User);
        assert!(received.text.ends_with(": hello"));

        let echo = timeout(TICK, bob.next_event()).await.unwrap().unwrap();
        assert!(echo.text.ends_with(": hello"));

        // Bob leaves; Alice gets the leave notice.
        bob.teardown().await;
        let leave = timeout(TICK, alice.next_event()).await.unwrap().unwrap();
        assert_eq!(leave.text, "/A socket has disconnected.");

        alice.teardown().await;
    }

    #[tokio::test]
    async fn test_send_after_close_is_rejected() {
        let server = Server::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}/ws", server.local_addr().unwrap());
        tokio::spawn(server.run());

        let session = WsSession::connect(&url).await.unwrap();
        session.close().await;
        assert!(matches!(
            session.send("late").await,
            Err(TransportError::Disconnected { .. })
        ));
    }
}
