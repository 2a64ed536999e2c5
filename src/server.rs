//! Broadcast chat server
//!
//! Accepts websocket clients, rebroadcasts every inbound text frame to
//! the connected clients as a JSON frame attributed to the sender's
//! server-assigned id, and announces joins and leaves with marker-tagged
//! notices. Wire-compatible with the peer the client was built against:
//! join notices go to everyone except the newcomer, leave notices and
//! chat go to everyone still registered.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use uuid::Uuid;

use sockchat_core::protocol::Frame;

type Registry = Arc<Mutex<HashMap<Uuid, mpsc::UnboundedSender<String>>>>;

pub struct Server {
    listener: TcpListener,
    clients: Registry,
}

impl Server {
    pub async fn bind(addr: &str) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        Ok(Self {
            listener,
            clients: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .context("Failed to read local address")
    }

    /// Accept clients until the listener fails.
    pub async fn run(self) -> Result<()> {
        println!("sockchat server listening on: ws://{}", self.local_addr()?);

        while let Ok((stream, _)) = self.listener.accept().await {
            let clients = self.clients.clone();
            tokio::spawn(async move {
                if let Ok(ws) = accept_async(stream).await {
                    handle_connection(ws, clients).await;
                }
            });
        }

        Ok(())
    }
}

async fn handle_connection(
    ws: tokio_tungstenite::WebSocketStream<TcpStream>,
    clients: Registry,
) {
    let id = Uuid::new_v4();
    let (mut sink, mut source) = ws.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    clients.lock().await.insert(id, tx);
    broadcast(&clients, Some(id), &Frame::notice("A new socket has connected.")).await;
    log::info!("client {} connected", id);

    // Task forwarding queued frames to this client's socket.
    let send_task = tokio::spawn(async move {
        while let Some(json) = rx.recv().await {
            if sink.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(msg)) = source.next().await {
        match msg {
            Message::Text(text) => {
                let frame = Frame::message(id.to_string(), text);
                broadcast(&clients, None, &frame).await;
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    clients.lock().await.remove(&id);
    broadcast(&clients, None, &Frame::notice("A socket has disconnected.")).await;
    send_task.abort();
    log::info!("client {} disconnected", id);
}

/// Queue `frame` for every registered client except `skip`. A client
/// whose queue is no longer writable is dropped from the registry.
async fn broadcast(clients: &Registry, skip: Option<Uuid>, frame: &Frame) {
    let json = match serde_json::to_string(frame) {
        Ok(json) => json,
        Err(err) => {
            log::error!("failed to encode frame: {}", err);
            return;
        }
    };

    let mut guard = clients.lock().await;
    let mut dead = Vec::new();
    for (client_id, tx) in guard.iter() {
        if Some(*client_id) == skip {
            continue;
        }
        if tx.send(json.clone()).is_err() {
            dead.push(*client_id);
        }
    }
    for client_id in dead {
        guard.remove(&client_id);
        log::warn!("dropping unreachable client {}", client_id);
    }
}
