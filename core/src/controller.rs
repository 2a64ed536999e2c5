//! Chat session controller
//!
//! Projects a transport session's event stream into the ordered chat log
//! and manages outbound text submission. The controller never blocks:
//! projecting one event is synchronous, and awaiting the next event is
//! the only suspension point.
//!
//! Lifecycle is `Idle -> Observing -> Closed`, driven by [`start`] and
//! [`teardown`]. Nothing leaves `Closed`.
//!
//! [`start`]: ChatController::start
//! [`teardown`]: ChatController::teardown

use std::sync::Arc;

use crate::entry::{ChatLog, LogEntry};
use crate::event::TransportEvent;
use crate::transport::{EventStream, TransportError, TransportSession};

/// Lifecycle state of a [`ChatController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Constructed, not yet observing.
    Idle,
    /// Subscribed; the log grows as events arrive.
    Observing,
    /// Subscription released and session close requested.
    Closed,
}

/// Projects transport events into the chat log and forwards composed
/// text back through the session.
///
/// The log and the input buffer are owned here and mutated only through
/// the controller's own operations; renderers read them via accessors.
/// The session itself is externally owned — the controller holds a
/// shared handle and never reconnects or recreates it.
pub struct ChatController {
    session: Arc<dyn TransportSession>,
    stream: Option<EventStream>,
    log: ChatLog,
    input: String,
    state: ControllerState,
}

impl ChatController {
    pub fn new(session: Arc<dyn TransportSession>) -> Self {
        Self {
            session,
            stream: None,
            log: ChatLog::new(),
            input: String::new(),
            state: ControllerState::Idle,
        }
    }

    /// Subscribe to the session's event stream.
    ///
    /// Subscribes exactly once per controller: a no-op outside `Idle`.
    /// If the session's stream was already taken elsewhere the
    /// controller stays `Idle` and the condition is logged.
    pub fn start(&mut self) {
        if self.state != ControllerState::Idle {
            return;
        }
        match self.session.subscribe() {
            Some(stream) => {
                self.stream = Some(stream);
                self.state = ControllerState::Observing;
            }
            None => {
                log::warn!("event stream already taken; controller stays idle");
            }
        }
    }

    /// Await the next event and project it into the log.
    ///
    /// Returns the appended entry, or `None` when the controller is not
    /// observing or the stream has ended. Cancel-safe: an event is
    /// either fully projected or still queued.
    pub async fn next_event(&mut self) -> Option<LogEntry> {
        let stream = self.stream.as_mut()?;
        let event = stream.recv().await?;
        self.project(event);
        self.log.last().cloned()
    }

    /// Project every event already delivered, in order, without waiting.
    ///
    /// Returns the number of entries appended.
    pub fn pump(&mut self) -> usize {
        let mut appended = 0;
        while let Some(stream) = self.stream.as_mut() {
            match stream.try_recv() {
                Ok(event) => {
                    self.project(event);
                    appended += 1;
                }
                Err(_) => break,
            }
        }
        appended
    }

    /// Forward composed text to the session and clear the input buffer.
    ///
    /// Empty or whitespace-only text is a defined no-op, as is calling
    /// this outside `Observing`. The text goes out unmodified; no log
    /// entry is appended here — any echo arrives as a later `Message`
    /// event from the session.
    pub async fn submit(&mut self, text: &str) -> Result<(), TransportError> {
        if self.state != ControllerState::Observing {
            return Ok(());
        }
        if text.trim().is_empty() {
            return Ok(());
        }
        self.session.send(text).await?;
        self.input.clear();
        Ok(())
    }

    /// Submit the current input buffer.
    pub async fn submit_input(&mut self) -> Result<(), TransportError> {
        let text = self.input.clone();
        self.submit(&text).await
    }

    /// Release the subscription and request session close.
    ///
    /// Idempotent: after the first call further calls have no observable
    /// effect. The subscription is dropped before the close request, so
    /// events still in flight are never projected.
    pub async fn teardown(&mut self) {
        if self.state == ControllerState::Closed {
            return;
        }
        self.stream = None;
        self.session.close().await;
        self.state = ControllerState::Closed;
    }

    fn project(&mut self, event: TransportEvent) {
        self.log.push(LogEntry::from(event));
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// The chat log, read-only.
    pub fn log(&self) -> &ChatLog {
        &self.log
    }

    /// The composed-but-unsent input buffer, read-only.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the input buffer with freshly composed text.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }
}
