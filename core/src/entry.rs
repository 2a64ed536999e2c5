//! Chat log entries and the append-only log
//!
//! Every transport event projects to exactly one `LogEntry`. The entry
//! carries its classification as a first-class field; render layers
//! decide emphasis from `kind`, never by inspecting the text.

use crate::event::TransportEvent;

/// Notice appended when the connection reaches the open state.
pub const CONNECTION_ESTABLISHED: &str = "The socket connection has been established";

/// Notice appended when the connection ends.
pub const CONNECTION_CLOSED: &str = "The socket connection has been closed";

/// Render classification for a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Generated from a connection lifecycle event. Rendered with emphasis.
    System,
    /// Peer-originated chat content. Rendered plain.
    User,
}

/// One rendered unit in the chat log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// The literal string to render.
    pub text: String,
    /// Classification determining render treatment.
    pub kind: EntryKind,
}

impl LogEntry {
    /// Create a system entry.
    pub fn system(text: impl Into<String>) -> Self {
        LogEntry {
            text: text.into(),
            kind: EntryKind::System,
        }
    }

    /// Create a user entry.
    pub fn user(text: impl Into<String>) -> Self {
        LogEntry {
            text: text.into(),
            kind: EntryKind::User,
        }
    }

    pub fn is_system(&self) -> bool {
        self.kind == EntryKind::System
    }
}

impl From<TransportEvent> for LogEntry {
    /// Project one transport event into its log entry.
    ///
    /// Classification is decided by the event variant alone: lifecycle
    /// events are `System`, messages are `User`. A named sender is
    /// prefixed onto the content; an anonymous message renders as-is.
    fn from(event: TransportEvent) -> Self {
        match event {
            TransportEvent::Opened => LogEntry::system(CONNECTION_ESTABLISHED),
            TransportEvent::Closed => LogEntry::system(CONNECTION_CLOSED),
            TransportEvent::Message {
                content,
                sender: Some(sender),
            } => LogEntry::user(format!("{}: {}", sender, content)),
            TransportEvent::Message {
                content,
                sender: None,
            } => LogEntry::user(content),
        }
    }
}

/// Append-only ordered sequence of log entries.
///
/// Owned exclusively by one controller for the lifetime of a session.
/// Entries are never reordered or removed; readers only ever see a
/// shared slice.
#[derive(Debug, Default)]
pub struct ChatLog {
    entries: Vec<LogEntry>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry. Crate-private: mutation goes through the
    /// controller's own operations only.
    pub(crate) fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    /// All entries, in receipt order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opened_projects_to_system_notice() {
        let entry = LogEntry::from(TransportEvent::Opened);
        assert_eq!(entry.text, CONNECTION_ESTABLISHED);
        assert_eq!(entry.kind, EntryKind::System);
    }

    #[test]
    fn test_closed_projects_to_system_notice() {
        let entry = LogEntry::from(TransportEvent::Closed);
        assert_eq!(entry.text, CONNECTION_CLOSED);
        assert_eq!(entry.kind, EntryKind::System);
    }

    #[test]
    fn test_named_message_gets_sender_prefix() {
        let entry = LogEntry::from(TransportEvent::message_from("Bob", "hi"));
        assert_eq!(entry.text, "Bob: hi");
        assert_eq!(entry.kind, EntryKind::User);
    }

    #[test]
    fn test_anonymous_message_renders_as_is() {
        let entry = LogEntry::from(TransportEvent::message("hi"));
        assert_eq!(entry.text, "hi");
        assert_eq!(entry.kind, EntryKind::User);
    }

    #[test]
    fn test_log_preserves_append_order() {
        let mut log = ChatLog::new();
        assert!(log.is_empty());

        log.push(LogEntry::system("a"));
        log.push(LogEntry::user("b"));
        log.push(LogEntry::user("c"));

        assert_eq!(log.len(), 3);
        let texts: Vec<&str> = log.entries().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
        assert_eq!(log.last().unwrap().text, "c");
    }
}
