//! Transport event model
//!
//! A `TransportEvent` is the typed notification a transport session
//! delivers for one live connection: the two lifecycle edges plus peer
//! messages.

/// A single notification from the transport session.
///
/// The set is closed on purpose. Downstream classification is an
/// exhaustive match, so adding a variant is a compile error at every
/// projection site instead of a silently dropped event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The connection reached the open state.
    Opened,
    /// The connection ended, locally or from the peer side.
    Closed,
    /// Chat content from the remote peer.
    Message {
        content: String,
        /// Originator identifier, when the peer supplied one.
        sender: Option<String>,
    },
}

impl TransportEvent {
    /// Create a message event from a named sender.
    pub fn message_from(sender: impl Into<String>, content: impl Into<String>) -> Self {
        TransportEvent::Message {
            content: content.into(),
            sender: Some(sender.into()),
        }
    }

    /// Create a message event with no originator identifier.
    pub fn message(content: impl Into<String>) -> Self {
        TransportEvent::Message {
            content: content.into(),
            sender: None,
        }
    }

    /// Check if this is a lifecycle event rather than chat content.
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, TransportEvent::Opened | TransportEvent::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let named = TransportEvent::message_from("Bob", "hi");
        assert_eq!(
            named,
            TransportEvent::Message {
                content: "hi".to_string(),
                sender: Some("Bob".to_string()),
            }
        );

        let anonymous = TransportEvent::message("hi");
        assert_eq!(
            anonymous,
            TransportEvent::Message {
                content: "hi".to_string(),
                sender: None,
            }
        );
    }

    #[test]
    fn test_lifecycle_check() {
        assert!(TransportEvent::Opened.is_lifecycle());
        assert!(TransportEvent::Closed.is_lifecycle());
        assert!(!TransportEvent::message("hi").is_lifecycle());
    }
}
