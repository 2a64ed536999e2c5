//! Wire protocol for the broadcast chat peer
//!
//! The peer speaks an asymmetric protocol: outbound chat text goes out
//! as a bare websocket text frame, while inbound frames carry a JSON
//! object with optional fields (the peer omits empty ones). Server
//! notices arrive as ordinary messages whose content starts with a `/`
//! marker — a legacy display convention only; classification of log
//! entries never depends on it.

use serde::{Deserialize, Serialize};

use crate::event::TransportEvent;

/// Marker prefix the broadcast peer puts on server notices.
pub const NOTICE_MARKER: char = '/';

/// JSON frame broadcast by the chat server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Frame {
    /// Chat frame attributed to a sender.
    pub fn message(sender: impl Into<String>, content: impl Into<String>) -> Self {
        Frame {
            sender: Some(sender.into()),
            recipient: None,
            content: Some(content.into()),
        }
    }

    /// Server notice frame, content tagged with the legacy marker.
    pub fn notice(content: impl Into<String>) -> Self {
        Frame {
            sender: None,
            recipient: None,
            content: Some(format!("{}{}", NOTICE_MARKER, content.into())),
        }
    }

    /// Decode a raw text frame into a transport event.
    pub fn decode(raw: &str) -> Result<TransportEvent, serde_json::Error> {
        let frame: Frame = serde_json::from_str(raw)?;
        Ok(frame.into_event())
    }

    /// Convert into the event the core projects. A frame with no
    /// content yields an empty message rather than being dropped.
    pub fn into_event(self) -> TransportEvent {
        TransportEvent::Message {
            content: self.content.unwrap_or_default(),
            sender: self.sender,
        }
    }
}

/// Split the legacy notice marker off peer-sent text.
///
/// Returns the text to display and whether the marker was present.
/// Display-layer shim only: `EntryKind` stays the source of truth for
/// classification.
pub fn strip_notice_marker(text: &str) -> (&str, bool) {
    match text.strip_prefix(NOTICE_MARKER) {
        Some(rest) => (rest, true),
        None => (text, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_attributed_message() {
        let event = Frame::decode(r#"{"sender":"abc","content":"hi"}"#).unwrap();
        assert_eq!(event, TransportEvent::message_from("abc", "hi"));
    }

    #[test]
    fn test_decode_without_sender() {
        let event = Frame::decode(r#"{"content":"/A new socket has connected."}"#).unwrap();
        assert_eq!(event, TransportEvent::message("/A new socket has connected."));
    }

    #[test]
    fn test_decode_empty_frame() {
        let event = Frame::decode("{}").unwrap();
        assert_eq!(event, TransportEvent::message(""));
    }

    #[test]
    fn test_decode_rejects_malformed_json() {
        assert!(Frame::decode("not json").is_err());
    }

    #[test]
    fn test_encode_omits_absent_fields() {
        let json = serde_json::to_string(&Frame::message("abc", "hi")).unwrap();
        assert_eq!(json, r#"{"sender":"abc","content":"hi"}"#);

        let json = serde_json::to_string(&Frame::notice("gone")).unwrap();
        assert_eq!(json, r#"{"content":"/gone"}"#);
    }

    #[test]
    fn test_strip_notice_marker() {
        assert_eq!(strip_notice_marker("/server notice"), ("server notice", true));
        assert_eq!(strip_notice_marker("plain chat"), ("plain chat", false));
        assert_eq!(strip_notice_marker(""), ("", false));
        // Only a leading marker counts.
        assert_eq!(strip_notice_marker("a/b"), ("a/b", false));
    }
}
